//! Display ordering of spirit statistics rows
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

use crate::aggregate::{CharacterStatRow, CharacterStats};

/// Column a spirit table can be ordered by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Spirit,
    Complexity,
    Source,
    /// Play count of one participant
    Plays(String),
    /// Most recent play of one participant
    LastPlayed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortKeyError {
    #[error("unknown sort key {0:?} (expected spirit, complexity, source, plays:<id> or last:<id>)")]
    Unknown(String),
    #[error("sort key {0:?} is missing a participant id")]
    MissingParticipant(String),
}

impl FromStr for SortKey {
    type Err = SortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Some((column, participant)) = raw.split_once(':') {
            let participant = participant.trim();
            if participant.is_empty() {
                return Err(SortKeyError::MissingParticipant(raw.to_string()));
            }
            return match column.trim().to_ascii_lowercase().as_str() {
                "plays" => Ok(Self::Plays(participant.to_string())),
                "last" | "last_played" => Ok(Self::LastPlayed(participant.to_string())),
                _ => Err(SortKeyError::Unknown(raw.to_string())),
            };
        }
        match raw.to_ascii_lowercase().as_str() {
            "spirit" | "name" => Ok(Self::Spirit),
            "complexity" => Ok(Self::Complexity),
            "source" => Ok(Self::Source),
            "plays" | "last" | "last_played" => {
                Err(SortKeyError::MissingParticipant(raw.to_string()))
            }
            _ => Err(SortKeyError::Unknown(raw.to_string())),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spirit => f.write_str("spirit"),
            Self::Complexity => f.write_str("complexity"),
            Self::Source => f.write_str("source"),
            Self::Plays(p) => write!(f, "plays:{p}"),
            Self::LastPlayed(p) => write!(f, "last:{p}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Current column and direction of a spirit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    #[must_use]
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Select a column: re-selecting the current column flips direction,
    /// a new column starts ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.toggle();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }

    #[must_use]
    pub fn compare(&self, a: &CharacterStatRow, b: &CharacterStatRow) -> Ordering {
        compare(a, b, &self.key, self.direction)
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortKey::Spirit, SortDirection::Ascending)
    }
}

// Dates compare as ISO strings with absent dates as "" so never-played rows
// sort before every played row.
fn date_text(row: &CharacterStatRow, participant: &str) -> String {
    row.last_played(participant)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Compare two rows by `key` in `direction`.
#[must_use]
pub fn compare(
    a: &CharacterStatRow,
    b: &CharacterStatRow,
    key: &SortKey,
    direction: SortDirection,
) -> Ordering {
    let ordering = match key {
        SortKey::Spirit => a.spirit.id.cmp(&b.spirit.id),
        SortKey::Complexity => a.spirit.complexity.cmp(&b.spirit.complexity),
        SortKey::Source => a.spirit.source.cmp(&b.spirit.source),
        SortKey::Plays(p) => a.plays(p).cmp(&b.plays(p)),
        SortKey::LastPlayed(p) => date_text(a, p).cmp(&date_text(b, p)),
    };
    direction.apply(ordering)
}

/// Rows of `stats` ordered for display.
#[must_use]
pub fn project<'a>(
    stats: &'a CharacterStats,
    key: &SortKey,
    direction: SortDirection,
) -> Vec<&'a CharacterStatRow> {
    let mut rows: Vec<&CharacterStatRow> = stats.iter().collect();
    rows.sort_by(|a, b| compare(a, b, key, direction));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_character_stats;
    use crate::catalog::SpiritCatalog;
    use crate::plays::{PlayLog, PlayRecord};
    use chrono::NaiveDate;

    fn stats() -> CharacterStats {
        let catalog = SpiritCatalog::from_json(
            r#"[
                {"spirit": "Bringer of Dreams and Nightmares", "complexity": "High", "source": "Base Game"},
                {"spirit": "A Spread of Rampant Green", "complexity": "Moderate", "source": "Base Game"},
                {"spirit": "Ocean's Hungry Grasp", "complexity": "High", "source": "Base Game"}
            ]"#,
        )
        .unwrap();
        let day = |m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap();
        // plays for A: Bringer 0, Green 2, Ocean 1
        let log: PlayLog = [
            PlayRecord::new(day(3)).with_seat("A", "A Spread of Rampant Green"),
            PlayRecord::new(day(1)).with_seat("A", "A Spread of Rampant Green"),
            PlayRecord::new(day(2)).with_seat("A", "Ocean's Hungry Grasp"),
        ]
        .into_iter()
        .collect();
        aggregate_character_stats(&log, &catalog, &["A".to_string(), "E".to_string()])
    }

    fn ids(rows: &[&CharacterStatRow]) -> Vec<String> {
        rows.iter().map(|r| r.spirit.id.clone()).collect()
    }

    #[test]
    fn parses_sort_keys() {
        assert_eq!("spirit".parse::<SortKey>(), Ok(SortKey::Spirit));
        assert_eq!(" Complexity ".parse::<SortKey>(), Ok(SortKey::Complexity));
        assert_eq!("plays:A".parse::<SortKey>(), Ok(SortKey::Plays("A".to_string())));
        assert_eq!(
            "last:E".parse::<SortKey>(),
            Ok(SortKey::LastPlayed("E".to_string()))
        );
        assert!(matches!(
            "plays".parse::<SortKey>(),
            Err(SortKeyError::MissingParticipant(_))
        ));
        assert!(matches!(
            "wins:A".parse::<SortKey>(),
            Err(SortKeyError::Unknown(_))
        ));
        assert_eq!(SortKey::LastPlayed("E".to_string()).to_string(), "last:E");
    }

    #[test]
    fn plays_sort_ascending_and_descending() {
        let stats = stats();
        let key = SortKey::Plays("A".to_string());
        let asc = project(&stats, &key, SortDirection::Ascending);
        let counts: Vec<u32> = asc.iter().map(|r| r.plays("A")).collect();
        assert_eq!(counts, vec![0, 1, 2]);

        let desc = project(&stats, &key, SortDirection::Descending);
        let counts: Vec<u32> = desc.iter().map(|r| r.plays("A")).collect();
        assert_eq!(counts, vec![2, 1, 0]);
    }

    #[test]
    fn selecting_same_key_twice_returns_to_ascending() {
        let key = SortKey::Plays("A".to_string());
        let mut state = SortState::default();
        state.select(key.clone());
        assert_eq!(state.direction, SortDirection::Ascending);
        state.select(key.clone());
        assert_eq!(state.direction, SortDirection::Descending);
        state.select(key.clone());
        assert_eq!(state.direction, SortDirection::Ascending);
        state.select(SortKey::Spirit);
        assert_eq!(state.key, SortKey::Spirit);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn never_played_dates_sort_first() {
        let stats = stats();
        let rows = project(&stats, &SortKey::LastPlayed("A".to_string()), SortDirection::Ascending);
        assert_eq!(
            ids(&rows),
            vec![
                "Bringer of Dreams and Nightmares",
                "Ocean's Hungry Grasp",
                "A Spread of Rampant Green"
            ]
        );
    }

    #[test]
    fn unknown_participant_counts_as_zero() {
        let stats = stats();
        let rows = project(&stats, &SortKey::Plays("Z".to_string()), SortDirection::Descending);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.plays("Z") == 0));
    }

    #[test]
    fn attribute_columns_compare_by_value() {
        let stats = stats();
        let by_name = project(&stats, &SortKey::Spirit, SortDirection::Ascending);
        assert_eq!(by_name[0].spirit.id, "A Spread of Rampant Green");

        let by_tier = project(&stats, &SortKey::Complexity, SortDirection::Ascending);
        assert_eq!(by_tier[0].spirit.id, "A Spread of Rampant Green");

        let state = SortState::new(SortKey::Complexity, SortDirection::Descending);
        let a = stats.get("A Spread of Rampant Green").unwrap();
        let b = stats.get("Ocean's Hungry Grasp").unwrap();
        assert_eq!(state.compare(a, b), Ordering::Greater);
    }
}
