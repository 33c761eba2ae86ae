//! Fold the play log into per-spirit and per-adversary-level statistics.
//!
//! Statistics are rebuilt from scratch on every call; nothing is cached or
//! updated in place between calls. Records naming an unknown spirit, unknown
//! adversary, or an untracked participant are skipped.
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::catalog::{AdversaryCatalog, AdversaryDefinition, SpiritCatalog, SpiritDefinition};
use crate::plays::PlayLog;

/// Play count and most recent play for one spirit and participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct CharacterPlayStat {
    pub plays: u32,
    pub last_played: Option<NaiveDate>,
}

impl CharacterPlayStat {
    fn record(&mut self, date: NaiveDate) {
        self.plays += 1;
        self.last_played = self.last_played.max(Some(date));
    }
}

/// A spirit together with its statistics for every tracked participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterStatRow {
    pub spirit: SpiritDefinition,
    pub per_participant: BTreeMap<String, CharacterPlayStat>,
}

impl CharacterStatRow {
    #[must_use]
    pub fn stat(&self, participant: &str) -> Option<&CharacterPlayStat> {
        self.per_participant.get(participant)
    }

    /// Plays by `participant`; untracked participants count as zero.
    #[must_use]
    pub fn plays(&self, participant: &str) -> u32 {
        self.stat(participant).map_or(0, |s| s.plays)
    }

    #[must_use]
    pub fn last_played(&self, participant: &str) -> Option<NaiveDate> {
        self.stat(participant).and_then(|s| s.last_played)
    }
}

/// Spirit statistics in catalog order, addressable by spirit id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct CharacterStats {
    rows: Vec<CharacterStatRow>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl CharacterStats {
    #[must_use]
    pub fn get(&self, spirit_id: &str) -> Option<&CharacterStatRow> {
        self.index.get(spirit_id).map(|&idx| &self.rows[idx])
    }

    #[must_use]
    pub fn rows(&self) -> &[CharacterStatRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CharacterStatRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a CharacterStats {
    type Item = &'a CharacterStatRow;
    type IntoIter = std::slice::Iter<'a, CharacterStatRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Count every (spirit, participant) pairing in the log.
///
/// Every catalog spirit gets a zeroed entry for every participant, whether or
/// not the log mentions it.
#[must_use]
pub fn aggregate_character_stats(
    plays: &PlayLog,
    catalog: &SpiritCatalog,
    participants: &[String],
) -> CharacterStats {
    let mut rows: Vec<CharacterStatRow> = catalog
        .iter()
        .map(|spirit| CharacterStatRow {
            spirit: spirit.clone(),
            per_participant: participants
                .iter()
                .map(|p| (p.clone(), CharacterPlayStat::default()))
                .collect(),
        })
        .collect();
    let index: HashMap<String, usize> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (row.spirit.id.clone(), idx))
        .collect();

    for record in plays {
        for seat in &record.seats {
            let Some(&idx) = index.get(&seat.spirit) else {
                log::debug!("ignoring play of unknown spirit {:?}", seat.spirit);
                continue;
            };
            let Some(stat) = rows[idx].per_participant.get_mut(&seat.participant) else {
                log::debug!("ignoring play by untracked participant {:?}", seat.participant);
                continue;
            };
            stat.record(record.date);
        }
    }

    CharacterStats { rows, index }
}

/// Play count, most recent play, and difficulty of one adversary level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdversaryLevelStat {
    pub plays: u32,
    pub last_played: Option<NaiveDate>,
    pub difficulty: i32,
}

/// An adversary with statistics for each addressable level, keyed by level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdversaryStatRow {
    pub adversary: AdversaryDefinition,
    pub levels: BTreeMap<u8, AdversaryLevelStat>,
}

impl AdversaryStatRow {
    #[must_use]
    pub fn total_plays(&self) -> u32 {
        self.levels.values().map(|s| s.plays).sum()
    }

    /// Highest level with at least one recorded play.
    #[must_use]
    pub fn highest_played_level(&self) -> Option<u8> {
        self.levels
            .iter()
            .rev()
            .find(|(_, stat)| stat.plays > 0)
            .map(|(&level, _)| level)
    }

    /// Most recent play at any level.
    #[must_use]
    pub fn last_played(&self) -> Option<NaiveDate> {
        self.levels.values().filter_map(|s| s.last_played).max()
    }
}

/// Adversary statistics in catalog order, addressable by adversary id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct AdversaryStats {
    rows: Vec<AdversaryStatRow>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl AdversaryStats {
    #[must_use]
    pub fn get(&self, adversary_id: &str) -> Option<&AdversaryStatRow> {
        self.index.get(adversary_id).map(|&idx| &self.rows[idx])
    }

    #[must_use]
    pub fn rows(&self) -> &[AdversaryStatRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AdversaryStatRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a AdversaryStats {
    type Item = &'a AdversaryStatRow;
    type IntoIter = std::slice::Iter<'a, AdversaryStatRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Count plays per adversary and level; a record without a level counts
/// against the base adversary (level 0).
///
/// Each adversary gets entries for level 0 through its highest declared
/// level, capped at `max_level`. Plays at levels outside that range are
/// skipped. Adversary plays are shared by all participants of the session.
#[must_use]
pub fn aggregate_adversary_stats(
    plays: &PlayLog,
    catalog: &AdversaryCatalog,
    max_level: u8,
) -> AdversaryStats {
    let mut rows: Vec<AdversaryStatRow> = catalog
        .iter()
        .map(|adversary| {
            let top = adversary.highest_declared_level().min(max_level);
            let levels = (0..=top)
                .map(|level| {
                    let stat = AdversaryLevelStat {
                        plays: 0,
                        last_played: None,
                        difficulty: adversary.difficulty_for(level),
                    };
                    (level, stat)
                })
                .collect();
            AdversaryStatRow {
                adversary: adversary.clone(),
                levels,
            }
        })
        .collect();
    let index: HashMap<String, usize> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (row.adversary.id.clone(), idx))
        .collect();

    for record in plays {
        let Some(adversary) = record.adversary.as_deref() else {
            continue;
        };
        let Some(&idx) = index.get(adversary) else {
            log::debug!("ignoring play against unknown adversary {adversary:?}");
            continue;
        };
        let level = record.level_or_base();
        let Some(stat) = rows[idx].levels.get_mut(&level) else {
            log::debug!("ignoring {adversary} play at unaddressable level {level}");
            continue;
        };
        stat.plays += 1;
        stat.last_played = stat.last_played.max(Some(record.date));
    }

    AdversaryStats { rows, index }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plays::PlayRecord;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spirits() -> SpiritCatalog {
        SpiritCatalog::from_json(
            r#"[
                {"spirit": "River Surges in Sunlight", "complexity": "Low", "source": "Base Game"},
                {"spirit": "Jagged Earth", "complexity": "Moderate", "source": "Test"},
                {"spirit": "Keeper of the Forbidden Wilds", "complexity": "High", "source": "Branch & Claw"}
            ]"#,
        )
        .unwrap()
    }

    fn adversaries() -> AdversaryCatalog {
        AdversaryCatalog::from_json(
            r#"[
                {"adversary": "England", "base_difficulty": 1, "levels": [
                    {"level": 1, "difficulty": 3},
                    {"level": 2, "difficulty": 4},
                    {"level": 4, "difficulty": 7}
                ]},
                {"adversary": "Sweden", "base_difficulty": 1}
            ]"#,
        )
        .unwrap()
    }

    fn participants() -> Vec<String> {
        vec!["A".to_string(), "E".to_string()]
    }

    #[test]
    fn untouched_cells_default_to_zero() {
        let stats = aggregate_character_stats(&PlayLog::empty(), &spirits(), &participants());
        assert_eq!(stats.len(), 3);
        for row in &stats {
            for participant in participants() {
                let stat = row.stat(&participant).unwrap();
                assert_eq!(stat.plays, 0);
                assert!(stat.last_played.is_none());
            }
        }
    }

    #[test]
    fn last_played_is_the_maximum_date() {
        let log: PlayLog = [day(2024, 1, 1), day(2024, 3, 15), day(2024, 2, 10)]
            .into_iter()
            .map(|date| PlayRecord::new(date).with_seat("A", "River Surges in Sunlight"))
            .collect();
        let stats = aggregate_character_stats(&log, &spirits(), &participants());
        let river = stats.get("River Surges in Sunlight").unwrap();
        assert_eq!(river.plays("A"), 3);
        assert_eq!(river.last_played("A"), Some(day(2024, 3, 15)));
        assert_eq!(river.plays("E"), 0);
    }

    #[test]
    fn unknown_references_are_ignored() {
        let log: PlayLog = [
            PlayRecord::new(day(2024, 1, 1))
                .with_seat("A", "Not A Spirit")
                .with_seat("Guest", "Jagged Earth")
                .with_seat("E", "Jagged Earth")
                .with_adversary("Atlantis", Some(2)),
        ]
        .into_iter()
        .collect();
        let stats = aggregate_character_stats(&log, &spirits(), &participants());
        let jagged = stats.get("Jagged Earth").unwrap();
        assert_eq!(jagged.plays("E"), 1);
        assert!(jagged.stat("Guest").is_none());
        assert!(stats.get("Not A Spirit").is_none());

        let adv = aggregate_adversary_stats(&log, &adversaries(), 6);
        assert!(adv.iter().all(|row| row.total_plays() == 0));
    }

    #[test]
    fn aggregation_ignores_log_order() {
        let records = vec![
            PlayRecord::new(day(2024, 5, 1))
                .with_seat("A", "Jagged Earth")
                .with_adversary("England", Some(1)),
            PlayRecord::new(day(2023, 9, 9))
                .with_seat("A", "Jagged Earth")
                .with_seat("E", "River Surges in Sunlight")
                .with_adversary("England", None),
            PlayRecord::new(day(2024, 2, 2)).with_seat("E", "River Surges in Sunlight"),
        ];
        let forward: PlayLog = records.iter().cloned().collect();
        let reversed: PlayLog = records.into_iter().rev().collect();

        assert_eq!(
            aggregate_character_stats(&forward, &spirits(), &participants()),
            aggregate_character_stats(&reversed, &spirits(), &participants())
        );
        assert_eq!(
            aggregate_adversary_stats(&forward, &adversaries(), 6),
            aggregate_adversary_stats(&reversed, &adversaries(), 6)
        );
    }

    #[test]
    fn adversary_levels_cover_base_through_highest_declared() {
        let stats = aggregate_adversary_stats(&PlayLog::empty(), &adversaries(), 6);
        let england = stats.get("England").unwrap();
        assert_eq!(
            england.levels.keys().copied().collect::<Vec<u8>>(),
            vec![0, 1, 2, 3, 4]
        );
        assert_eq!(england.levels[&0_u8].difficulty, 1);
        assert_eq!(england.levels[&2_u8].difficulty, 4);
        assert_eq!(england.levels[&3_u8].difficulty, 1);
        assert_eq!(england.levels[&4_u8].difficulty, 7);

        let sweden = stats.get("Sweden").unwrap();
        assert_eq!(sweden.levels.len(), 1);

        let capped = aggregate_adversary_stats(&PlayLog::empty(), &adversaries(), 2);
        assert_eq!(capped.get("England").unwrap().levels.len(), 3);
    }

    #[test]
    fn adversary_plays_default_to_base_level() {
        let log: PlayLog = [
            PlayRecord::new(day(2024, 1, 1)).with_adversary("England", None),
            PlayRecord::new(day(2024, 4, 1)).with_adversary("England", Some(1)),
            PlayRecord::new(day(2024, 3, 1)).with_adversary("England", Some(0)),
            PlayRecord::new(day(2024, 6, 1)).with_adversary("Sweden", Some(5)),
        ]
        .into_iter()
        .collect();
        let stats = aggregate_adversary_stats(&log, &adversaries(), 6);
        let england = stats.get("England").unwrap();
        assert_eq!(england.levels[&0_u8].plays, 2);
        assert_eq!(england.levels[&0_u8].last_played, Some(day(2024, 3, 1)));
        assert_eq!(england.highest_played_level(), Some(1));
        assert_eq!(england.last_played(), Some(day(2024, 4, 1)));

        let sweden = stats.get("Sweden").unwrap();
        assert_eq!(sweden.total_plays(), 0);
        assert!(sweden.highest_played_level().is_none());
    }

    #[test]
    fn empty_inputs_produce_empty_stats() {
        let stats = aggregate_character_stats(&PlayLog::empty(), &SpiritCatalog::empty(), &[]);
        assert!(stats.is_empty());
        let adv = aggregate_adversary_stats(&PlayLog::empty(), &AdversaryCatalog::empty(), 6);
        assert!(adv.is_empty());
    }
}
