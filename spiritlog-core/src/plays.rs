//! Historical play log
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeSet;

use crate::config::ParticipantRoster;
use crate::error::{MalformedRecordError, PlayLogError};

/// One participant and the spirit they played in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSeat {
    #[serde(alias = "player")]
    pub participant: String,
    #[serde(alias = "character")]
    pub spirit: String,
}

impl PlayerSeat {
    #[must_use]
    pub fn new(participant: impl Into<String>, spirit: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            spirit: spirit.into(),
        }
    }
}

/// Seats of a single session; the game seats at most four without spilling.
pub type Seats = SmallVec<[PlayerSeat; 4]>;

/// A single logged game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub date: NaiveDate,
    pub seats: Seats,
    pub adversary: Option<String>,
    pub level: Option<u8>,
    #[serde(default)]
    pub play_id: Option<String>,
    #[serde(default)]
    pub map: Option<String>,
}

impl PlayRecord {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            seats: Seats::new(),
            adversary: None,
            level: None,
            play_id: None,
            map: None,
        }
    }

    #[must_use]
    pub fn with_seat(mut self, participant: &str, spirit: &str) -> Self {
        self.seats.push(PlayerSeat::new(participant, spirit));
        self
    }

    #[must_use]
    pub fn with_adversary(mut self, adversary: &str, level: Option<u8>) -> Self {
        self.adversary = Some(adversary.to_string());
        self.level = level;
        self
    }

    /// Adversary level, with an unrecorded level meaning the base adversary.
    #[must_use]
    pub fn level_or_base(&self) -> u8 {
        self.level.unwrap_or(0)
    }
}

/// Parse a calendar date, discarding any time-of-day suffix.
#[must_use]
pub fn parse_play_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10)?;
    let rest = &raw[10..];
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Number(i64),
    Text(String),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawPlayRecord {
    date: String,
    #[serde(default, alias = "players")]
    seats: Seats,
    #[serde(default)]
    adversary: Option<String>,
    #[serde(default)]
    level: Option<RawScalar>,
    #[serde(default, deserialize_with = "deserialize_play_id")]
    play_id: Option<String>,
    #[serde(default)]
    map: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Play ids arrive as numbers or text depending on the export.
pub(crate) fn deserialize_play_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(non_empty(raw.map(RawScalar::into_text)))
}

/// Parse an adversary level given as a number or numeric text.
///
/// Blank text means no level was recorded.
pub(crate) fn parse_level(
    index: usize,
    play_id: Option<&str>,
    raw: RawLevelInput<'_>,
) -> Result<Option<u8>, MalformedRecordError> {
    let malformed = |value: String| MalformedRecordError::new(index, play_id, "level", value);
    match raw {
        RawLevelInput::Number(n) => u8::try_from(n)
            .map(Some)
            .map_err(|_| malformed(n.to_string())),
        RawLevelInput::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<u8>()
                .map(Some)
                .map_err(|_| malformed(text.to_string()))
        }
    }
}

pub(crate) enum RawLevelInput<'a> {
    Number(i64),
    Text(&'a str),
}

impl RawPlayRecord {
    fn into_record(self, index: usize) -> Result<PlayRecord, MalformedRecordError> {
        let play_id = self.play_id;
        let date = parse_play_date(&self.date).ok_or_else(|| {
            MalformedRecordError::new(index, play_id.as_deref(), "date", self.date.clone())
        })?;
        let level = match self.level {
            None => None,
            Some(RawScalar::Number(n)) => {
                parse_level(index, play_id.as_deref(), RawLevelInput::Number(n))?
            }
            Some(RawScalar::Text(text)) => {
                parse_level(index, play_id.as_deref(), RawLevelInput::Text(&text))?
            }
        };
        Ok(PlayRecord {
            date,
            seats: self.seats,
            adversary: non_empty(self.adversary),
            level,
            play_id,
            map: non_empty(self.map),
        })
    }
}

/// Ordered, read-only history of play records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayLog(pub Vec<PlayRecord>);

impl PlayLog {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    /// Load a play log from a JSON array of records with string dates
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed, or a record carries a
    /// date or level that cannot be interpreted.
    pub fn from_json(json: &str) -> Result<Self, PlayLogError> {
        let raw: Vec<RawPlayRecord> = serde_json::from_str(json)?;
        let records = raw
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_record(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(records))
    }

    /// Recognized participants appearing in the log, sorted ascending.
    #[must_use]
    pub fn participants(&self, roster: &ParticipantRoster) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|record| record.seats.iter())
            .filter(|seat| roster.is_recognized(&seat.participant))
            .map(|seat| seat.participant.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayRecord> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a PlayLog {
    type Item = &'a PlayRecord;
    type IntoIter = std::slice::Iter<'a, PlayRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<PlayRecord> for PlayLog {
    fn from_iter<I: IntoIterator<Item = PlayRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
