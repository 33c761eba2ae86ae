//! Tracker configuration: who is tracked and how history is seeded
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_PARTICIPANTS, MAX_ADVERSARY_LEVEL};

/// Allow-list of participant ids whose plays are tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ParticipantRoster(Vec<String>);

impl ParticipantRoster {
    #[must_use]
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        ids.sort();
        ids.dedup();
        Self(ids)
    }

    #[must_use]
    pub fn is_recognized(&self, participant: &str) -> bool {
        self.0.iter().any(|id| id == participant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
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

impl From<Vec<String>> for ParticipantRoster {
    fn from(ids: Vec<String>) -> Self {
        Self::new(ids)
    }
}

impl From<ParticipantRoster> for Vec<String> {
    fn from(roster: ParticipantRoster) -> Self {
        roster.0
    }
}

impl Default for ParticipantRoster {
    fn default() -> Self {
        Self::new(DEFAULT_PARTICIPANTS)
    }
}

/// Synthetic history: every tracked participant has played every spirit of
/// `source` on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSeed {
    pub source: String,
    pub date: NaiveDate,
}

/// Errors raised when tracker configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("participant roster is empty")]
    EmptyRoster,
    #[error("max_level {max_level} exceeds the level cap of {cap}")]
    LevelCap { max_level: u8, cap: u8 },
    #[error("baseline seed for {set:?} is listed more than once")]
    DuplicateBaseline { set: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub participants: ParticipantRoster,
    #[serde(default = "TrackerConfig::default_max_level")]
    pub max_level: u8,
    #[serde(default)]
    pub baseline: Vec<BaselineSeed>,
}

impl TrackerConfig {
    const fn default_max_level() -> u8 {
        MAX_ADVERSARY_LEVEL
    }

    /// Load configuration from a JSON object; absent fields take defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns an error when the roster is empty, the level cap is exceeded,
    /// or a baseline set is listed twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.participants.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        if self.max_level > MAX_ADVERSARY_LEVEL {
            return Err(ConfigError::LevelCap {
                max_level: self.max_level,
                cap: MAX_ADVERSARY_LEVEL,
            });
        }
        for (idx, seed) in self.baseline.iter().enumerate() {
            if self.baseline[..idx].iter().any(|s| s.source == seed.source) {
                return Err(ConfigError::DuplicateBaseline {
                    set: seed.source.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_participants(mut self, roster: ParticipantRoster) -> Self {
        self.participants = roster;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            participants: ParticipantRoster::default(),
            max_level: Self::default_max_level(),
            baseline: Vec::new(),
        }
    }
}
