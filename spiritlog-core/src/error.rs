//! Errors raised while turning raw history into play records
use thiserror::Error;

use crate::config::ConfigError;

/// A play record whose fields cannot be trusted for aggregation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "play record #{index} (id {}) has malformed {field}: {value:?}",
    .play_id.as_deref().unwrap_or("none")
)]
pub struct MalformedRecordError {
    /// Position of the record in the incoming log
    pub index: usize,
    pub play_id: Option<String>,
    pub field: &'static str,
    pub value: String,
}

impl MalformedRecordError {
    #[must_use]
    pub fn new(
        index: usize,
        play_id: Option<&str>,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self {
            index,
            play_id: play_id.map(str::to_string),
            field,
            value: value.into(),
        }
    }
}

/// Failure to load a play log.
#[derive(Debug, Error)]
pub enum PlayLogError {
    #[error("play log JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
}

/// Failure to set up a tracker from its data source.
#[derive(Debug, Error)]
pub enum TrackerError<E>
where
    E: std::error::Error + 'static,
{
    #[error("tracker inputs could not be loaded: {0}")]
    Load(#[source] E),
    #[error("invalid tracker configuration: {0}")]
    Config(#[from] ConfigError),
}
