use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use spiritlog_core::{
    AdversaryCatalog, CommentEntry, DataLoader, MalformedRecordError, PlayLog, PlayLogError,
    SpiritCatalog, TrackerConfig,
};
use thiserror::Error;

/// Shape of the play log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PlayFormat {
    /// JSON array of structured play records
    #[default]
    Records,
    /// JSON array of exported session comments
    Comments,
}

#[derive(Debug, Error)]
pub enum FileDataError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to load play log {}: {source}", path.display())]
    Log { path: PathBuf, source: PlayLogError },
}

impl FileDataError {
    fn malformed(path: &Path, source: MalformedRecordError) -> Self {
        Self::Log {
            path: path.to_path_buf(),
            source: PlayLogError::Malformed(source),
        }
    }
}

/// Reads the tracker inputs from JSON files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDataLoader {
    pub plays: PathBuf,
    pub plays_format: PlayFormat,
    pub spirits: PathBuf,
    pub adversaries: PathBuf,
    /// Without a config file the tracker runs on defaults
    pub config: Option<PathBuf>,
}

impl FileDataLoader {
    /// Sample data shipped with the core crate.
    pub fn bundled() -> Self {
        let base = assets_data_root();
        Self {
            plays: base.join("plays.json"),
            plays_format: PlayFormat::Records,
            spirits: base.join("spirits.json"),
            adversaries: base.join("adversaries.json"),
            config: Some(base.join("tracker.json")),
        }
    }

    fn read(path: &Path) -> Result<String, FileDataError> {
        log::debug!("reading {}", path.display());
        fs::read_to_string(path).map_err(|source| FileDataError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn json_error(path: &Path) -> impl FnOnce(serde_json::Error) -> FileDataError + '_ {
        move |source| FileDataError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub fn assets_data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("spiritlog-core")
        .join("assets")
        .join("data")
}

impl DataLoader for FileDataLoader {
    type Error = FileDataError;

    fn load_plays(&self) -> Result<PlayLog, Self::Error> {
        let json = Self::read(&self.plays)?;
        match self.plays_format {
            PlayFormat::Records => {
                PlayLog::from_json(&json).map_err(|source| FileDataError::Log {
                    path: self.plays.clone(),
                    source,
                })
            }
            PlayFormat::Comments => {
                let entries: Vec<CommentEntry> =
                    serde_json::from_str(&json).map_err(Self::json_error(&self.plays))?;
                let catalog = self.load_spirits()?;
                PlayLog::from_comments(&entries, &catalog)
                    .map_err(|source| FileDataError::malformed(&self.plays, source))
            }
        }
    }

    fn load_spirits(&self) -> Result<SpiritCatalog, Self::Error> {
        let json = Self::read(&self.spirits)?;
        SpiritCatalog::from_json(&json).map_err(Self::json_error(&self.spirits))
    }

    fn load_adversaries(&self) -> Result<AdversaryCatalog, Self::Error> {
        let json = Self::read(&self.adversaries)?;
        AdversaryCatalog::from_json(&json).map_err(Self::json_error(&self.adversaries))
    }

    fn load_config(&self) -> Result<TrackerConfig, Self::Error> {
        let Some(path) = &self.config else {
            return Ok(TrackerConfig::default());
        };
        let json = Self::read(path)?;
        TrackerConfig::from_json(&json).map_err(Self::json_error(path))
    }
}
