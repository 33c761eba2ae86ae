//! Spiritlog Core
//!
//! Play-history statistics and next-pick recommendations for a cooperative
//! board game. This crate turns an already-loaded play log and the spirit and
//! adversary catalogs into derived views, without any rendering or I/O.

pub mod aggregate;
pub mod baseline;
pub mod catalog;
pub mod comments;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod plays;
pub mod recommend;
pub mod sort;
pub mod summary;

// Re-export commonly used types
pub use aggregate::{
    AdversaryLevelStat, AdversaryStatRow, AdversaryStats, CharacterPlayStat, CharacterStatRow,
    CharacterStats, aggregate_adversary_stats, aggregate_character_stats,
};
pub use baseline::{apply_baseline, baseline_record};
pub use catalog::{
    AdversaryCatalog, AdversaryDefinition, AdversaryLevel, ComplexityTier, SpiritCatalog,
    SpiritDefinition,
};
pub use comments::{CommentEntry, parse_play_comment};
pub use config::{BaselineSeed, ConfigError, ParticipantRoster, TrackerConfig};
pub use dashboard::{Dashboard, Snapshot};
pub use error::{MalformedRecordError, PlayLogError, TrackerError};
pub use plays::{PlayLog, PlayRecord, PlayerSeat, parse_play_date};
pub use recommend::{
    AdversaryPick, Chooser, FirstChooser, ParticipantRecommendations, RandomChooser, Reason,
    SpiritPick, recommend_adversaries, recommend_spirits,
};
pub use sort::{SortDirection, SortKey, SortKeyError, SortState, compare, project};
pub use summary::{Favorite, ParticipantSummary, summarize};

/// Trait for abstracting where the inputs come from
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the play history
    ///
    /// # Errors
    ///
    /// Returns an error if the play log cannot be loaded or a record is malformed.
    fn load_plays(&self) -> Result<PlayLog, Self::Error>;

    /// Load the spirit catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or parsed.
    fn load_spirits(&self) -> Result<SpiritCatalog, Self::Error>;

    /// Load the adversary catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or parsed.
    fn load_adversaries(&self) -> Result<AdversaryCatalog, Self::Error>;

    /// Load tracker configuration; defaults when the platform has none
    ///
    /// # Errors
    ///
    /// Returns an error if configuration exists but cannot be parsed.
    fn load_config(&self) -> Result<TrackerConfig, Self::Error> {
        Ok(TrackerConfig::default())
    }
}

/// Entry point tying a data source to the statistics engine
pub struct Tracker<L>
where
    L: DataLoader,
{
    data_loader: L,
    config: TrackerConfig,
}

impl<L> Tracker<L>
where
    L: DataLoader,
{
    /// Create a tracker with explicit configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(data_loader: L, config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            data_loader,
            config,
        })
    }

    /// Create a tracker using the loader's own configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn from_loader(data_loader: L) -> Result<Self, TrackerError<L::Error>> {
        let config = data_loader.load_config().map_err(TrackerError::Load)?;
        Ok(Self::new(data_loader, config)?)
    }

    #[must_use]
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Load all three inputs and append configured baseline history.
    ///
    /// # Errors
    ///
    /// Returns an error if any input cannot be loaded.
    pub fn load_snapshot(&self) -> Result<Snapshot, L::Error> {
        let spirits = self.data_loader.load_spirits()?;
        let adversaries = self.data_loader.load_adversaries()?;
        let logged = self.data_loader.load_plays()?;
        let plays = if self.config.baseline.is_empty() {
            logged
        } else {
            apply_baseline(
                &logged,
                &self.config.baseline,
                &spirits,
                &self.config.participants,
            )
        };
        Ok(Snapshot {
            plays,
            spirits,
            adversaries,
        })
    }

    /// Load inputs and compute every view.
    ///
    /// # Errors
    ///
    /// Returns an error if any input cannot be loaded.
    pub fn dashboard(
        &self,
        chooser: &mut impl Chooser,
        sort: &SortState,
    ) -> Result<Dashboard, L::Error> {
        let snapshot = self.load_snapshot()?;
        Ok(Dashboard::build(&snapshot, &self.config, chooser, sort))
    }
}
