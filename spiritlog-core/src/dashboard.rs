//! Every derived view of the play history, computed in one pass
use serde::Serialize;

use crate::aggregate::{
    AdversaryStats, CharacterStatRow, CharacterStats, aggregate_adversary_stats,
    aggregate_character_stats,
};
use crate::catalog::{AdversaryCatalog, SpiritCatalog};
use crate::config::TrackerConfig;
use crate::plays::PlayLog;
use crate::recommend::{
    AdversaryPick, Chooser, ParticipantRecommendations, recommend_adversaries, recommend_spirits,
};
use crate::sort::{SortState, project};
use crate::summary::{ParticipantSummary, summarize};

/// The three read-only inputs, fully loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub plays: PlayLog,
    pub spirits: SpiritCatalog,
    pub adversaries: AdversaryCatalog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub participants: Vec<String>,
    pub character_stats: CharacterStats,
    pub adversary_stats: AdversaryStats,
    pub spirit_recommendations: Vec<ParticipantRecommendations>,
    pub adversary_recommendations: Vec<AdversaryPick>,
    pub sort: SortState,
    /// Spirit ids in display order
    pub projected_rows: Vec<String>,
    pub summaries: Vec<ParticipantSummary>,
}

impl Dashboard {
    /// Recompute every view from `snapshot`.
    pub fn build(
        snapshot: &Snapshot,
        config: &TrackerConfig,
        chooser: &mut impl Chooser,
        sort: &SortState,
    ) -> Self {
        let participants = snapshot.plays.participants(&config.participants);
        let character_stats =
            aggregate_character_stats(&snapshot.plays, &snapshot.spirits, &participants);
        let adversary_stats =
            aggregate_adversary_stats(&snapshot.plays, &snapshot.adversaries, config.max_level);
        let spirit_recommendations = recommend_spirits(&character_stats, &participants, chooser);
        let adversary_recommendations = recommend_adversaries(&adversary_stats, config.max_level);
        let projected_rows = project(&character_stats, &sort.key, sort.direction)
            .into_iter()
            .map(|row| row.spirit.id.clone())
            .collect();
        let summaries = participants
            .iter()
            .map(|p| summarize(&character_stats, p))
            .collect();

        log::debug!(
            "dashboard built: {} plays, {} participants, {} spirits, {} adversaries",
            snapshot.plays.len(),
            participants.len(),
            character_stats.len(),
            adversary_stats.len()
        );

        Self {
            participants,
            character_stats,
            adversary_stats,
            spirit_recommendations,
            adversary_recommendations,
            sort: sort.clone(),
            projected_rows,
            summaries,
        }
    }

    /// Spirit rows in display order.
    #[must_use]
    pub fn projected(&self) -> Vec<&CharacterStatRow> {
        self.projected_rows
            .iter()
            .filter_map(|id| self.character_stats.get(id))
            .collect()
    }

    #[must_use]
    pub fn summary_for(&self, participant: &str) -> Option<&ParticipantSummary> {
        self.summaries.iter().find(|s| s.participant == participant)
    }

    #[must_use]
    pub fn recommendations_for(&self, participant: &str) -> Option<&ParticipantRecommendations> {
        self.spirit_recommendations
            .iter()
            .find(|r| r.participant == participant)
    }
}
