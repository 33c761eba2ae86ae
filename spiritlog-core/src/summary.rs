//! Per-participant totals
use serde::Serialize;

use crate::aggregate::CharacterStats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    pub spirit: String,
    pub plays: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSummary {
    pub participant: String,
    pub total_plays: u32,
    /// Most played spirit; absent until the participant has played anything
    pub favorite: Option<Favorite>,
}

/// Total plays and most-played spirit of `participant`.
///
/// Ties for most played go to the spirit listed first in the catalog.
#[must_use]
pub fn summarize(stats: &CharacterStats, participant: &str) -> ParticipantSummary {
    let mut total_plays = 0;
    let mut favorite: Option<Favorite> = None;
    for row in stats {
        let plays = row.plays(participant);
        total_plays += plays;
        if plays > favorite.as_ref().map_or(0, |f| f.plays) {
            favorite = Some(Favorite {
                spirit: row.spirit.id.clone(),
                plays,
            });
        }
    }
    ParticipantSummary {
        participant: participant.to_string(),
        total_plays,
        favorite,
    }
}
