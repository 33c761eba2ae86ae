//! Next-pick recommendations
//!
//! Spirits are recommended per participant and per complexity tier: a spirit
//! the participant has never played wins outright (picked at random among all
//! such spirits), otherwise the spirit played longest ago. Adversaries are
//! recommended one level above the highest level ever played, shared across
//! all participants.
use chrono::NaiveDate;
use rand::Rng;
use serde::{Serialize, Serializer};

use crate::aggregate::{AdversaryStats, CharacterStatRow, CharacterStats};
use crate::catalog::ComplexityTier;
use crate::constants::{REASON_LAST_PLAYED_PREFIX, REASON_NEVER_PLAYED};

/// Picks an index among `len` equally acceptable candidates.
///
/// This is the single point of non-determinism in recommendations; tests
/// substitute a fixed policy.
pub trait Chooser {
    /// Return an index in `0..len`. Called only with `len > 0`.
    fn choose(&mut self, len: usize) -> usize;
}

/// Uniform random choice backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomChooser<R> {
    rng: R,
}

impl<R: Rng> RandomChooser<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Chooser for RandomChooser<R> {
    fn choose(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always takes the first candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChooser;

impl Chooser for FirstChooser {
    fn choose(&mut self, _len: usize) -> usize {
        0
    }
}

/// Why a pick was suggested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    NeverPlayed,
    LastPlayed(NaiveDate),
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NeverPlayed => f.write_str(REASON_NEVER_PLAYED),
            Self::LastPlayed(date) => {
                write!(f, "{REASON_LAST_PLAYED_PREFIX} {}", date.format("%Y-%m-%d"))
            }
        }
    }
}

impl Serialize for Reason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpiritPick {
    pub tier: ComplexityTier,
    pub spirit: String,
    pub reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantRecommendations {
    pub participant: String,
    pub picks: Vec<SpiritPick>,
}

impl ParticipantRecommendations {
    #[must_use]
    pub fn pick_for(&self, tier: ComplexityTier) -> Option<&SpiritPick> {
        self.picks.iter().find(|p| p.tier == tier)
    }
}

fn pick_in_tier(
    members: &[&CharacterStatRow],
    participant: &str,
    chooser: &mut impl Chooser,
) -> Option<(String, Reason)> {
    let first = *members.first()?;
    let unplayed: Vec<&CharacterStatRow> = members
        .iter()
        .copied()
        .filter(|row| row.plays(participant) == 0)
        .collect();
    if !unplayed.is_empty() {
        let idx = chooser.choose(unplayed.len()).min(unplayed.len() - 1);
        return Some((unplayed[idx].spirit.id.clone(), Reason::NeverPlayed));
    }

    let mut oldest = first;
    for &row in &members[1..] {
        if row.last_played(participant) < oldest.last_played(participant) {
            oldest = row;
        }
    }
    let reason = oldest
        .last_played(participant)
        .map_or(Reason::NeverPlayed, Reason::LastPlayed);
    Some((oldest.spirit.id.clone(), reason))
}

/// One spirit suggestion per participant per tier.
///
/// Tiers without any catalog spirit produce no pick. Ties on the oldest
/// last-played date go to the spirit listed first in the catalog.
pub fn recommend_spirits(
    stats: &CharacterStats,
    participants: &[String],
    chooser: &mut impl Chooser,
) -> Vec<ParticipantRecommendations> {
    participants
        .iter()
        .map(|participant| {
            let picks = ComplexityTier::ALL
                .into_iter()
                .filter_map(|tier| {
                    let members: Vec<&CharacterStatRow> = stats
                        .iter()
                        .filter(|row| row.spirit.complexity == tier)
                        .collect();
                    pick_in_tier(&members, participant, chooser).map(|(spirit, reason)| {
                        SpiritPick {
                            tier,
                            spirit,
                            reason,
                        }
                    })
                })
                .collect();
            ParticipantRecommendations {
                participant: participant.clone(),
                picks,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdversaryPick {
    pub adversary: String,
    pub level: u8,
    pub difficulty: i32,
    pub reason: Reason,
    /// Most recent play at any level
    pub last_played: Option<NaiveDate>,
}

/// Suggest the next level for every adversary.
///
/// Never-played adversaries come first in catalog order, then the rest by
/// most recent play, oldest first.
#[must_use]
pub fn recommend_adversaries(stats: &AdversaryStats, max_level: u8) -> Vec<AdversaryPick> {
    let mut picks: Vec<AdversaryPick> = stats
        .iter()
        .map(|row| {
            let mut highest: Option<u8> = None;
            let mut last_played: Option<NaiveDate> = None;
            for (&level, stat) in row.levels.range(..=max_level) {
                if stat.plays == 0 {
                    continue;
                }
                highest = Some(level);
                last_played = last_played.max(stat.last_played);
            }
            let level = highest.map_or(0, |h| h.saturating_add(1).min(max_level));
            let reason = match (highest, last_played) {
                (Some(_), Some(date)) => Reason::LastPlayed(date),
                _ => Reason::NeverPlayed,
            };
            AdversaryPick {
                adversary: row.adversary.id.clone(),
                level,
                difficulty: row.adversary.difficulty_for(level),
                reason,
                last_played,
            }
        })
        .collect();
    picks.sort_by_key(|pick| pick.last_played);
    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate_adversary_stats, aggregate_character_stats};
    use crate::catalog::{AdversaryCatalog, SpiritCatalog};
    use crate::plays::{PlayLog, PlayRecord};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Always answers with the same index.
    struct FixedChooser(usize);

    impl Chooser for FixedChooser {
        fn choose(&mut self, _len: usize) -> usize {
            self.0
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spirits() -> SpiritCatalog {
        SpiritCatalog::from_json(
            r#"[
                {"spirit": "River Surges in Sunlight", "complexity": "Low"},
                {"spirit": "Vital Strength of the Earth", "complexity": "Low"},
                {"spirit": "Lightning's Swift Strike", "complexity": "Low"},
                {"spirit": "Shadows Flicker Like Flame", "complexity": "Moderate"},
                {"spirit": "Heart of the Wildfire", "complexity": "High"},
                {"spirit": "Keeper of the Forbidden Wilds", "complexity": "High"}
            ]"#,
        )
        .unwrap()
    }

    fn participants() -> Vec<String> {
        vec!["A".to_string(), "E".to_string()]
    }

    fn character_stats(records: Vec<PlayRecord>) -> CharacterStats {
        let log: PlayLog = records.into_iter().collect();
        aggregate_character_stats(&log, &spirits(), &participants())
    }

    #[test]
    fn reasons_render_exactly() {
        assert_eq!(Reason::NeverPlayed.to_string(), "never played");
        assert_eq!(
            Reason::LastPlayed(day(2024, 1, 5)).to_string(),
            "last played 2024-01-05"
        );
        assert_eq!(
            serde_json::to_string(&Reason::NeverPlayed).unwrap(),
            "\"never played\""
        );
    }

    #[test]
    fn unplayed_tier_picks_from_unplayed_members() {
        let stats = character_stats(vec![
            PlayRecord::new(day(2024, 1, 1)).with_seat("A", "River Surges in Sunlight"),
        ]);
        let recs = recommend_spirits(&stats, &participants(), &mut FixedChooser(1));
        let low = recs[0].pick_for(ComplexityTier::Low).unwrap();
        assert_eq!(low.reason, Reason::NeverPlayed);
        assert_eq!(low.spirit, "Lightning's Swift Strike");

        let recs = recommend_spirits(&stats, &participants(), &mut FirstChooser);
        let low = recs[0].pick_for(ComplexityTier::Low).unwrap();
        assert_eq!(low.spirit, "Vital Strength of the Earth");
    }

    #[test]
    fn random_pick_stays_within_unplayed_set() {
        let stats = character_stats(vec![
            PlayRecord::new(day(2024, 1, 1)).with_seat("A", "Vital Strength of the Earth"),
        ]);
        let mut chooser = RandomChooser::new(ChaCha8Rng::seed_from_u64(0x5EED));
        for _ in 0..50 {
            let recs = recommend_spirits(&stats, &participants(), &mut chooser);
            let low = recs[0].pick_for(ComplexityTier::Low).unwrap();
            assert!(
                low.spirit == "River Surges in Sunlight" || low.spirit == "Lightning's Swift Strike",
                "picked played spirit {}",
                low.spirit
            );
            assert_eq!(low.reason.to_string(), "never played");
        }
    }

    #[test]
    fn fully_played_tier_picks_oldest() {
        let stats = character_stats(vec![
            PlayRecord::new(day(2024, 6, 1)).with_seat("E", "Heart of the Wildfire"),
            PlayRecord::new(day(2024, 1, 1)).with_seat("E", "Keeper of the Forbidden Wilds"),
            PlayRecord::new(day(2024, 7, 1)).with_seat("E", "Keeper of the Forbidden Wilds"),
            PlayRecord::new(day(2023, 1, 1)).with_seat("E", "Heart of the Wildfire"),
        ]);
        let recs = recommend_spirits(&stats, &participants(), &mut FirstChooser);
        let high = recs[1].pick_for(ComplexityTier::High).unwrap();
        assert_eq!(high.spirit, "Heart of the Wildfire");
        assert_eq!(high.reason, Reason::LastPlayed(day(2024, 6, 1)));
    }

    #[test]
    fn oldest_ties_go_to_catalog_order() {
        let stats = character_stats(vec![
            PlayRecord::new(day(2024, 2, 2))
                .with_seat("A", "Keeper of the Forbidden Wilds")
                .with_seat("E", "Heart of the Wildfire"),
            PlayRecord::new(day(2024, 2, 2))
                .with_seat("A", "Heart of the Wildfire")
                .with_seat("E", "Keeper of the Forbidden Wilds"),
        ]);
        let recs = recommend_spirits(&stats, &participants(), &mut FirstChooser);
        for rec in &recs {
            let high = rec.pick_for(ComplexityTier::High).unwrap();
            assert_eq!(high.spirit, "Heart of the Wildfire");
        }
    }

    #[test]
    fn empty_tier_emits_no_pick() {
        let stats = character_stats(vec![]);
        let recs = recommend_spirits(&stats, &participants(), &mut FirstChooser);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].pick_for(ComplexityTier::VeryHigh).is_none());
        assert_eq!(recs[0].picks.len(), 3);
        assert_eq!(recs[0].participant, "A");
    }

    fn adversaries() -> AdversaryCatalog {
        AdversaryCatalog::from_json(
            r#"[
                {"adversary": "Scotland", "base_difficulty": 1, "levels": [
                    {"level": 1, "difficulty": 3}, {"level": 3, "difficulty": 5},
                    {"level": 6, "difficulty": 10}
                ]},
                {"adversary": "France", "base_difficulty": 2, "levels": [
                    {"level": 1, "difficulty": 3}, {"level": 2, "difficulty": 5},
                    {"level": 3, "difficulty": 7}, {"level": 6, "difficulty": 11}
                ]},
                {"adversary": "Russia", "base_difficulty": 1, "levels": [
                    {"level": 1, "difficulty": 3}
                ]}
            ]"#,
        )
        .unwrap()
    }

    fn adversary_picks(records: Vec<PlayRecord>) -> Vec<AdversaryPick> {
        let log: PlayLog = records.into_iter().collect();
        let stats = aggregate_adversary_stats(&log, &adversaries(), 6);
        recommend_adversaries(&stats, 6)
    }

    #[test]
    fn next_level_follows_highest_played() {
        let picks = adversary_picks(vec![
            PlayRecord::new(day(2024, 1, 1)).with_adversary("France", None),
            PlayRecord::new(day(2024, 3, 1)).with_adversary("France", Some(1)),
            PlayRecord::new(day(2024, 2, 1)).with_adversary("Scotland", Some(0)),
            PlayRecord::new(day(2024, 2, 5)).with_adversary("Scotland", Some(1)),
        ]);
        let france = picks.iter().find(|p| p.adversary == "France").unwrap();
        assert_eq!(france.level, 2);
        assert_eq!(france.difficulty, 5);
        assert_eq!(france.reason.to_string(), "last played 2024-03-01");

        let scotland = picks.iter().find(|p| p.adversary == "Scotland").unwrap();
        assert_eq!(scotland.level, 2);
        assert_eq!(scotland.difficulty, 1, "undeclared level uses base difficulty");
    }

    #[test]
    fn never_played_adversary_starts_at_base() {
        let picks = adversary_picks(vec![]);
        assert_eq!(picks.len(), 3);
        for pick in &picks {
            assert_eq!(pick.level, 0);
            assert_eq!(pick.reason, Reason::NeverPlayed);
        }
        assert_eq!(picks[1].difficulty, 2);
        let order: Vec<_> = picks.iter().map(|p| p.adversary.as_str()).collect();
        assert_eq!(order, vec!["Scotland", "France", "Russia"]);
    }

    #[test]
    fn level_is_capped_at_six() {
        let picks = adversary_picks(vec![
            PlayRecord::new(day(2024, 1, 1)).with_adversary("France", Some(6)),
        ]);
        let france = picks.iter().find(|p| p.adversary == "France").unwrap();
        assert_eq!(france.level, 6);
        assert_eq!(france.difficulty, 11);
    }

    #[test]
    fn never_played_sort_before_oldest_played() {
        let picks = adversary_picks(vec![
            PlayRecord::new(day(2024, 5, 1)).with_adversary("Scotland", Some(1)),
            PlayRecord::new(day(2024, 1, 1)).with_adversary("Russia", None),
        ]);
        let order: Vec<_> = picks.iter().map(|p| p.adversary.as_str()).collect();
        assert_eq!(order, vec!["France", "Russia", "Scotland"]);
        assert_eq!(picks[1].level, 1);
        assert_eq!(picks[1].difficulty, 3);
    }
}
