//! Synthetic history for spirits played before logging started
use crate::catalog::SpiritCatalog;
use crate::config::{BaselineSeed, ParticipantRoster};
use crate::plays::{PlayLog, PlayRecord, PlayerSeat};

/// One synthetic record seating every participant with every spirit of the
/// seed's set. Returns `None` when the set has no spirits in the catalog.
#[must_use]
pub fn baseline_record(
    seed: &BaselineSeed,
    catalog: &SpiritCatalog,
    roster: &ParticipantRoster,
) -> Option<PlayRecord> {
    let mut record = PlayRecord::new(seed.date);
    for spirit in catalog.by_source(&seed.source) {
        for participant in roster.iter() {
            record
                .seats
                .push(PlayerSeat::new(participant, spirit.id.as_str()));
        }
    }
    if record.seats.is_empty() {
        log::warn!("baseline set {:?} matches no catalog spirits", seed.source);
        return None;
    }
    Some(record)
}

/// Copy of `log` with one synthetic record appended per seed.
#[must_use]
pub fn apply_baseline(
    log: &PlayLog,
    seeds: &[BaselineSeed],
    catalog: &SpiritCatalog,
    roster: &ParticipantRoster,
) -> PlayLog {
    log.iter()
        .cloned()
        .chain(
            seeds
                .iter()
                .filter_map(|seed| baseline_record(seed, catalog, roster)),
        )
        .collect()
}
