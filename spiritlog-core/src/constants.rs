//! Fixed limits and defaults for the tracker.

/// Highest escalation level any adversary can be played at.
pub const MAX_ADVERSARY_LEVEL: u8 = 6;

/// Participants tracked when no configuration says otherwise.
pub const DEFAULT_PARTICIPANTS: [&str; 2] = ["A", "E"];

// Recommendation reasons ---------------------------------------------------
pub(crate) const REASON_NEVER_PLAYED: &str = "never played";
pub(crate) const REASON_LAST_PLAYED_PREFIX: &str = "last played";

// Comment layout -----------------------------------------------------------
pub(crate) const COMMENT_SEAT_SEPARATOR: &str = ": ";
