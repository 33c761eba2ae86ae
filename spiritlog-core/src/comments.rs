//! Session comments as written in the play-logging service.
//!
//! A comment carries the whole session in plain text:
//!
//! ```text
//! England L3
//! A: Lure
//! E: Shifting Memory
//! Coastal Lands
//! ```
//!
//! The first line names the adversary and level, the last line the map, and
//! every line in between a `participant: spirit` seat where the spirit may be
//! abbreviated to any fragment of its catalog name.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::SpiritCatalog;
use crate::constants::COMMENT_SEAT_SEPARATOR;
use crate::error::MalformedRecordError;
use crate::plays::{
    PlayLog, PlayRecord, PlayerSeat, RawLevelInput, Seats, deserialize_play_id, parse_level,
    parse_play_date,
};

static ADVERSARY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>.+?)\s+L(?P<level>\d+)$").expect("valid header regex"));

/// A logged play as exported by the logging service, before parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEntry {
    #[serde(default, deserialize_with = "deserialize_play_id")]
    pub play_id: Option<String>,
    pub date: String,
    #[serde(default)]
    pub comment: Option<String>,
}

fn split_header(header: &str) -> (Option<&str>, Option<&str>) {
    if header.is_empty() {
        return (None, None);
    }
    match ADVERSARY_HEADER.captures(header) {
        Some(caps) => (
            caps.name("name").map(|m| m.as_str().trim()),
            caps.name("level").map(|m| m.as_str()),
        ),
        None => (Some(header), None),
    }
}

fn parse_seat(line: &str, catalog: &SpiritCatalog) -> Option<PlayerSeat> {
    let Some((participant, fragment)) = line.split_once(COMMENT_SEAT_SEPARATOR) else {
        log::warn!("seat line {line:?} has no participant separator; skipping");
        return None;
    };
    let Some(spirit) = catalog.resolve_fragment(fragment) else {
        log::warn!("could not find spirit for {fragment:?}; skipping seat");
        return None;
    };
    Some(PlayerSeat::new(participant.trim(), spirit.id.as_str()))
}

/// Parse a single session comment into a play record.
///
/// Entries without a comment carry no session data and yield `None`.
///
/// # Errors
///
/// Returns an error if the date or the adversary level cannot be parsed.
pub fn parse_play_comment(
    index: usize,
    entry: &CommentEntry,
    catalog: &SpiritCatalog,
) -> Result<Option<PlayRecord>, MalformedRecordError> {
    // A blank first line is a session without an adversary.
    let Some(comment) = entry.comment.as_deref().map(str::trim_end) else {
        return Ok(None);
    };
    if comment.trim_start().is_empty() {
        return Ok(None);
    }
    let play_id = entry.play_id.as_deref();
    let date = parse_play_date(&entry.date)
        .ok_or_else(|| MalformedRecordError::new(index, play_id, "date", entry.date.clone()))?;

    let lines: Vec<&str> = comment.lines().map(str::trim).collect();
    let (adversary, level_text) = split_header(lines[0]);
    let level = match level_text {
        Some(text) => parse_level(index, play_id, RawLevelInput::Text(text))?,
        None => None,
    };

    let mut record = PlayRecord::new(date);
    record.play_id = entry.play_id.clone();
    record.adversary = adversary.map(str::to_string);
    record.level = level;
    if lines.len() >= 2 {
        let last = lines.len() - 1;
        record.map = Some(lines[last].to_string()).filter(|m| !m.is_empty());
        record.seats = lines[1..last]
            .iter()
            .filter(|line| !line.is_empty())
            .filter_map(|line| parse_seat(line, catalog))
            .collect::<Seats>();
    }
    Ok(Some(record))
}

impl PlayLog {
    /// Build a play log from exported session comments, skipping entries
    /// that carry no comment.
    ///
    /// # Errors
    ///
    /// Returns the first record whose date or level cannot be parsed.
    pub fn from_comments(
        entries: &[CommentEntry],
        catalog: &SpiritCatalog,
    ) -> Result<Self, MalformedRecordError> {
        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if let Some(record) = parse_play_comment(index, entry, catalog)? {
                records.push(record);
            }
        }
        Ok(Self(records))
    }
}
