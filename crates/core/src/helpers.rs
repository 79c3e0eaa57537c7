//! Helper functions for transcript text processing.

use crate::error::ParseFaultKind;

/// Marker separating the timestamp from the sender in a record.
pub const SENDER_MARKER: &str = " From ";

/// Marker separating the sender from the message body in a record.
pub const AUDIENCE_MARKER: &str = " to Everyone: ";

/// Normalize a raw transcript line.
///
/// Trims surrounding whitespace, turns tabs into spaces and collapses doubled
/// spaces in a single left-to-right pass (so a run of four spaces becomes two).
pub fn normalize_line(line: &str) -> String {
    line.trim().replace('\t', " ").replace("  ", " ")
}

/// Whether a normalized line opens a new record.
///
/// The check is purely positional: longer than 8 characters, with `:` at
/// character positions 2 and 5 (the shape of an `HH:MM:SS` timestamp).
pub fn starts_record(line: &str) -> bool {
    let mut chars = line.chars();
    let third = chars.nth(2);
    let sixth = chars.nth(2);
    third == Some(':') && sixth == Some(':') && line.chars().count() > 8
}

/// Return the first `count` characters of `text` (not bytes).
pub fn take_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The timestamp, sender and body of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader<'a> {
    pub timestamp: &'a str,
    pub name: &'a str,
    pub content: &'a str,
}

/// Split a record into timestamp, sender and body.
pub fn split_header(record: &str) -> Result<RecordHeader<'_>, ParseFaultKind> {
    let (timestamp, rest) = record
        .split_once(SENDER_MARKER)
        .ok_or(ParseFaultKind::MissingSender)?;
    let (name, content) = rest
        .split_once(AUDIENCE_MARKER)
        .ok_or(ParseFaultKind::MissingAudience)?;
    Ok(RecordHeader {
        timestamp,
        name,
        content,
    })
}
