//! Merging of physical transcript lines into logical records.

use crate::helpers::{normalize_line, starts_record};

/// Condense raw transcript lines into records.
///
/// A line that starts with a timestamp opens a new record; every other line
/// is appended to the current record with a single space. Lines seen before
/// the first record have nothing to attach to and are dropped.
pub fn condense_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    let mut current: Option<String> = None;

    for line in lines {
        let normalized = normalize_line(line.as_ref());

        if starts_record(&normalized) {
            if let Some(done) = current.replace(normalized) {
                records.push(done);
            }
        } else if let Some(record) = current.as_mut() {
            record.push(' ');
            record.push_str(&normalized);
        }
    }

    records.extend(current);
    records
}
