//! Matching keys that tie replies and reactions to the message they quote.
//!
//! Zoom quotes the message being replied or reacted to, cutting long messages
//! down to their first 20 characters followed by `...`. The fallback key of
//! an original message applies the same cut so the two sides compare equal.

use regex::Regex;
use std::sync::LazyLock;

use crate::helpers::{take_chars, AUDIENCE_MARKER};
use crate::{KEY_ELLIPSIS, KEY_PREFIX_CHARS};

// The quote captures are greedy and run to the last `"` of the text; the
// optional dots after them never match anything the capture did not take.
static REPLY_QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Replying to "(.*)\.?\.?\.?""#).unwrap());
static REACT_QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Reacted to "(.*)\.?\.?\.?""#).unwrap());
static REMOVE_QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Removed a .* reaction from "(.*)\.?\.?\.?""#).unwrap());
static REPLY_BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Replying to "(.*?)" (.*)"#).unwrap());

/// Derive the matching key for a record or message body.
pub fn extract_key(text: &str) -> String {
    [&*REPLY_QUOTE_RE, &*REACT_QUOTE_RE, &*REMOVE_QUOTE_RE]
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|quoted| quoted.as_str().trim().to_string())
        .unwrap_or_else(|| fallback_key(text))
}

/// Key of a record with no quoted reference.
///
/// Drops everything up to the first `From` and then the sender segment; when
/// either marker is missing the whole text is used instead.
pub fn fallback_key(text: &str) -> String {
    let rest = text.split_once("From").map_or(text, |(_, rest)| rest);
    let body = rest.split_once(AUDIENCE_MARKER).map_or(text, |(_, body)| body);
    truncate_key(body)
}

/// Cut a message body down the way quoted references are cut.
pub fn truncate_key(body: &str) -> String {
    if body.chars().count() > KEY_PREFIX_CHARS {
        format!("{}{}", take_chars(body, KEY_PREFIX_CHARS), KEY_ELLIPSIS)
            .trim()
            .to_string()
    } else {
        body.trim().to_string()
    }
}

/// The reply text following `Replying to "<quoted>" ` in a message body.
pub fn reply_body(content: &str) -> Option<&str> {
    REPLY_BODY_RE
        .captures(content)
        .and_then(|caps| caps.get(2))
        .map(|body| body.as_str())
}
