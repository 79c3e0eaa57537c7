//! Core thread reconstruction for Zoom meeting chat transcripts.
//!
//! A saved Zoom chat is a flat list of lines where replies and emoji
//! reactions show up as separate lines that only quote the message they
//! belong to. This crate condenses the raw lines into records, classifies
//! each record and folds them, in order, into top-level messages with their
//! replies and emoji tallies.
//!
//! ```
//! use zoom_chat_threads_core::{build_threads, condense_lines, ThreadBuilderConfig};
//!
//! let lines = [
//!     "10:01:00 From John Doe to Everyone: Good morning folks",
//!     "10:02:00 From Alice to Everyone: Replying to \"Good morning folks\" Hi John",
//!     "10:03:00 From Bob to Everyone: Reacted to \"Good morning folks\" with 👋",
//! ];
//! let output = build_threads(condense_lines(lines), ThreadBuilderConfig::default());
//! assert_eq!(output.messages[0].format(), "10:01:00 John Doe [👋x1]: Good morning folks");
//! assert_eq!(output.messages[0].replies[0].content, "Hi John");
//! ```

mod classify;
mod condense;
mod error;
mod helpers;
mod key;
mod message;
pub mod pipeline;
mod render;
mod thread;

pub use classify::{classify, EmojiChange, ReactionTarget, Record, RecordCategory, DIRECT_MESSAGE_MARKER};
pub use condense::condense_lines;
pub use error::{ParseFault, ParseFaultKind, TranscriptError};
pub use helpers::{normalize_line, split_header, starts_record, RecordHeader};
pub use key::{extract_key, fallback_key, reply_body, truncate_key};
pub use message::{EmojiTally, Message};
pub use pipeline::{
    discover_transcripts, process_all_transcripts, process_transcript, read_transcript,
    write_json_output, PipelineConfig, PipelineResult, TranscriptResult,
};
pub use render::{render_messages, render_thread};
pub use thread::{
    build_threads, ThreadBuilder, ThreadBuilderConfig, ThreadOutput, ThreadStats, Verbosity,
};

/// Number of characters Zoom keeps when quoting a long message.
pub const KEY_PREFIX_CHARS: usize = 20;

/// Marker Zoom appends to a cut-down quote.
pub const KEY_ELLIPSIS: &str = "...";

/// File name Zoom gives a saved meeting chat.
pub const DEFAULT_TRANSCRIPT: &str = "meeting_saved_chat.txt";

/// Default prefix for reply lines when rendering.
pub const DEFAULT_INDENT: &str = "  ";
