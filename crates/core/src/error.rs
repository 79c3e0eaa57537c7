//! Error types for transcript processing.

use std::path::PathBuf;

use serde::Serialize;

/// Errors that abort a run before or after thread reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Failed to read transcript {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No '.{extension}' transcripts found under {root:?}")]
    NoTranscripts { root: PathBuf, extension: String },

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranscriptError {
    /// Whether the error is a missing input file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Why a message or reply record could not be split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ParseFaultKind {
    #[error("missing ' From ' sender marker")]
    MissingSender,

    #[error("missing ' to Everyone: ' audience marker")]
    MissingAudience,

    #[error("reply has no text after its quoted reference")]
    MissingReplyBody,
}

/// A record that was skipped because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("record {position}: {kind}")]
pub struct ParseFault {
    /// Zero-based index of the record in the condensed transcript.
    pub position: usize,
    pub kind: ParseFaultKind,
    pub record: String,
}
