//! Pipeline for turning transcript files into threads.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::condense::condense_lines;
use crate::error::{ParseFault, TranscriptError};
use crate::message::Message;
use crate::thread::{build_threads, ThreadBuilderConfig, ThreadOutput, ThreadStats, Verbosity};

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// File extension of transcripts when scanning a directory.
    pub extension: String,
    pub verbosity: Verbosity,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
            verbosity: Verbosity::Normal,
        }
    }
}

/// Threads rebuilt from a single transcript file.
#[derive(Debug, Serialize)]
pub struct TranscriptResult {
    pub source_path: String,
    pub messages: Vec<Message>,
    pub faults: Vec<ParseFault>,
    pub stats: ThreadStats,
}

/// Totals over every processed transcript.
#[derive(Debug, Default, Serialize)]
pub struct PipelineResult {
    pub total_transcripts: usize,
    pub total_messages: usize,
    pub total_replies: usize,
    pub total_reactions: usize,
    pub total_faults: usize,
}

impl PipelineResult {
    pub fn from_results(results: &[TranscriptResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            acc.total_transcripts += 1;
            acc.total_messages += r.stats.messages;
            acc.total_replies += r.stats.replies;
            acc.total_reactions += r.stats.reactions;
            acc.total_faults += r.faults.len();
            acc
        })
    }
}

/// Read a transcript file and condense it into records.
pub fn read_transcript(path: &Path) -> Result<Vec<String>, TranscriptError> {
    let content = std::fs::read_to_string(path).map_err(|source| TranscriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(condense_lines(content.lines()))
}

/// Rebuild the threads of a single transcript file.
pub fn process_transcript(
    path: &Path,
    config: &PipelineConfig,
) -> Result<ThreadOutput, TranscriptError> {
    let records = read_transcript(path)?;
    tracing::debug!(path = ?path, records = records.len(), "condensed transcript");

    let output = build_threads(
        &records,
        ThreadBuilderConfig {
            verbosity: config.verbosity,
        },
    );
    if !output.faults.is_empty() {
        tracing::warn!(path = ?path, faults = output.faults.len(), "transcript has malformed records");
    }
    Ok(output)
}

/// Find all transcripts with the given extension under `root`.
pub fn discover_transcripts(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == extension))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();
    paths
}

/// Process every transcript under `root` in parallel.
///
/// Each transcript gets its own builder. A transcript that cannot be read is
/// logged and skipped; it does not fail the batch.
pub fn process_all_transcripts(
    root: &Path,
    config: &PipelineConfig,
) -> Result<Vec<TranscriptResult>, TranscriptError> {
    let transcripts = discover_transcripts(root, &config.extension);

    if transcripts.is_empty() {
        return Err(TranscriptError::NoTranscripts {
            root: root.to_path_buf(),
            extension: config.extension.clone(),
        });
    }

    let total_files = transcripts.len();
    let processed_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    let results: Vec<TranscriptResult> = transcripts
        .into_par_iter()
        .filter_map(|path| {
            let result = process_transcript(&path, config);
            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

            match result {
                Ok(output) => {
                    if count % 100 == 0 || count == total_files {
                        tracing::info!("processed {}/{} transcripts", count, total_files);
                    }
                    Some(TranscriptResult {
                        source_path: path.to_string_lossy().to_string(),
                        messages: output.messages,
                        faults: output.faults,
                        stats: output.stats,
                    })
                }
                Err(error) => {
                    error_count.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(%error, path = ?path, "failed to process transcript");
                    None
                }
            }
        })
        .collect();

    let errors = error_count.load(Ordering::Relaxed);
    if errors > 0 {
        tracing::warn!("{} transcripts failed to process", errors);
    }

    Ok(results)
}

/// Write results as a pretty-printed JSON document.
pub fn write_json_output(
    results: &[TranscriptResult],
    output_path: &Path,
) -> Result<PipelineResult, TranscriptError> {
    use std::fs::File;
    use std::io::{BufWriter, Write};

    let write_error = |source: std::io::Error| TranscriptError::Write {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let mut file = BufWriter::new(File::create(output_path).map_err(write_error)?);
    serde_json::to_writer_pretty(&mut file, results)?;
    writeln!(file).map_err(write_error)?;
    file.flush().map_err(write_error)?;

    Ok(PipelineResult::from_results(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_transcript(path: &Path, lines: &[&str]) {
        let mut file = std::fs::File::create(path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
    }

    #[test]
    fn test_read_transcript_condenses_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("meeting_saved_chat.txt");
        write_transcript(
            &path,
            &[
                "10:01:00\t From John Doe to Everyone:",
                "\tGood morning folks",
                "10:02:00\t From Alice to Everyone:",
                "\tReplying to \"Good morning folks\"",
                "\tHi John",
            ],
        );

        let records = read_transcript(&path).unwrap();
        assert_eq!(
            records,
            vec![
                "10:01:00 From John Doe to Everyone: Good morning folks".to_string(),
                "10:02:00 From Alice to Everyone: Replying to \"Good morning folks\" Hi John"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_process_transcript() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("chat.txt");
        write_transcript(
            &path,
            &[
                "10:01:00 From John Doe to Everyone: Good morning folks",
                "10:02:00 From Alice to Everyone: Replying to \"Good morning folks\" Hi John",
                "10:03:00 From Bob to Everyone: add 👍",
            ],
        );

        let output = process_transcript(&path, &PipelineConfig::default()).unwrap();
        assert_eq!(output.messages.len(), 1);
        assert_eq!(output.messages[0].replies[0].emojis.get("👍"), Some(1));
    }

    #[test]
    fn test_missing_transcript_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = process_transcript(&temp.path().join("missing.txt"), &PipelineConfig::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_discover_transcripts() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("2024-01-02 Standup")).unwrap();
        std::fs::write(temp.path().join("a.txt"), "").unwrap();
        std::fs::write(temp.path().join("2024-01-02 Standup/meeting_saved_chat.txt"), "").unwrap();
        std::fs::write(temp.path().join("notes.md"), "").unwrap();

        let files = discover_transcripts(temp.path(), "txt");
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_process_all_transcripts_and_write_json() {
        let temp = TempDir::new().unwrap();
        write_transcript(
            &temp.path().join("one.txt"),
            &["10:01:00 From Ann to Everyone: hello"],
        );
        write_transcript(
            &temp.path().join("two.txt"),
            &[
                "10:01:00 From Bob to Everyone: hi",
                "10:02:00 From Cid to Everyone: Replying to \"hi\" hey",
                "10:03:00 Malformed record",
            ],
        );

        let results = process_all_transcripts(temp.path(), &PipelineConfig::default()).unwrap();
        assert_eq!(results.len(), 2);

        let out_path = temp.path().join("out/threads.json");
        let summary = write_json_output(&results, &out_path).unwrap();
        assert_eq!(summary.total_transcripts, 2);
        assert_eq!(summary.total_messages, 2);
        assert_eq!(summary.total_replies, 1);
        assert_eq!(summary.total_faults, 1);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
        assert_eq!(written.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = process_all_transcripts(temp.path(), &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, TranscriptError::NoTranscripts { .. }));
    }
}
