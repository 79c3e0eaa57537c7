//! CLI tool for rebuilding reply threads from saved Zoom meeting chats.
//!
//! Given a single transcript it prints each top-level message with its emoji
//! tally and indented replies. Given a directory it processes every transcript
//! found below it and writes the threads as JSON.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use zoom_chat_threads_core::{
    process_all_transcripts, process_transcript, render_messages, write_json_output,
    PipelineConfig, TranscriptResult, Verbosity, DEFAULT_INDENT, DEFAULT_TRANSCRIPT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Rebuild reply threads and emoji reactions from a Zoom chat transcript.
#[derive(Parser, Debug)]
#[command(name = "zoom-chat-threads")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transcript file, or a directory to scan for transcripts
    #[arg(default_value = DEFAULT_TRANSCRIPT)]
    input: PathBuf,

    /// Output format for a single transcript [default: text]; directory input always writes JSON
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write JSON to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Prefix for reply lines in text output [default: two spaces]; not valid with directory input
    #[arg(long)]
    indent: Option<String>,

    /// Transcript file extension when scanning a directory
    #[arg(long, default_value = "txt")]
    extension: String,

    /// Log every record and every dropped reply or reaction
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.debug);

    let config = PipelineConfig {
        extension: args.extension.clone(),
        verbosity: if args.debug {
            Verbosity::Trace
        } else {
            Verbosity::Normal
        },
    };

    if args.input.is_dir() {
        check_directory_flags(&args)?;
        return run_directory(&args, &config);
    }

    let output = match process_transcript(&args.input, &config) {
        Ok(output) => output,
        Err(e) if e.is_not_found() => {
            eprintln!("File {:?} not found.", args.input);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    match args.format.unwrap_or(OutputFormat::Text) {
        OutputFormat::Text => {
            let indent = args.indent.as_deref().unwrap_or(DEFAULT_INDENT);
            println!("{}", render_messages(&output.messages, indent));
        }
        OutputFormat::Json => {
            let result = TranscriptResult {
                source_path: args.input.to_string_lossy().to_string(),
                messages: output.messages,
                faults: output.faults,
                stats: output.stats,
            };
            write_json(&[result], args.output.as_deref())?;
        }
    }

    Ok(())
}

/// Reject text-only flags when scanning a directory, which always writes JSON.
fn check_directory_flags(args: &Args) -> Result<(), String> {
    if args.format == Some(OutputFormat::Text) {
        return Err(format!(
            "--format text needs a single transcript; {:?} is a directory and is written as JSON",
            args.input
        ));
    }
    if args.indent.is_some() {
        return Err(format!(
            "--indent only applies to text output; {:?} is a directory and is written as JSON",
            args.input
        ));
    }
    Ok(())
}

fn run_directory(args: &Args, config: &PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Processing transcripts under {:?}...", args.input);
    let results = process_all_transcripts(&args.input, config)?;
    write_json(&results, args.output.as_deref())
}

fn write_json(
    results: &[TranscriptResult],
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = output else {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    };

    let summary = write_json_output(results, path)?;
    eprintln!("\n[summary]");
    eprintln!("  Transcripts: {}", summary.total_transcripts);
    eprintln!("  Messages: {}", summary.total_messages);
    eprintln!("  Replies: {}", summary.total_replies);
    eprintln!("  Reactions: {}", summary.total_reactions);
    eprintln!("  Malformed records: {}", summary.total_faults);
    eprintln!("  Output: {:?}", path);
    Ok(())
}
