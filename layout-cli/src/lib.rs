//! # Layout Editor CLI
//!
//! Headless host for the layout editor document model.
//!
//! ## Usage
//!
//! Replay a recorded command script, optionally on top of a saved document:
//!
//! ```bash
//! layout-editor replay script.json --input layout.json --output out.json
//! ```
//!
//! Re-emit a saved document in normalized form:
//!
//! ```bash
//! layout-editor normalize layout.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `EditorConfig` - Built from an optional JSON file, then CLI/env overrides
//! - `replay` / `normalize` - Pure file-to-string operations used by `run`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use layout_core::{schema, EditorConfig, Session};

/// Command-line arguments for layout-editor.
#[derive(Debug, Clone, Parser)]
#[command(name = "layout-editor")]
#[command(about = "Replay edits against layout documents and normalize saved files")]
#[command(version)]
pub struct CliArgs {
    /// Maximum number of undo checkpoints kept per session
    #[arg(long, global = true, env = "LAYOUT_HISTORY_LIMIT")]
    pub history_limit: Option<usize>,

    /// Editor configuration file (JSON)
    #[arg(long, global = true, env = "LAYOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Operation to run
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Operations offered by the CLI.
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Apply a JSON array of commands to a session and print the result
    Replay {
        /// Command script (JSON array)
        script: PathBuf,

        /// Snapshot to import before replaying
        #[arg(long)]
        input: Option<PathBuf>,

        /// Write the resulting snapshot here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Parse a snapshot, repair its invariants and print it again
    Normalize {
        /// Snapshot file to normalize
        snapshot: PathBuf,

        /// Write the normalized snapshot here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Outcome of replaying a command script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Number of commands applied.
    pub commands: usize,
    /// Objects in the final snapshot.
    pub objects: usize,
    /// Undo checkpoints left in the history.
    pub undo_depth: usize,
    /// Redo checkpoints left in the history.
    pub redo_depth: usize,
    /// The final snapshot as JSON.
    pub json: String,
}

/// Build the editor configuration.
///
/// The config file is read first; `--history-limit` (or its environment
/// variable) overrides whatever the file says.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
pub fn load_config(args: &CliArgs) -> anyhow::Result<EditorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = read_file(path)?;
            EditorConfig::from_json(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => EditorConfig::default(),
    };
    if let Some(limit) = args.history_limit {
        config = config.with_history_limit(Some(limit));
    }
    tracing::debug!("Editor config: {:?}", config);
    Ok(config)
}

/// Replay a command script against a new session.
///
/// # Errors
///
/// Returns an error if a file cannot be read or does not parse.
pub fn replay(
    config: &EditorConfig,
    script: &Path,
    input: Option<&Path>,
) -> anyhow::Result<ReplayReport> {
    let mut session = Session::new(config);

    if let Some(path) = input {
        let text = read_file(path)?;
        session
            .import_json(&text)
            .with_context(|| format!("Invalid snapshot {}", path.display()))?;
        tracing::info!(
            "Imported {} objects from {}",
            session.snapshot().len(),
            path.display()
        );
    }

    let text = read_file(script)?;
    let commands = schema::commands_from_json(&text)
        .with_context(|| format!("Invalid command script {}", script.display()))?;
    let count = commands.len();
    session.dispatch_all(commands);

    let history = session.history();
    let report = ReplayReport {
        commands: count,
        objects: session.snapshot().len(),
        undo_depth: history.past_len(),
        redo_depth: history.future_len(),
        json: session.export_json()?,
    };
    tracing::info!(
        commands = report.commands,
        objects = report.objects,
        undo = report.undo_depth,
        redo = report.redo_depth,
        "Replay finished"
    );
    Ok(report)
}

/// Parse a snapshot file and return it re-encoded in normalized form.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid snapshot.
pub fn normalize(path: &Path) -> anyhow::Result<String> {
    let text = read_file(path)?;
    let snapshot = schema::from_json(&text)
        .with_context(|| format!("Invalid snapshot {}", path.display()))?;
    tracing::debug!("Normalized {} objects", snapshot.len());
    Ok(schema::to_json(&snapshot)?)
}

/// Run the operation selected on the command line.
///
/// # Errors
///
/// Returns an error if configuration, input or output fails.
pub fn run(args: &CliArgs) -> anyhow::Result<()> {
    let config = load_config(args)?;
    match &args.command {
        CliCommand::Replay {
            script,
            input,
            output,
        } => {
            let report = replay(&config, script, input.as_deref())?;
            emit(&report.json, output.as_deref())
        }
        CliCommand::Normalize { snapshot, output } => {
            let json = normalize(snapshot)?;
            emit(&json, output.as_deref())
        }
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn emit(json: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
