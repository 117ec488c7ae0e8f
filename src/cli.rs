//! Command-line interface module for filesort.
//!
//! This module handles:
//! - Argument parsing (clap)
//! - Merging configuration files with command-line overrides
//! - Running the `clean` and `sort` tasks, with `sort` cleaning first

use crate::config::SortConfig;
use crate::output::{ConsoleSink, DiagnosticSink, Level, OutputFormatter};
use crate::sorter::{SortReport, Sorter};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sort the files of a folder by creation month or by extension.
#[derive(Debug, Parser)]
#[command(name = "filesort", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: SortCommand,

    #[command(flatten)]
    pub settings: Settings,
}

/// Sent to the sink before a dry run.
pub const DRY_RUN_NOTICE: &str = "[DRY RUN] No files will be removed, created or copied.";

/// Settings shared by every task; each overrides the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct Settings {
    /// Configuration file (defaults to .filesortrc.toml, then ~/.config/filesort/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Folder whose files are sorted
    #[arg(long, global = true)]
    pub folder: Option<PathBuf>,

    /// Output root receiving the sorted subdirectories
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Sort type: "date" or "extension"
    #[arg(long = "sort-type", global = true)]
    pub sort_type: Option<String>,
}

impl Settings {
    /// Loads the configuration file and applies command-line overrides.
    pub fn resolve(&self) -> Result<SortConfig, String> {
        let config = SortConfig::load(self.config.as_deref())
            .map_err(|e| format!("Error loading configuration: {}", e))?;
        Ok(config.with_overrides(
            self.folder.clone(),
            self.output.clone(),
            self.sort_type.clone(),
        ))
    }
}

/// A task to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum SortCommand {
    /// Remove the output root.
    Clean,
    /// Clean the output root, then sort the source folder into it.
    Sort {
        /// Show where files would go without touching the filesystem.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Runs a task, reporting to the terminal.
///
/// # Examples
///
/// ```no_run
/// use filesort::cli::{run_cli, Settings, SortCommand};
///
/// let settings = Settings {
///     folder: Some("/path/to/inbox".into()),
///     sort_type: Some("extension".to_string()),
///     ..Default::default()
/// };
/// if let Err(e) = run_cli(SortCommand::Sort { dry_run: false }, &settings) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: SortCommand, settings: &Settings) -> Result<(), String> {
    let config = settings.resolve()?;
    if let Some(report) = run_with_config(command, config, &mut ConsoleSink)? {
        OutputFormatter::summary_table(&report.counts_by_classification(), report.file_count());
    }
    Ok(())
}

/// Runs a task with an already resolved configuration.
///
/// All progress goes to `sink`. Returns the report of a sort or dry run,
/// or `None` for `clean`.
pub fn run_with_config(
    command: SortCommand,
    config: SortConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<Option<SortReport>, String> {
    let sorter = Sorter::new(config);

    match command {
        SortCommand::Clean => {
            sorter.clean(sink).map_err(|e| e.to_string())?;
            Ok(None)
        }
        SortCommand::Sort { dry_run: true } => {
            sink.emit(Level::Warning, DRY_RUN_NOTICE);
            sorter.plan(sink).map(Some).map_err(|e| e.to_string())
        }
        SortCommand::Sort { dry_run: false } => {
            sorter.clean(sink).map_err(|e| e.to_string())?;
            sorter.run(sink).map(Some).map_err(|e| e.to_string())
        }
    }
}
