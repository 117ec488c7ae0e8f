//! Diagnostics and console output.
//!
//! The sorting core reports progress through a [`DiagnosticSink`] passed in by
//! the caller, so it never writes to the process streams itself. The CLI uses
//! [`ConsoleSink`], which styles lines the same way as [`OutputFormatter`];
//! tests use [`MemorySink`] or a plain closure.

use colored::*;
use std::collections::BTreeMap;

/// Severity of a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Progress information.
    Info,
    /// A completed step.
    Success,
    /// A non-fatal problem; execution continues.
    Warning,
}

/// Receives human-readable diagnostic lines.
pub trait DiagnosticSink {
    /// Records one diagnostic line.
    fn emit(&mut self, level: Level, message: &str);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(Level, &str),
{
    fn emit(&mut self, level: Level, message: &str) {
        self(level, message)
    }
}

/// Writes diagnostics to the terminal with colors.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn emit(&mut self, level: Level, message: &str) {
        match level {
            Level::Info => OutputFormatter::info(message),
            Level::Success => OutputFormatter::success(message),
            Level::Warning => OutputFormatter::warning(message),
        }
    }
}

/// Collects diagnostics in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// Every line received, in order.
    pub lines: Vec<(Level, String)>,
}

impl MemorySink {
    /// Returns the messages emitted at [`Level::Warning`].
    pub fn warnings(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(level, _)| *level == Level::Warning)
            .map(|(_, message)| message.as_str())
            .collect()
    }

    /// Returns true if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|(_, message)| message.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, level: Level, message: &str) {
        self.lines.push((level, message.to_string()));
    }
}

/// Styled terminal output shared by the CLI.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use filesort::output::OutputFormatter;
    /// OutputFormatter::error("Failed to copy file");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a table of file counts per destination directory.
    ///
    /// The empty classification (files without an extension) is shown as
    /// `(output root)` since those files land directly in the output root.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use filesort::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("03-2024".to_string(), 15);
    /// counts.insert("04-2024".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let rows: Vec<(&str, usize)> = counts
            .iter()
            .map(|(label, count)| (display_label(label), *count))
            .collect();

        let width = rows
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0)
            .max(9); // "Directory"

        println!(
            "{:<width$} | {}",
            "Directory".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (label, count) in &rows {
            println!(
                "{:<width$} | {} {}",
                label,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = width
        );
    }
}

fn display_label(label: &str) -> &str {
    if label.is_empty() {
        "(output root)"
    } else {
        label
    }
}

/// Returns "file" or "files" for `count`.
pub fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
