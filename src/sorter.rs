//! Sorting of a source folder into classified subdirectories.
//!
//! For every regular, non-hidden file directly inside the source folder the
//! [`Sorter`] computes a classification label, creates
//! `<output_root>/<label>` if needed and copies the file there, replacing any
//! earlier copy. Source files are never modified, moved or deleted.

use crate::classifier::{SortMode, SourceFile};
use crate::config::SortConfig;
use crate::output::{DiagnosticSink, Level, plural};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Errors that can abort a sort or clean run.
#[derive(Debug)]
pub enum SortError {
    /// File metadata needed for classification could not be read.
    ClassificationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The source folder exists but could not be listed.
    SourceReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a destination directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to copy a file to its destination.
    FileCopyFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Failed to remove the output root.
    CleanFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for SortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClassificationFailed { path, source } => {
                write!(f, "Failed to classify {}: {}", path.display(), source)
            }
            Self::SourceReadFailed { path, source } => {
                write!(
                    f,
                    "Failed to read source folder {}: {}",
                    path.display(),
                    source
                )
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileCopyFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::CleanFailed { path, source } => {
                write!(f, "Failed to clean {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ClassificationFailed { source, .. }
            | Self::SourceReadFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::CleanFailed { source, .. } => Some(source),
            Self::FileCopyFailed { source_error, .. } => Some(source_error),
        }
    }
}

/// Result type for sorting operations.
pub type SortResult<T> = Result<T, SortError>;

/// Where one source file was (or would be) copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// The file in the source folder.
    pub source: PathBuf,
    /// The copy under the output root.
    pub destination: PathBuf,
    /// The label naming the destination directory.
    pub classification: String,
}

/// Outcome of a sort run or dry run.
#[derive(Debug, Clone, Default)]
pub struct SortReport {
    /// The mode the run actually used.
    pub mode: SortMode,
    /// One entry per processed file, in processing order.
    pub placements: Vec<Placement>,
}

impl SortReport {
    /// Number of files processed.
    pub fn file_count(&self) -> usize {
        self.placements.len()
    }

    /// Number of distinct destination directories.
    pub fn directory_count(&self) -> usize {
        self.placements
            .iter()
            .map(|p| p.classification.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// File counts keyed by classification label.
    pub fn counts_by_classification(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for placement in &self.placements {
            *counts.entry(placement.classification.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Copies the files of a source folder into classified subdirectories.
#[derive(Debug, Clone)]
pub struct Sorter {
    config: SortConfig,
}

impl Sorter {
    /// Creates a sorter for the given configuration.
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    /// Sorts every eligible file into `<output_root>/<classification>/`.
    ///
    /// The sort mode is resolved once per run. Processing stops at the first
    /// classification or I/O failure; files copied before it stay in place.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use filesort::{MemorySink, SortConfig, Sorter};
    ///
    /// let config = SortConfig::new("/path/to/inbox", "build/files", Some("extension"));
    /// let mut sink = MemorySink::default();
    /// let report = Sorter::new(config).run(&mut sink).expect("sort failed");
    /// println!("sorted {} files", report.file_count());
    /// ```
    pub fn run(&self, sink: &mut dyn DiagnosticSink) -> SortResult<SortReport> {
        self.process(sink, false)
    }

    /// Computes every placement without creating or copying anything.
    pub fn plan(&self, sink: &mut dyn DiagnosticSink) -> SortResult<SortReport> {
        self.process(sink, true)
    }

    /// Removes the output root. See [`clean_output`].
    pub fn clean(&self, sink: &mut dyn DiagnosticSink) -> SortResult<()> {
        if clean_output(&self.config.output_root)? {
            sink.emit(
                Level::Info,
                &format!("Removed {}", self.config.output_root.display()),
            );
        }
        Ok(())
    }

    /// Lists the eligible files of the source folder, ordered by name.
    ///
    /// An unset or missing source folder yields no files.
    pub fn eligible_files(&self) -> SortResult<Vec<SourceFile>> {
        match &self.config.source {
            Some(source) => list_eligible_files(source),
            None => Ok(Vec::new()),
        }
    }

    fn process(&self, sink: &mut dyn DiagnosticSink, dry_run: bool) -> SortResult<SortReport> {
        let mode = SortMode::resolve(self.config.sort_type.as_deref(), sink);
        let classifier = mode.classifier();
        let output_root = &self.config.output_root;

        match &self.config.source {
            Some(source) => sink.emit(
                Level::Info,
                &format!(
                    "==== Sorting files from {} into {} by {} ====",
                    source.display(),
                    output_root.display(),
                    mode
                ),
            ),
            None => sink.emit(Level::Warning, "Source folder isn't set, nothing to sort"),
        }

        let files = self.eligible_files()?;
        let mut report = SortReport {
            mode,
            placements: Vec::with_capacity(files.len()),
        };

        for file in &files {
            sink.emit(Level::Info, &format!("Filename: {}", file.name));
            let classification = classifier.classify(file)?;

            let placement = if dry_run {
                Placement {
                    source: file.path.clone(),
                    destination: destination_path(output_root, &classification, file),
                    classification,
                }
            } else {
                place_file(output_root, file, &classification)?
            };

            let verb = if dry_run { "Would copy" } else { "Copied" };
            sink.emit(
                Level::Success,
                &format!("{} to {}", verb, placement.destination.display()),
            );
            report.placements.push(placement);
        }

        let count = report.file_count();
        sink.emit(
            Level::Success,
            &format!(
                "==== Files sorted successfully: {} {} into {} {} ====",
                count,
                plural(count),
                report.directory_count(),
                if report.directory_count() == 1 {
                    "directory"
                } else {
                    "directories"
                }
            ),
        );

        Ok(report)
    }
}

/// Lists regular, non-hidden files directly inside `source`, ordered by name.
///
/// Symlinks are followed, so a link to a file is eligible and a link to a
/// directory is not. A missing folder yields an empty list.
///
/// # Errors
///
/// Returns `SortError::SourceReadFailed` if an existing folder cannot be read.
pub fn list_eligible_files(source: &Path) -> SortResult<Vec<SourceFile>> {
    let entries = match fs::read_dir(source) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(SortError::SourceReadFailed {
                path: source.to_path_buf(),
                source: e,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SortError::SourceReadFailed {
            path: source.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        // Broken links and unreadable entries are not regular files
        let Ok(metadata) = fs::metadata(&path) else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let file = SourceFile::new(path);
        if is_hidden(&file.name, &metadata) {
            continue;
        }
        files.push(file);
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Returns true for dot files and, on Windows, files with the hidden attribute.
pub fn is_hidden(file_name: &str, metadata: &fs::Metadata) -> bool {
    file_name.starts_with('.') || has_hidden_attribute(metadata)
}

#[cfg(windows)]
fn has_hidden_attribute(metadata: &fs::Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn has_hidden_attribute(_metadata: &fs::Metadata) -> bool {
    false
}

fn destination_path(output_root: &Path, classification: &str, file: &SourceFile) -> PathBuf {
    let directory = output_root.join(classification);
    match file.path.file_name() {
        Some(name) => directory.join(name),
        None => directory.join(&file.name),
    }
}

/// Copies `file` into `<output_root>/<classification>/`, overwriting any
/// existing copy, and returns the placement performed.
///
/// The destination directory and any missing parents are created; an
/// existing directory is reused.
pub fn place_file(
    output_root: &Path,
    file: &SourceFile,
    classification: &str,
) -> SortResult<Placement> {
    let directory = output_root.join(classification);
    fs::create_dir_all(&directory).map_err(|e| SortError::DirectoryCreationFailed {
        path: directory.clone(),
        source: e,
    })?;

    let destination = destination_path(output_root, classification, file);
    fs::copy(&file.path, &destination).map_err(|e| SortError::FileCopyFailed {
        source: file.path.clone(),
        destination: destination.clone(),
        source_error: e,
    })?;

    Ok(Placement {
        source: file.path.clone(),
        destination,
        classification: classification.to_string(),
    })
}

/// Removes `output_root` and everything below it.
///
/// Returns `Ok(false)` if there was nothing to remove.
pub fn clean_output(output_root: &Path) -> SortResult<bool> {
    match fs::remove_dir_all(output_root) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SortError::CleanFailed {
            path: output_root.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;
    use tempfile::TempDir;

    fn extension_sorter(source: &Path, output: &Path) -> Sorter {
        Sorter::new(SortConfig::new(source, output, Some("extension")))
    }

    #[test]
    fn test_place_file_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");
        let output = temp_dir.path().join("out");

        let placement = place_file(&output, &SourceFile::new(&file_path), "txt")
            .expect("Failed to place file");

        assert_eq!(placement.destination, output.join("txt").join("test.txt"));
        assert_eq!(fs::read(&placement.destination).unwrap(), b"test content");
        // Copy, not move
        assert!(file_path.exists());
    }

    #[test]
    fn test_place_file_overwrites_existing_copy() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("a.txt");
        fs::write(&file_path, "new").expect("Failed to write test file");
        let output = temp_dir.path().join("out");
        fs::create_dir_all(output.join("txt")).unwrap();
        fs::write(output.join("txt").join("a.txt"), "old and longer").unwrap();

        place_file(&output, &SourceFile::new(&file_path), "txt").expect("Failed to place file");

        assert_eq!(fs::read(output.join("txt").join("a.txt")).unwrap(), b"new");
    }

    #[test]
    fn test_place_file_empty_classification_uses_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("README");
        fs::write(&file_path, "readme").expect("Failed to write test file");
        let output = temp_dir.path().join("out");

        place_file(&output, &SourceFile::new(&file_path), "").expect("Failed to place file");

        assert!(output.join("README").is_file());
    }

    #[test]
    fn test_place_file_blocked_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("a.txt");
        fs::write(&file_path, "a").unwrap();
        // A regular file where the output root should be
        let output = temp_dir.path().join("out");
        fs::write(&output, "not a directory").unwrap();

        let result = place_file(&output, &SourceFile::new(&file_path), "txt");
        assert!(matches!(
            result,
            Err(SortError::DirectoryCreationFailed { .. })
        ));
    }

    #[test]
    fn test_list_eligible_skips_hidden_and_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("b.txt"), "b").unwrap();
        fs::write(base.join("a.pdf"), "a").unwrap();
        fs::write(base.join(".hidden"), "h").unwrap();
        fs::create_dir(base.join("nested.dir")).unwrap();

        let names: Vec<String> = list_eligible_files(base)
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();

        assert_eq!(names, vec!["a.pdf", "b.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_eligible_follows_file_symlinks_only() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path().join("src");
        fs::create_dir(&base).unwrap();
        let target = temp_dir.path().join("target.txt");
        fs::write(&target, "t").unwrap();
        std::os::unix::fs::symlink(&target, base.join("link.txt")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path(), base.join("dirlink")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("gone"), base.join("broken")).unwrap();

        let names: Vec<String> = list_eligible_files(&base)
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();

        assert_eq!(names, vec!["link.txt"]);
    }

    #[test]
    fn test_list_eligible_missing_folder_is_empty() {
        let files = list_eligible_files(Path::new("/non/existent/path")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_run_reports_placements() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("in");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("one.pdf"), "1").unwrap();
        fs::write(source.join("two.pdf"), "2").unwrap();
        fs::write(source.join("notes.md"), "3").unwrap();
        let output = temp_dir.path().join("out");

        let mut sink = MemorySink::default();
        let report = extension_sorter(&source, &output).run(&mut sink).unwrap();

        assert_eq!(report.mode, SortMode::Extension);
        assert_eq!(report.file_count(), 3);
        assert_eq!(report.directory_count(), 2);
        assert_eq!(report.counts_by_classification().get("pdf"), Some(&2));
        assert!(sink.contains("Filename: one.pdf"));
        assert!(sink.contains("Filename: notes.md"));
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn test_plan_writes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("in");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("one.pdf"), "1").unwrap();
        let output = temp_dir.path().join("out");

        let mut sink = MemorySink::default();
        let report = extension_sorter(&source, &output).plan(&mut sink).unwrap();

        assert_eq!(report.placements[0].destination, output.join("pdf").join("one.pdf"));
        assert!(!output.exists());
    }

    #[test]
    fn test_unset_source_is_empty_success() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = SortConfig {
            source: None,
            output_root: temp_dir.path().join("out"),
            sort_type: Some("date".to_string()),
        };

        let mut sink = MemorySink::default();
        let report = Sorter::new(config).run(&mut sink).unwrap();

        assert_eq!(report.file_count(), 0);
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_clean_output() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let output = temp_dir.path().join("out");
        fs::create_dir_all(output.join("pdf")).unwrap();
        fs::write(output.join("pdf").join("a.pdf"), "a").unwrap();

        assert!(clean_output(&output).unwrap());
        assert!(!output.exists());
        assert!(!clean_output(&output).unwrap());
    }
}
