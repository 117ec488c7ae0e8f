//! File classification for choosing a destination subdirectory.
//!
//! A classifier maps a file to a label such as `"03-2024"` or `"pdf"`. The set
//! of sort modes is closed: [`SortMode::Date`] buckets files by the UTC
//! month and year of their creation time, [`SortMode::Extension`] by the text
//! after the last dot of their name.
//!
//! # Examples
//!
//! ```
//! use filesort::classifier::{SortMode, date_label};
//! use chrono::{TimeZone, Utc};
//!
//! assert_eq!("extension".parse::<SortMode>().unwrap(), SortMode::Extension);
//! assert!("Date".parse::<SortMode>().is_err());
//!
//! let created = Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 0).unwrap();
//! assert_eq!(date_label(created), "03-2024");
//! ```

use crate::output::{DiagnosticSink, Level};
use crate::sorter::{SortError, SortResult};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::str::FromStr;

/// Format used for date labels: two-digit month, dash, calendar year.
const DATE_LABEL_FORMAT: &str = "%m-%Y";

/// A regular file found in the source folder.
///
/// The sorter only ever reads through this handle; the file itself is never
/// modified or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// The file name, including its extension.
    pub name: String,
    /// The full path to the file.
    pub path: PathBuf,
}

impl SourceFile {
    /// Creates a handle for the file at `path`.
    ///
    /// Non-UTF-8 names are converted lossily; the path keeps the original bytes.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { name, path }
    }

    /// Reads the creation time of the file from filesystem metadata, in UTC.
    ///
    /// # Errors
    ///
    /// Returns `SortError::ClassificationFailed` when the metadata cannot be
    /// read or the platform does not record creation times.
    pub fn created(&self) -> SortResult<DateTime<Utc>> {
        let created = std::fs::metadata(&self.path)
            .and_then(|metadata| metadata.created())
            .map_err(|e| SortError::ClassificationFailed {
                path: self.path.clone(),
                source: e,
            })?;
        Ok(DateTime::<Utc>::from(created))
    }

    /// Returns the text after the last `.` of the name, or `""` when there is none.
    pub fn extension(&self) -> &str {
        extension_label(&self.name)
    }
}

/// Maps a file to the name of its destination subdirectory.
pub trait Classifier {
    /// Computes the classification label for `file`.
    fn classify(&self, file: &SourceFile) -> SortResult<String>;
}

/// Buckets files by the UTC month and year of their creation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateClassifier;

impl Classifier for DateClassifier {
    fn classify(&self, file: &SourceFile) -> SortResult<String> {
        Ok(date_label(file.created()?))
    }
}

/// Buckets files by their extension. Files without one map to `""`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionClassifier;

impl Classifier for ExtensionClassifier {
    fn classify(&self, file: &SourceFile) -> SortResult<String> {
        Ok(file.extension().to_string())
    }
}

/// Formats a UTC timestamp as a `MM-YYYY` label.
pub fn date_label(timestamp: DateTime<Utc>) -> String {
    timestamp.format(DATE_LABEL_FORMAT).to_string()
}

/// Returns the substring after the last `.` in `file_name`, without the dot.
pub fn extension_label(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .unwrap_or("")
}

/// The classification rule selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Group by creation month and year (UTC).
    #[default]
    Date,
    /// Group by file extension.
    Extension,
}

impl SortMode {
    /// Configuration value selecting this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Date => "date",
            SortMode::Extension => "extension",
        }
    }

    /// Returns the classifier implementing this mode.
    pub fn classifier(&self) -> &'static dyn Classifier {
        match self {
            SortMode::Date => &DateClassifier,
            SortMode::Extension => &ExtensionClassifier,
        }
    }

    /// Resolves a configured sort type, falling back to [`SortMode::Date`].
    ///
    /// Unset and unrecognized values are treated the same way: the default
    /// mode is used and a single warning is sent to `sink`.
    pub fn resolve(value: Option<&str>, sink: &mut dyn DiagnosticSink) -> Self {
        match value.map(str::parse::<SortMode>) {
            Some(Ok(mode)) => mode,
            _ => {
                sink.emit(
                    Level::Warning,
                    "Sort type isn't set or contains an invalid value, \
                     default sorting will be done by creation date",
                );
                SortMode::default()
            }
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sort type value that names no known mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortMode(pub String);

impl std::fmt::Display for UnknownSortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown sort type '{}': expected 'date' or 'extension'",
            self.0
        )
    }
}

impl std::error::Error for UnknownSortMode {}

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    /// Matches `"date"` and `"extension"` exactly (case-sensitive).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "date" => Ok(SortMode::Date),
            "extension" => Ok(SortMode::Extension),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}
