//! filesort - sort the files of a folder into classified subdirectories
//!
//! This library classifies files by creation month (UTC) or by extension,
//! copies them into `<output_root>/<classification>/`, and cleans the output
//! root between runs. Progress is reported through an injected diagnostic sink.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod output;
pub mod sorter;

pub use classifier::{Classifier, DateClassifier, ExtensionClassifier, SortMode, SourceFile};
pub use config::{ConfigError, SortConfig};
pub use output::{ConsoleSink, DiagnosticSink, Level, MemorySink};
pub use sorter::{Placement, SortError, SortReport, SortResult, Sorter, clean_output};

pub use cli::{SortCommand, run_cli};
