//! Error handling for the ccds application.
//! Defines custom error types and results used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for ccds operations.
///
/// This enum represents all possible errors that can occur within the ccds application.
/// It implements the standard Error trait through thiserror's derive macro.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Represents errors raised while walking a directory tree
    #[error("Directory walk error: {0}")]
    WalkDirError(#[from] walkdir::Error),

    /// Represents errors that occur during template processing
    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Template rendering error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Represents validation failures in user input or data
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml_edit::TomlError),

    #[error("Zip archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Git error: {0}")]
    Git2Error(#[from] git2::Error),

    /// Represents errors in compiling ignore patterns
    #[error("Ignore pattern error: {0}")]
    IgnorePatternError(String),

    #[error("Template directory does not exist: '{template_dir}'")]
    TemplateDoesNotExistsError { template_dir: String },

    #[error("Output directory already exists: '{output_dir}'. Use --force to overwrite it")]
    OutputDirectoryExistsError { output_dir: String },

    /// The user-supplied Python version has neither two nor three components.
    #[error(
        "Invalid Python version specifier {version}. Please specify version as \
         <major>.<minor> or <major>.<minor>.<patch>, e.g., 3.10, 3.10.1, etc."
    )]
    PythonVersionError { version: String },

    /// None of the overlay strategies (directory, zip, zip URL, VCS) applies.
    #[error(
        "Cannot resolve custom config '{location}': expected a directory, a .zip file, \
         a URL to a .zip file or a version control URI"
    )]
    OverlaySourceError { location: String },

    #[error("Unresolved template markers left in: {}", display_paths(.files))]
    UnresolvedMarkersError { files: Vec<PathBuf> },

    /// The committed derived template differs from a fresh regeneration.
    #[error(
        "Derived template is out of sync with the master template ({count} differences)!\n\
         Run: ccds build <MASTER> <DERIVED>\n\nDifferences:\n{summary}"
    )]
    DriftDetected { count: usize, summary: String },
}

fn display_paths(files: &[PathBuf]) -> String {
    files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>().join(", ")
}

/// Convenience type alias for Results with Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
