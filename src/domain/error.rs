//! Error types for the bibshelf plugin.
//!
//! This module defines the centralized error type [`BibshelfError`] and a type
//! alias [`Result`] used throughout the crate. All errors are implemented using
//! the `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for bibshelf operations.
///
/// Consolidates every failure that can occur while loading the document
/// library, talking to the background worker, or reading theme files. Most
/// variants wrap underlying errors from external crates using `#[from]`.
///
/// # Examples
///
/// ```
/// use bibshelf::BibshelfError;
///
/// fn missing_info() -> Result<(), BibshelfError> {
///     Err(BibshelfError::Library("no info.yaml in /tmp/doc".to_string()))
/// }
/// assert!(missing_info().is_err());
/// ```
#[derive(Debug, Error)]
pub enum BibshelfError {
    /// The document library could not be read.
    ///
    /// Raised for missing library roots or document folders without an info
    /// file. The string describes what went wrong.
    #[error("Library error: {0}")]
    Library(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A document info file is not valid YAML.
    #[error("Info file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// A configuration value does not parse.
    ///
    /// Returned by `Config::try_get`. `Config::get_or` logs it and falls back
    /// to the default.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for bibshelf operations.
pub type Result<T> = std::result::Result<T, BibshelfError>;
