//! Centralized error handling for adforge.
//!
//! Data-shape problems never surface here: the compiler drops bad keywords,
//! the repairer fixes thin ads and the validator reports row-addressed
//! messages. [`AdforgeError`] covers the failures that stop an export
//! outright, such as unreadable input, a structure with no campaigns or an
//! output file that must not be overwritten.
//!
//! ## Context Extension Trait
//!
//! The [`ResultExt`] trait adds `.context()` to any `Result` whose error
//! converts into [`AdforgeError`]:
//!
//! ```no_run
//! use adforge::error::ResultExt as _;
//! use std::fs;
//!
//! fn load_structure() -> adforge::error::Result<String> {
//!     let text = fs::read_to_string("structure.json")
//!         .context("Failed to load campaign structure")?;
//!     Ok(text)
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

/// Main error type for adforge operations.
#[derive(Debug)]
pub enum AdforgeError {
    /// I/O errors (reading specs, writing CSV files)
    Io(std::io::Error),

    /// JSON (de)serialization errors
    Json(serde_json::Error),

    /// CSV encoding or decoding errors
    Csv(csv::Error),

    /// The structure handed to the compiler has zero campaigns
    EmptyStructure,

    /// Input that cannot be interpreted at all
    InvalidInput(String),

    /// Configuration errors
    Config(String),

    /// Export blocked because the validator reported errors
    Validation { errors: Vec<String> },

    /// Output file exists and overwriting was not requested
    OutputExists(PathBuf),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for AdforgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Csv(e) => write!(f, "CSV error: {e}"),
            Self::EmptyStructure => write!(f, "Campaign structure contains no campaigns"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Validation { errors } => {
                write!(f, "Validation failed with {} error(s)", errors.len())?;
                for error in errors {
                    write!(f, "\n  {error}")?;
                }
                Ok(())
            }
            Self::OutputExists(path) => write!(
                f,
                "Output file already exists and overwrite is false: {}",
                path.display()
            ),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AdforgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AdforgeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for AdforgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for AdforgeError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<anyhow::Error> for AdforgeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

impl From<AdforgeError> for String {
    fn from(err: AdforgeError) -> Self {
        err.to_string()
    }
}

/// Result type alias for adforge operations.
pub type Result<T> = std::result::Result<T, AdforgeError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AdforgeError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: AdforgeError = e.into();
            AdforgeError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: AdforgeError = e.into();
            AdforgeError::Other(format!("{}: {}", f(), err))
        })
    }
}
