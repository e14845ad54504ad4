//! Error types for SQL processing
//!
//! Malformed SQL is never an error: the scanner and grouping engine always
//! produce a tree. Errors here cover the layers around the core: option
//! validation, configuration files, input decoding and file I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sqlcst operations
#[derive(Debug, Error)]
pub enum SqlcstError {
    /// A formatter option holds a value outside its domain
    #[error("Invalid value for option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    /// Configuration loading errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Requested input encoding is not supported
    #[error("Unsupported encoding '{encoding}'")]
    UnsupportedEncoding { encoding: String },

    /// Input bytes could not be decoded
    #[error("Input is not valid {encoding}: {message}")]
    DecodeError { encoding: String, message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Encoding,
}

impl SqlcstError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SqlcstError::InvalidOption { .. } | SqlcstError::ConfigError { .. } => ErrorKind::Config,
            SqlcstError::IoError { .. } => ErrorKind::Io,
            SqlcstError::UnsupportedEncoding { .. } | SqlcstError::DecodeError { .. } => {
                ErrorKind::Encoding
            }
        }
    }

    /// Create an invalid option error
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a decode error
    pub fn decode_error(encoding: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DecodeError {
            encoding: encoding.into(),
            message: message.into(),
        }
    }
}
