//! Domain error types
//!
//! Every fallible operation in the crate reports a [`ConfigError`]. The
//! variants fall into four broad kinds (see [`ErrorKind`]) so that callers can
//! tell a user's configuration mistake apart from a defect in the schema.

use std::path::PathBuf;
use thiserror::Error;

/// Main configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be opened or read
    #[error("configuration file {path:?} does not exist or is not readable")]
    SourceUnreadable {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file was read but is not valid INI text
    #[error("configuration file {path:?} could not be decoded: {message}")]
    SourceMalformed {
        /// Path of the configuration file
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// A required attribute resolved to no value
    #[error("Please set a value for [{section}]: {key}")]
    MissingRequired {
        /// Section of the missing value
        section: String,
        /// Key of the missing value
        key: String,
    },

    /// A present raw value could not be converted to its declared type
    #[error("invalid value {value:?} for [{section}]: {key}: {reason}")]
    Coercion {
        /// Section of the offending value
        section: String,
        /// Key of the offending value
        key: String,
        /// The raw value as read from the source
        value: String,
        /// Why the conversion failed
        reason: String,
    },

    /// The sampling units file could not be opened or read
    #[error("sampling units file {path:?} does not exist or is not readable")]
    SamplingUnitsUnreadable {
        /// Path of the sampling units file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The sampling units file contains a row that cannot be decoded
    #[error("sampling units file {path:?} is malformed: {source}")]
    SamplingUnitsMalformed {
        /// Path of the sampling units file
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// The attribute schema itself is inconsistent
    ///
    /// This is a programming defect, never a problem with user data.
    #[error("Configuration schema error: {0}")]
    Schema(String),
}

/// Coarse classification of [`ConfigError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An input file could not be read or decoded
    SourceUnreadable,
    /// A required attribute has no value
    MissingRequiredAttribute,
    /// A value could not be converted to its declared type
    CoercionFailure,
    /// The schema is broken
    SchemaError,
}

impl ConfigError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::SourceUnreadable { .. }
            | ConfigError::SourceMalformed { .. }
            | ConfigError::SamplingUnitsUnreadable { .. }
            | ConfigError::SamplingUnitsMalformed { .. } => ErrorKind::SourceUnreadable,
            ConfigError::MissingRequired { .. } => ErrorKind::MissingRequiredAttribute,
            ConfigError::Coercion { .. } => ErrorKind::CoercionFailure,
            ConfigError::Schema(_) => ErrorKind::SchemaError,
        }
    }

    /// Whether this error points at a bug in the schema rather than the input
    pub fn is_schema_error(&self) -> bool {
        self.kind() == ErrorKind::SchemaError
    }
}
