//! Result type alias for configuration operations

use super::errors::ConfigError;

/// Result type alias that uses `ConfigError` as the error type
pub type Result<T> = std::result::Result<T, ConfigError>;
