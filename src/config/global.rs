//! Process-wide configuration slot
//!
//! Applications in the suite usually share one configuration for the whole
//! process. This module holds it explicitly: nothing is loaded until
//! [`load_default`] or [`install`] is called, and [`reset`] empties the slot
//! again (mostly useful in tests).
//!
//! ```rust,no_run
//! use navigator_config::config::global;
//!
//! # fn example() -> navigator_config::domain::Result<()> {
//! let config = global::load_default()?;
//! assert!(global::current().is_some());
//! println!("{:?}", config.study_center_id());
//!
//! global::reset();
//! assert!(global::current().is_none());
//! # Ok(())
//! # }
//! ```

use super::configuration::Configuration;
use crate::domain::result::Result;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Location read by [`load_default`] unless overridden
pub const DEFAULT_CONFIGURATION_PATH: &str = "/etc/nubic/ncs/navigator.ini";

/// Environment variable that overrides [`DEFAULT_CONFIGURATION_PATH`]
pub const CONFIGURATION_PATH_ENV: &str = "NCS_NAVIGATOR_CONFIG";

static CURRENT: RwLock<Option<Arc<Configuration>>> = RwLock::new(None);

/// The path [`load_default`] reads
pub fn default_path() -> PathBuf {
    std::env::var_os(CONFIGURATION_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIGURATION_PATH))
}

/// The installed configuration, if any
pub fn current() -> Option<Arc<Configuration>> {
    CURRENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Installs `config` as the process-wide configuration
///
/// Returns the previously installed configuration.
pub fn install(config: Configuration) -> Option<Arc<Configuration>> {
    let config = Arc::new(config);
    tracing::debug!(source = ?config.source_path(), "Installing process-wide configuration");
    CURRENT
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(config)
}

/// Loads the configuration from [`default_path`] and installs it
///
/// If a configuration is already installed it is returned unchanged and no
/// file is read.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded; the slot stays empty.
pub fn load_default() -> Result<Arc<Configuration>> {
    let mut slot = CURRENT.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = slot.as_ref() {
        return Ok(Arc::clone(existing));
    }

    let path = default_path();
    let config = Arc::new(Configuration::from_file(&path)?);
    tracing::info!(path = %path.display(), "Loaded process-wide configuration");
    *slot = Some(Arc::clone(&config));
    Ok(config)
}

/// Empties the slot, returning what was installed
pub fn reset() -> Option<Arc<Configuration>> {
    CURRENT.write().unwrap_or_else(PoisonError::into_inner).take()
}
