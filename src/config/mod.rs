//! Configuration loading, coercion and validation.
//!
//! # Overview
//!
//! The suite is configured from an INI file whose sections group related
//! settings (`[Study Center]`, `[Staff Portal]`, `[Core]`, `[PSC]`,
//! `[SMTP]`, ...). This module provides:
//! - [`RawSource`]: the untyped section → key → value mapping
//! - [`attribute`]: declarative attribute descriptors and type coercion
//! - [`schema`]: the ordered attribute list of the suite
//! - [`Configuration`]: the resolved, typed configuration
//! - [`secret`]: credential values that are zeroed on drop and redacted
//! - [`global`]: an explicit process-wide configuration slot
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use navigator_config::config::Configuration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Configuration::from_file("/etc/nubic/ncs/navigator.ini")?;
//!
//! println!("Study center: {:?}", config.study_center_id());
//! if let Some(uri) = config.psc_uri() {
//!     println!("PSC: {}", uri);
//! }
//! for psu in config.primary_sampling_units()? {
//!     println!("PSU {} has {} areas", psu.id(), psu.sampling_unit_areas().len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # In-memory Sources
//!
//! A configuration can also be built from a mapping, which is handy in tests.
//! Relative paths are then kept as given instead of being resolved against a
//! file location:
//!
//! ```rust
//! use navigator_config::config::{Configuration, RawSource};
//!
//! let source = RawSource::new()
//!     .with("Study Center", "sampling_units_file", "foo.csv")
//!     .with("Staff Portal", "uri", "https://sp.example.edu/")
//!     .with("PSC", "uri", "https://psc.example.edu/");
//! let config = Configuration::from_source(source).unwrap();
//! assert_eq!(config.sampling_units_file().unwrap().to_str(), Some("foo.csv"));
//! ```

pub mod attribute;
pub mod configuration;
pub mod global;
pub mod schema;
pub mod secret;
pub mod smtp;
pub mod source;

// Re-export commonly used types
pub use attribute::{AttributeDescriptor, AttributeType, AttributeValue, Symbol};
pub use configuration::Configuration;
pub use schema::{navigator_schema, Schema};
pub use secret::{secret_string, SecretString, SecretValue};
pub use smtp::SmtpSettings;
pub use source::{ConfigSource, RawSource, Section};
