//! Domain types shared by the configuration and sampling-unit layers.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ConfigError>`]:
//!
//! ```rust
//! use navigator_config::domain::{ConfigError, ErrorKind, Result};
//! use navigator_config::config::{Configuration, RawSource};
//!
//! fn example() -> Result<()> {
//!     let source = RawSource::new()
//!         .with("Staff Portal", "uri", "https://sp.example.edu/")
//!         .with("PSC", "uri", "https://psc.example.edu/");
//!     let config = Configuration::from_source(source)?;
//!     assert_eq!(config.study_center_username(), "Username");
//!     Ok(())
//! }
//!
//! let err = Configuration::from_source(RawSource::new()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MissingRequiredAttribute);
//! # example().unwrap();
//! ```

pub mod errors;
pub mod result;

pub use errors::{ConfigError, ErrorKind};
pub use result::Result;
