//! Logging setup for applications that load the configuration
//!
//! The library itself only emits `tracing` events: debug events while a
//! configuration is resolved, an info event when the sampling units are
//! loaded, and a warning when an area name shows up under more than one PSU.
//! Host applications decide where those go by calling [`init_logging`] once
//! at startup.
//!
//! # Example
//!
//! ```no_run
//! use navigator_config::logging::init_logging;
//!
//! let _guard = init_logging("info", None).expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingError, LoggingGuard};
