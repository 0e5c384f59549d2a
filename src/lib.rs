// NCS Navigator Configuration - typed configuration for the NCS Navigator suite
// Copyright (c) 2025 NCS Navigator Contributors
// Licensed under the MIT License

//! # NCS Navigator Configuration
//!
//! Shared configuration layer for the applications of the NCS Navigator suite.
//! It reads one INI file, checks it against a fixed schema of typed
//! attributes, and exposes the result as a [`config::Configuration`].
//!
//! ## Overview
//!
//! This library provides:
//! - **Coercion** of raw INI strings into paths, URIs, symbols, integers,
//!   booleans and comma-separated lists
//! - **Validation** of required attributes with messages that name the
//!   section and key to fix
//! - **Sampling units** loaded from a CSV file into a PSU → Area → SSU → TSU
//!   hierarchy on first use
//! - **Derived settings** such as the SMTP option bundle and the footer HTML
//!
//! ## Architecture
//!
//! - [`config`] - Attribute schema, coercion and the [`config::Configuration`] type
//! - [`sampling`] - Sampling unit entities and the CSV hierarchy builder
//! - [`domain`] - Error and result types
//! - [`logging`] - Structured logging setup for host applications
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use navigator_config::config::Configuration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Configuration::from_file("/etc/nubic/ncs/navigator.ini")?;
//!
//!     println!("Study center {:?}", config.study_center_id());
//!     println!("SMTP {:?}", config.smtp_settings());
//!
//!     for psu in config.primary_sampling_units()? {
//!         for area in psu.sampling_unit_areas() {
//!             println!("{} / {}", psu.id(), area.name());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::ConfigError`]:
//!
//! ```rust
//! use navigator_config::config::{Configuration, RawSource};
//! use navigator_config::domain::ErrorKind;
//!
//! let err = Configuration::from_source(RawSource::new()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MissingRequiredAttribute);
//! assert_eq!(err.to_string(), "Please set a value for [Staff Portal]: uri");
//! ```
//!
//! ## Logging
//!
//! The library emits `tracing` events. Applications install a subscriber with
//! [`logging::init_logging`]:
//!
//! ```rust,no_run
//! let _guard = navigator_config::logging::init_logging("info", None).unwrap();
//! tracing::info!("Starting");
//! ```

pub mod config;
pub mod domain;
pub mod logging;
pub mod sampling;
