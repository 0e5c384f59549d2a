//! Sampling units file reader
//!
//! The sampling units file is comma-separated with a header row:
//!
//! ```text
//! PSU_ID, AREA,     SSU_ID, SSU_NAME,  TSU_ID, TSU_NAME
//! 204,    Uptown,   One,    West Side, 1-1,    Center
//! 204,    Uptown,   Two,    West Side
//! 204,    Downtown, Three,  Plaza
//! ```
//!
//! Everything but `PSU_ID` is optional, and rows may stop early. Rows with a
//! blank `PSU_ID`, such as whitespace-only lines, are skipped.

use super::builder::HierarchyBuilder;
use super::units::SamplingUnits;
use crate::domain::errors::ConfigError;
use crate::domain::result::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One row of the sampling units file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SamplingUnitRow {
    #[serde(rename = "PSU_ID")]
    pub psu_id: String,
    #[serde(rename = "AREA", default)]
    pub area: Option<String>,
    #[serde(rename = "SSU_ID", default)]
    pub ssu_id: Option<String>,
    #[serde(rename = "SSU_NAME", default)]
    pub ssu_name: Option<String>,
    #[serde(rename = "TSU_ID", default)]
    pub tsu_id: Option<String>,
    #[serde(rename = "TSU_NAME", default)]
    pub tsu_name: Option<String>,
}

impl SamplingUnitRow {
    /// Whether any field beyond a blank PSU ID carries text
    pub(crate) fn has_values(&self) -> bool {
        [
            &self.area,
            &self.ssu_id,
            &self.ssu_name,
            &self.tsu_id,
            &self.tsu_name,
        ]
        .into_iter()
        .flatten()
        .any(|value| !value.trim().is_empty())
    }
}

/// Reads the sampling units file at `path` and builds its hierarchy
///
/// # Errors
///
/// - [`ConfigError::SamplingUnitsUnreadable`] if the file cannot be opened
/// - [`ConfigError::SamplingUnitsMalformed`] if a row cannot be decoded
pub fn read_sampling_units(path: &Path) -> Result<SamplingUnits> {
    let file = File::open(path).map_err(|source| ConfigError::SamplingUnitsUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let units = build_from_reader(file).map_err(|source| ConfigError::SamplingUnitsMalformed {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        psus = units.psus.len(),
        areas = units.areas.len(),
        ssus = units.ssus.len(),
        tsus = units.tsus.len(),
        "Loaded sampling units"
    );

    Ok(units)
}

/// Builds a hierarchy from CSV text supplied by any reader
///
/// Headers and fields are trimmed before use.
pub fn build_from_reader<R: Read>(reader: R) -> std::result::Result<SamplingUnits, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut builder = HierarchyBuilder::new();
    for row in csv_reader.deserialize::<SamplingUnitRow>() {
        builder.push(&row?);
    }
    Ok(builder.finish())
}
