//! Sampling units of the study design.
//!
//! The study samples in four nested levels: primary sampling units (PSUs)
//! contain named areas, areas contain secondary sampling units (SSUs), and
//! SSUs may contain tertiary sampling units (TSUs). The levels are listed
//! row by row in a CSV file named by the configuration; this module turns
//! that file into a navigable hierarchy.
//!
//! # Example
//!
//! ```rust
//! use navigator_config::sampling::build_from_reader;
//!
//! let csv = "PSU_ID,AREA,SSU_ID,SSU_NAME,TSU_ID,TSU_NAME\n\
//!            204,Uptown,One,West Side,1-1,Center\n\
//!            204,Downtown,Three,Plaza,,\n";
//! let units = build_from_reader(csv.as_bytes()).unwrap();
//!
//! let psu = units.primary_sampling_unit("204").unwrap();
//! let ssus: Vec<_> = psu.secondary_sampling_units().map(|ssu| ssu.id()).collect();
//! assert_eq!(ssus, vec!["One", "Three"]);
//! ```

pub mod builder;
pub mod reader;
pub mod units;

pub use builder::HierarchyBuilder;
pub use reader::{build_from_reader, read_sampling_units, SamplingUnitRow};
pub use units::{
    PrimarySamplingUnit, SamplingUnitArea, SamplingUnits, SecondarySamplingUnit,
    TertiarySamplingUnit,
};
