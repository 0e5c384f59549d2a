//! Sampling unit hierarchy builder
//!
//! [`HierarchyBuilder`] folds the rows of the sampling units file, one at a
//! time and in order, into a [`SamplingUnits`] forest. PSUs, areas and SSUs
//! are deduplicated by natural key for the whole build; every row carrying a
//! TSU ID adds a new TSU.

use super::reader::SamplingUnitRow;
use super::units::{AreaRecord, PsuRecord, SamplingUnits, SsuRecord, TsuRecord};
use std::collections::HashMap;

/// Incremental builder for a [`SamplingUnits`] forest
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    units: SamplingUnits,
    psu_by_id: HashMap<String, usize>,
    // Keyed by name alone, so equally named areas of different PSUs merge
    area_by_name: HashMap<String, usize>,
    ssu_by_id: HashMap<String, usize>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a forest from a complete row sequence
    pub fn build<I>(rows: I) -> SamplingUnits
    where
        I: IntoIterator<Item = SamplingUnitRow>,
    {
        let mut builder = Self::new();
        for row in rows {
            builder.push(&row);
        }
        builder.finish()
    }

    /// Folds one row into the forest
    ///
    /// Fields are trimmed and blank optional fields are treated as absent.
    /// A row without a PSU ID is skipped. A row without an area only
    /// registers its PSU; a row without an SSU ID stops at the area.
    pub fn push(&mut self, row: &SamplingUnitRow) {
        let psu_id = row.psu_id.trim();
        if psu_id.is_empty() {
            if row.has_values() {
                tracing::warn!(row = ?row, "Skipping sampling unit row without a PSU ID");
            }
            return;
        }
        let psu = self.resolve_psu(psu_id);

        let Some(area_name) = present(&row.area) else {
            return;
        };
        let area = self.resolve_area(area_name, psu);

        let Some(ssu_id) = present(&row.ssu_id) else {
            return;
        };
        let ssu = self.resolve_ssu(ssu_id, present(&row.ssu_name), area);

        if let Some(tsu_id) = present(&row.tsu_id) {
            self.add_tsu(tsu_id, present(&row.tsu_name), ssu);
        }
    }

    /// Returns the finished forest, discarding the lookup tables
    pub fn finish(self) -> SamplingUnits {
        self.units
    }

    fn resolve_psu(&mut self, id: &str) -> usize {
        if let Some(&index) = self.psu_by_id.get(id) {
            return index;
        }
        let index = self.units.psus.len();
        self.units.psus.push(PsuRecord {
            id: id.to_string(),
            areas: Vec::new(),
        });
        self.psu_by_id.insert(id.to_string(), index);
        index
    }

    fn resolve_area(&mut self, name: &str, psu: usize) -> usize {
        if let Some(&index) = self.area_by_name.get(name) {
            let owner = self.units.areas[index].psu;
            if owner != psu {
                tracing::warn!(
                    area = name,
                    owner = %self.units.psus[owner].id,
                    psu = %self.units.psus[psu].id,
                    "Area name appears under more than one PSU; keeping the first owner"
                );
            }
            return index;
        }
        let index = self.units.areas.len();
        self.units.areas.push(AreaRecord {
            name: name.to_string(),
            psu,
            ssus: Vec::new(),
        });
        self.units.psus[psu].areas.push(index);
        self.area_by_name.insert(name.to_string(), index);
        index
    }

    fn resolve_ssu(&mut self, id: &str, name: Option<&str>, area: usize) -> usize {
        if let Some(&index) = self.ssu_by_id.get(id) {
            return index;
        }
        let index = self.units.ssus.len();
        self.units.ssus.push(SsuRecord {
            id: id.to_string(),
            name: name.map(str::to_string),
            area,
            tsus: Vec::new(),
        });
        self.units.areas[area].ssus.push(index);
        self.ssu_by_id.insert(id.to_string(), index);
        index
    }

    fn add_tsu(&mut self, id: &str, name: Option<&str>, ssu: usize) {
        let index = self.units.tsus.len();
        self.units.tsus.push(TsuRecord {
            id: id.to_string(),
            name: name.map(str::to_string),
            ssu,
        });
        self.units.ssus[ssu].tsus.push(index);
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
