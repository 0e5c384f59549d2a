//! Sampling unit entities
//!
//! The hierarchy is stored in a [`SamplingUnits`] arena: one vector per
//! level, with children referenced by index from their parent and each child
//! holding the index of its single owner. Callers navigate it through small
//! borrowed handles ([`PrimarySamplingUnit`], [`SamplingUnitArea`],
//! [`SecondarySamplingUnit`], [`TertiarySamplingUnit`]).
//!
//! Handles compare by identity: two handles are equal when they refer to the
//! same slot of the same arena, not merely when their IDs match.

use std::fmt;
use std::ptr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PsuRecord {
    pub(crate) id: String,
    pub(crate) areas: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AreaRecord {
    pub(crate) name: String,
    pub(crate) psu: usize,
    pub(crate) ssus: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SsuRecord {
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) area: usize,
    pub(crate) tsus: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TsuRecord {
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) ssu: usize,
}

/// The forest of primary sampling units and everything beneath them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplingUnits {
    pub(crate) psus: Vec<PsuRecord>,
    pub(crate) areas: Vec<AreaRecord>,
    pub(crate) ssus: Vec<SsuRecord>,
    pub(crate) tsus: Vec<TsuRecord>,
}

impl SamplingUnits {
    /// An empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the forest has no PSUs at all
    pub fn is_empty(&self) -> bool {
        self.psus.is_empty()
    }

    /// The PSUs in first-seen order
    pub fn primary_sampling_units(&self) -> impl ExactSizeIterator<Item = PrimarySamplingUnit<'_>> {
        (0..self.psus.len()).map(move |index| PrimarySamplingUnit { units: self, index })
    }

    /// Every area, PSU by PSU
    pub fn sampling_unit_areas(&self) -> impl Iterator<Item = SamplingUnitArea<'_>> {
        self.primary_sampling_units().flat_map(|psu| psu.sampling_unit_areas())
    }

    /// Every SSU, area by area across all PSUs
    pub fn secondary_sampling_units(&self) -> impl Iterator<Item = SecondarySamplingUnit<'_>> {
        self.sampling_unit_areas().flat_map(|area| area.secondary_sampling_units())
    }

    /// Every TSU, SSU by SSU
    pub fn tertiary_sampling_units(&self) -> impl Iterator<Item = TertiarySamplingUnit<'_>> {
        self.secondary_sampling_units().flat_map(|ssu| ssu.tertiary_sampling_units())
    }

    /// Finds a PSU by its ID
    pub fn primary_sampling_unit(&self, id: &str) -> Option<PrimarySamplingUnit<'_>> {
        self.primary_sampling_units().find(|psu| psu.id() == id)
    }

    /// Finds an SSU by its ID
    pub fn secondary_sampling_unit(&self, id: &str) -> Option<SecondarySamplingUnit<'_>> {
        self.ssus
            .iter()
            .position(|ssu| ssu.id == id)
            .map(|index| SecondarySamplingUnit { units: self, index })
    }
}

macro_rules! identity_eq {
    ($handle:ident) => {
        impl PartialEq for $handle<'_> {
            fn eq(&self, other: &Self) -> bool {
                ptr::eq(self.units, other.units) && self.index == other.index
            }
        }

        impl Eq for $handle<'_> {}
    };
}

/// A primary sampling unit
#[derive(Clone, Copy)]
pub struct PrimarySamplingUnit<'a> {
    units: &'a SamplingUnits,
    index: usize,
}

identity_eq!(PrimarySamplingUnit);

impl<'a> PrimarySamplingUnit<'a> {
    fn record(&self) -> &'a PsuRecord {
        &self.units.psus[self.index]
    }

    pub fn id(&self) -> &'a str {
        &self.record().id
    }

    /// The areas in this PSU
    pub fn sampling_unit_areas(&self) -> impl ExactSizeIterator<Item = SamplingUnitArea<'a>> + 'a {
        let units = self.units;
        self.record()
            .areas
            .iter()
            .map(move |&index| SamplingUnitArea { units, index })
    }

    /// The SSUs of all areas in this PSU
    pub fn secondary_sampling_units(&self) -> impl Iterator<Item = SecondarySamplingUnit<'a>> + 'a {
        self.sampling_unit_areas()
            .flat_map(|area| area.secondary_sampling_units())
    }
}

impl fmt::Debug for PrimarySamplingUnit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimarySamplingUnit")
            .field("id", &self.id())
            .finish()
    }
}

/// A named group of SSUs inside one PSU
#[derive(Clone, Copy)]
pub struct SamplingUnitArea<'a> {
    units: &'a SamplingUnits,
    index: usize,
}

identity_eq!(SamplingUnitArea);

impl<'a> SamplingUnitArea<'a> {
    fn record(&self) -> &'a AreaRecord {
        &self.units.areas[self.index]
    }

    pub fn name(&self) -> &'a str {
        &self.record().name
    }

    /// The PSU that owns this area
    pub fn primary_sampling_unit(&self) -> PrimarySamplingUnit<'a> {
        PrimarySamplingUnit {
            units: self.units,
            index: self.record().psu,
        }
    }

    /// The SSUs in this area
    pub fn secondary_sampling_units(
        &self,
    ) -> impl ExactSizeIterator<Item = SecondarySamplingUnit<'a>> + 'a {
        let units = self.units;
        self.record()
            .ssus
            .iter()
            .map(move |&index| SecondarySamplingUnit { units, index })
    }
}

impl fmt::Debug for SamplingUnitArea<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplingUnitArea")
            .field("name", &self.name())
            .field("psu", &self.primary_sampling_unit().id())
            .finish()
    }
}

/// A secondary sampling unit
#[derive(Clone, Copy)]
pub struct SecondarySamplingUnit<'a> {
    units: &'a SamplingUnits,
    index: usize,
}

identity_eq!(SecondarySamplingUnit);

impl<'a> SecondarySamplingUnit<'a> {
    fn record(&self) -> &'a SsuRecord {
        &self.units.ssus[self.index]
    }

    pub fn id(&self) -> &'a str {
        &self.record().id
    }

    pub fn name(&self) -> Option<&'a str> {
        self.record().name.as_deref()
    }

    /// The area that owns this SSU
    pub fn sampling_unit_area(&self) -> SamplingUnitArea<'a> {
        SamplingUnitArea {
            units: self.units,
            index: self.record().area,
        }
    }

    /// The PSU of this SSU's area
    pub fn primary_sampling_unit(&self) -> PrimarySamplingUnit<'a> {
        self.sampling_unit_area().primary_sampling_unit()
    }

    /// Any TSUs defined for this SSU
    pub fn tertiary_sampling_units(
        &self,
    ) -> impl ExactSizeIterator<Item = TertiarySamplingUnit<'a>> + 'a {
        let units = self.units;
        self.record()
            .tsus
            .iter()
            .map(move |&index| TertiarySamplingUnit { units, index })
    }
}

impl fmt::Debug for SecondarySamplingUnit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecondarySamplingUnit")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("area", &self.sampling_unit_area().name())
            .finish()
    }
}

/// A tertiary sampling unit
#[derive(Clone, Copy)]
pub struct TertiarySamplingUnit<'a> {
    units: &'a SamplingUnits,
    index: usize,
}

identity_eq!(TertiarySamplingUnit);

impl<'a> TertiarySamplingUnit<'a> {
    fn record(&self) -> &'a TsuRecord {
        &self.units.tsus[self.index]
    }

    pub fn id(&self) -> &'a str {
        &self.record().id
    }

    pub fn name(&self) -> Option<&'a str> {
        self.record().name.as_deref()
    }

    /// The SSU that owns this TSU
    pub fn secondary_sampling_unit(&self) -> SecondarySamplingUnit<'a> {
        SecondarySamplingUnit {
            units: self.units,
            index: self.record().ssu,
        }
    }
}

impl fmt::Debug for TertiarySamplingUnit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TertiarySamplingUnit")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("ssu", &self.secondary_sampling_unit().id())
            .finish()
    }
}
