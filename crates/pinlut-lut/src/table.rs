//! Lookup-table shapes.
//!
//! Forward tables (`InstrumentTo*`) hold, per partition and in descriptor
//! order, where each entry lands in the logical space. Inverse tables
//! (`*ToInstrument`) hold, per logical coordinate, the partition and offset
//! that carries it, plus the dimensions of the rectangularized
//! per-instrument array.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// A cell of the dense site x pin array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinLocation {
    /// Site index into `S`; `None` for a system pin, which covers every site.
    pub site: Option<usize>,
    /// Pin index into `P`.
    pub pin: usize,
}

impl PinLocation {
    pub fn new(site: usize, pin: usize) -> Self {
        Self {
            site: Some(site),
            pin,
        }
    }

    pub fn system(pin: usize) -> Self {
        Self { site: None, pin }
    }
}

impl fmt::Display for PinLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.site {
            Some(site) => write!(f, "({site}, {})", self.pin),
            None => write!(f, "(*, {})", self.pin),
        }
    }
}

/// A cell of the per-instrument array: partition and offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstrumentLocation {
    pub partition: usize,
    pub offset: usize,
}

impl InstrumentLocation {
    pub fn new(partition: usize, offset: usize) -> Self {
        Self { partition, offset }
    }
}

impl fmt::Display for InstrumentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.partition, self.offset)
    }
}

/// Per-instrument -> per-site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentToSite {
    /// For each partition, one site index per site-descriptor entry.
    pub partitions: Vec<Vec<usize>>,
    /// Length of the per-site array (`|S|`).
    pub site_count: usize,
}

impl InstrumentToSite {
    /// Per-site destination filled with `fill`.
    pub fn new_destination<T: Clone>(&self, fill: T) -> Vec<T> {
        vec![fill; self.site_count]
    }

    pub fn partition_lengths(&self) -> Vec<usize> {
        self.partitions.iter().map(Vec::len).collect()
    }
}

/// Per-instrument -> per-site-per-pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentToSitePin {
    /// For each partition, one location per channel-descriptor entry.
    pub partitions: Vec<Vec<PinLocation>>,
    pub site_count: usize,
    pub pin_count: usize,
}

impl InstrumentToSitePin {
    /// `|S| x |P|` destination filled with `fill`.
    pub fn new_destination<T: Clone>(&self, fill: T) -> Grid<T> {
        Grid::new(self.site_count, self.pin_count, fill)
    }

    pub fn partition_lengths(&self) -> Vec<usize> {
        self.partitions.iter().map(Vec::len).collect()
    }
}

/// Per-site -> per-instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteToInstrument {
    /// One location per site in `S`, in `S` order.
    pub sites: Vec<InstrumentLocation>,
    pub instrument_count: usize,
    /// Largest site count on any partition; the padded row width.
    pub max_sites_on_instrument: usize,
    /// Site count of each partition, for dropping padding.
    pub partition_lengths: Vec<usize>,
}

impl SiteToInstrument {
    /// Padded `instrument_count x max_sites_on_instrument` destination.
    pub fn new_destination<T: Clone>(&self, fill: T) -> Grid<T> {
        Grid::new(self.instrument_count, self.max_sites_on_instrument, fill)
    }
}

/// Per-site-per-pin -> per-instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitePinToInstrument {
    /// For each site in `S`, one location per pin in `P`.
    pub sites: Vec<Vec<InstrumentLocation>>,
    pub pin_count: usize,
    pub instrument_count: usize,
    /// Largest channel count on any partition; the padded row width.
    pub max_sites_on_instrument: usize,
    /// Channel count of each partition, for dropping padding.
    pub partition_lengths: Vec<usize>,
}

impl SitePinToInstrument {
    /// Padded `instrument_count x max_sites_on_instrument` destination.
    pub fn new_destination<T: Clone>(&self, fill: T) -> Grid<T> {
        Grid::new(self.instrument_count, self.max_sites_on_instrument, fill)
    }

    /// Location of `(site_index, pin_index)`, if both are in range.
    pub fn location(&self, site_index: usize, pin_index: usize) -> Option<InstrumentLocation> {
        self.sites.get(site_index)?.get(pin_index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display() {
        assert_eq!(PinLocation::new(1, 2).to_string(), "(1, 2)");
        assert_eq!(PinLocation::system(0).to_string(), "(*, 0)");
        assert_eq!(InstrumentLocation::new(3, 4).to_string(), "[3:4]");
    }

    #[test]
    fn destinations_are_sized_from_table() {
        let lut = SiteToInstrument {
            sites: vec![InstrumentLocation::new(0, 0), InstrumentLocation::new(1, 0)],
            instrument_count: 2,
            max_sites_on_instrument: 3,
            partition_lengths: vec![3, 1],
        };
        assert_eq!(lut.new_destination(0.0).shape(), (2, 3));

        let lut = InstrumentToSitePin {
            partitions: vec![vec![PinLocation::new(0, 0)]],
            site_count: 4,
            pin_count: 2,
        };
        assert_eq!(lut.new_destination(false).shape(), (4, 2));
        assert_eq!(lut.partition_lengths(), vec![1]);
    }

    #[test]
    fn tables_serialize() {
        let lut = InstrumentToSite {
            partitions: vec![vec![0, 1]],
            site_count: 2,
        };
        let json = serde_json::to_string(&lut).unwrap();
        assert_eq!(json, r#"{"partitions":[[0,1]],"site_count":2}"#);
    }
}
