//! Scatter/gather: moving values between per-instrument and logical shapes.
//!
//! Every function validates all shapes and all locations before the first
//! write, so an error never leaves the destination partially updated.
//!
//! Scatter applies partitions last to first, and entries within a partition
//! last to first, so that on duplicate keys the first claim's value is the
//! one left in the destination, matching the builders' first-match-wins rule.

use crate::error::{LutError, Result};
use crate::grid::Grid;
use crate::table::{InstrumentToSite, InstrumentToSitePin, SitePinToInstrument, SiteToInstrument};

/// Check the per-instrument source lengths against the per-partition LUT lengths.
fn check_partition_shapes<L>(
    lut: &[Vec<L>],
    lengths: impl ExactSizeIterator<Item = usize>,
) -> Result<()> {
    if lengths.len() != lut.len() {
        return Err(LutError::shape("partition count", lut.len(), lengths.len()));
    }
    for (p, (locations, actual)) in lut.iter().zip(lengths).enumerate() {
        if actual != locations.len() {
            return Err(LutError::shape(
                format!("partition {p} values"),
                locations.len(),
                actual,
            ));
        }
    }
    Ok(())
}

/// Scatter per-instrument values into a per-site array.
///
/// `values[p]` must have one value per site entry of partition `p`.
pub fn scatter_per_site<T: Clone, V: AsRef<[T]>>(
    dest: &mut [T],
    lut: &InstrumentToSite,
    values: &[V],
) -> Result<()> {
    check_partition_shapes(&lut.partitions, values.iter().map(|v| v.as_ref().len()))?;
    for (p, locations) in lut.partitions.iter().enumerate() {
        for (offset, &site) in locations.iter().enumerate() {
            if site >= dest.len() {
                return Err(LutError::IndexOutOfRange {
                    location: format!("partition {p} offset {offset}"),
                    axis: "site",
                    index: site,
                    len: dest.len(),
                });
            }
        }
    }

    for (locations, values) in lut.partitions.iter().zip(values).rev() {
        for (&site, value) in locations.iter().zip(values.as_ref()).rev() {
            dest[site] = value.clone();
        }
    }
    tracing::trace!(partitions = values.len(), "scattered per-site values");
    Ok(())
}

/// Scatter per-instrument values into a site x pin grid.
///
/// A system-pin location writes its value into every site row.
pub fn scatter_per_site_pin<T: Clone, V: AsRef<[T]>>(
    dest: &mut Grid<T>,
    lut: &InstrumentToSitePin,
    values: &[V],
) -> Result<()> {
    check_partition_shapes(&lut.partitions, values.iter().map(|v| v.as_ref().len()))?;
    for (p, locations) in lut.partitions.iter().enumerate() {
        for (offset, location) in locations.iter().enumerate() {
            let describe = || format!("{location} of partition {p} offset {offset}");
            match location.site {
                Some(site) => dest.check(site, location.pin, describe)?,
                None if location.pin >= dest.cols() => {
                    return Err(LutError::IndexOutOfRange {
                        location: describe(),
                        axis: "column",
                        index: location.pin,
                        len: dest.cols(),
                    })
                }
                None => {}
            }
        }
    }

    for (locations, values) in lut.partitions.iter().zip(values).rev() {
        for (location, value) in locations.iter().zip(values.as_ref()).rev() {
            match location.site {
                Some(site) => dest[(site, location.pin)] = value.clone(),
                None => {
                    for site in 0..dest.rows() {
                        dest[(site, location.pin)] = value.clone();
                    }
                }
            }
        }
    }
    tracing::trace!(partitions = values.len(), "scattered per-site-per-pin values");
    Ok(())
}

/// Gather per-site values into the padded per-instrument grid.
pub fn gather_per_site<T: Clone>(
    dest: &mut Grid<T>,
    lut: &SiteToInstrument,
    per_site: &[T],
) -> Result<()> {
    if per_site.len() != lut.sites.len() {
        return Err(LutError::shape("per-site values", lut.sites.len(), per_site.len()));
    }
    for (s, location) in lut.sites.iter().enumerate() {
        dest.check(location.partition, location.offset, || {
            format!("{location} of site index {s}")
        })?;
    }

    for (location, value) in lut.sites.iter().zip(per_site) {
        dest[(location.partition, location.offset)] = value.clone();
    }
    tracing::trace!(sites = per_site.len(), "gathered per-site values");
    Ok(())
}

/// Gather a site x pin grid into the padded per-instrument grid.
///
/// Sites are written in `S` order; a system pin shared by every site ends up
/// holding the value of the last site.
pub fn gather_per_site_pin<T: Clone>(
    dest: &mut Grid<T>,
    lut: &SitePinToInstrument,
    per_site_pin: &Grid<T>,
) -> Result<()> {
    if per_site_pin.rows() != lut.sites.len() {
        return Err(LutError::shape("site rows", lut.sites.len(), per_site_pin.rows()));
    }
    if per_site_pin.cols() != lut.pin_count {
        return Err(LutError::shape("pin columns", lut.pin_count, per_site_pin.cols()));
    }
    for (s, pins) in lut.sites.iter().enumerate() {
        if pins.len() != lut.pin_count {
            return Err(LutError::shape(format!("pins of site index {s}"), lut.pin_count, pins.len()));
        }
        for (pin, location) in pins.iter().enumerate() {
            dest.check(location.partition, location.offset, || {
                format!("{location} of site index {s} pin index {pin}")
            })?;
        }
    }

    for (s, pins) in lut.sites.iter().enumerate() {
        for (pin, location) in pins.iter().enumerate() {
            dest[(location.partition, location.offset)] = per_site_pin[(s, pin)].clone();
        }
    }
    tracing::trace!(sites = lut.sites.len(), pins = lut.pin_count, "gathered per-site-per-pin values");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{InstrumentLocation, PinLocation};

    #[test]
    fn scatter_per_site_writes_locations() {
        let lut = InstrumentToSite {
            partitions: vec![vec![0, 1]],
            site_count: 2,
        };
        let mut dest = vec![false, false];
        scatter_per_site(&mut dest, &lut, &[vec![true, false]]).unwrap();
        assert_eq!(dest, vec![true, false]);
    }

    #[test]
    fn scatter_shape_mismatch_writes_nothing() {
        let lut = InstrumentToSite {
            partitions: vec![vec![0], vec![1]],
            site_count: 2,
        };
        let mut dest = vec![0, 0];
        let err = scatter_per_site(&mut dest, &lut, &[vec![5], vec![6, 7]]).unwrap_err();
        assert_eq!(err, LutError::shape("partition 1 values", 1, 2));
        assert_eq!(dest, vec![0, 0]);

        let err = scatter_per_site(&mut dest, &lut, &[vec![5]]).unwrap_err();
        assert_eq!(err, LutError::shape("partition count", 2, 1));
    }

    #[test]
    fn scatter_out_of_range_writes_nothing() {
        let lut = InstrumentToSite {
            partitions: vec![vec![0], vec![3]],
            site_count: 4,
        };
        let mut dest = vec![0, 0];
        let err = scatter_per_site(&mut dest, &lut, &[[1], [2]]).unwrap_err();
        assert!(matches!(err, LutError::IndexOutOfRange { index: 3, len: 2, .. }));
        assert_eq!(dest, vec![0, 0]);
    }

    #[test]
    fn scatter_first_claim_wins() {
        let lut = InstrumentToSite {
            partitions: vec![vec![0], vec![0]],
            site_count: 1,
        };
        let mut dest = vec![0];
        scatter_per_site(&mut dest, &lut, &[[1], [2]]).unwrap();
        assert_eq!(dest, vec![1]);
    }

    #[test]
    fn scatter_per_site_pin_broadcasts_system_pins() {
        let lut = InstrumentToSitePin {
            partitions: vec![vec![PinLocation::system(1), PinLocation::new(0, 0), PinLocation::new(1, 0)]],
            site_count: 2,
            pin_count: 2,
        };
        let mut dest = lut.new_destination(0.0);
        scatter_per_site_pin(&mut dest, &lut, &[vec![5.0, 1.0, 2.0]]).unwrap();
        assert_eq!(dest.to_rows(), vec![vec![1.0, 5.0], vec![2.0, 5.0]]);
    }

    #[test]
    fn scatter_per_site_pin_checks_bounds() {
        let lut = InstrumentToSitePin {
            partitions: vec![vec![PinLocation::new(0, 0), PinLocation::new(0, 2)]],
            site_count: 1,
            pin_count: 3,
        };
        let mut dest = Grid::new(1, 2, 0);
        let err = scatter_per_site_pin(&mut dest, &lut, &[vec![1, 2]]).unwrap_err();
        assert!(matches!(err, LutError::IndexOutOfRange { axis: "column", index: 2, .. }));
        assert_eq!(dest.to_rows(), vec![vec![0, 0]]);
    }

    #[test]
    fn gather_per_site_fills_padded_grid() {
        let lut = SiteToInstrument {
            sites: vec![
                InstrumentLocation::new(0, 0),
                InstrumentLocation::new(1, 0),
                InstrumentLocation::new(0, 1),
            ],
            instrument_count: 2,
            max_sites_on_instrument: 2,
            partition_lengths: vec![2, 1],
        };
        let mut dest = lut.new_destination(-1);
        gather_per_site(&mut dest, &lut, &[10, 11, 12]).unwrap();
        assert_eq!(dest.to_rows(), vec![vec![10, 12], vec![11, -1]]);
        assert_eq!(
            dest.ragged(&lut.partition_lengths).unwrap(),
            vec![vec![10, 12], vec![11]]
        );
    }

    #[test]
    fn gather_per_site_rejects_wrong_length() {
        let lut = SiteToInstrument {
            sites: vec![InstrumentLocation::new(0, 0)],
            instrument_count: 1,
            max_sites_on_instrument: 1,
            partition_lengths: vec![1],
        };
        let mut dest = lut.new_destination(0);
        assert!(matches!(
            gather_per_site(&mut dest, &lut, &[1, 2]).unwrap_err(),
            LutError::ShapeMismatch { expected: 1, actual: 2, .. }
        ));
    }

    #[test]
    fn gather_per_site_rejects_undersized_destination() {
        let lut = SiteToInstrument {
            sites: vec![InstrumentLocation::new(0, 0), InstrumentLocation::new(1, 0)],
            instrument_count: 2,
            max_sites_on_instrument: 1,
            partition_lengths: vec![1, 1],
        };
        let mut dest = Grid::new(1, 1, 0);
        let err = gather_per_site(&mut dest, &lut, &[1, 2]).unwrap_err();
        assert!(matches!(err, LutError::IndexOutOfRange { axis: "row", index: 1, len: 1, .. }));
        assert_eq!(dest.to_rows(), vec![vec![0]]);
    }

    #[test]
    fn gather_per_site_pin_last_site_wins_for_system_pins() {
        let lut = SitePinToInstrument {
            sites: vec![
                vec![InstrumentLocation::new(0, 1), InstrumentLocation::new(0, 0)],
                vec![InstrumentLocation::new(0, 2), InstrumentLocation::new(0, 0)],
            ],
            pin_count: 2,
            instrument_count: 1,
            max_sites_on_instrument: 3,
            partition_lengths: vec![3],
        };
        let values = Grid::from_rows(vec![vec![1, 100], vec![2, 200]]).unwrap();
        let mut dest = lut.new_destination(0);
        gather_per_site_pin(&mut dest, &lut, &values).unwrap();
        assert_eq!(dest.to_rows(), vec![vec![200, 1, 2]]);
    }

    #[test]
    fn gather_per_site_pin_rejects_undersized_destination() {
        let lut = SitePinToInstrument {
            sites: vec![
                vec![InstrumentLocation::new(0, 0), InstrumentLocation::new(0, 1)],
                vec![InstrumentLocation::new(0, 2), InstrumentLocation::new(0, 3)],
            ],
            pin_count: 2,
            instrument_count: 1,
            max_sites_on_instrument: 4,
            partition_lengths: vec![4],
        };
        let values = Grid::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let mut dest = Grid::new(1, 3, 0);
        let err = gather_per_site_pin(&mut dest, &lut, &values).unwrap_err();
        assert!(matches!(err, LutError::IndexOutOfRange { axis: "column", index: 3, len: 3, .. }));
        assert_eq!(dest.to_rows(), vec![vec![0, 0, 0]]);

        let mut dest = Grid::new(0, 4, 0);
        let err = gather_per_site_pin(&mut dest, &lut, &values).unwrap_err();
        assert!(matches!(err, LutError::IndexOutOfRange { axis: "row", index: 0, len: 0, .. }));
    }

    #[test]
    fn gather_per_site_pin_checks_source_shape() {
        let lut = SitePinToInstrument {
            sites: vec![vec![InstrumentLocation::new(0, 0)]],
            pin_count: 1,
            instrument_count: 1,
            max_sites_on_instrument: 1,
            partition_lengths: vec![1],
        };
        let mut dest = lut.new_destination(0);
        let values = Grid::new(1, 2, 0);
        assert_eq!(
            gather_per_site_pin(&mut dest, &lut, &values).unwrap_err(),
            LutError::shape("pin columns", 1, 2)
        );
        let values = Grid::new(2, 1, 0);
        assert_eq!(
            gather_per_site_pin(&mut dest, &lut, &values).unwrap_err(),
            LutError::shape("site rows", 1, 2)
        );
    }
}
