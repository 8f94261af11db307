//! Logical/physical lookup tables and scatter/gather for multi-site instruments.
//!
//! Given the parsed instrument partitions of a pin resolution
//! ([`pinlut_core::PartitionSet`]) and the caller's ordered site and pin lists
//! ([`pinlut_core::PinSiteContext`]), this crate builds four LUT shapes:
//!
//! | builder                              | from            | to                |
//! |--------------------------------------|-----------------|-------------------|
//! | [`LutBuilder::instrument_to_site`]     | per instrument  | per site          |
//! | [`LutBuilder::instrument_to_site_pin`] | per instrument  | per site per pin  |
//! | [`LutBuilder::site_to_instrument`]     | per site        | per instrument    |
//! | [`LutBuilder::site_pin_to_instrument`] | per site per pin| per instrument    |
//!
//! and applies them with [`scatter_per_site`], [`scatter_per_site_pin`],
//! [`gather_per_site`] and [`gather_per_site_pin`].
//!
//! # Example
//!
//! ```rust
//! use pinlut_core::{InstrumentPartition, PinSiteContext};
//! use pinlut_lut::{build_instrument_to_site, scatter_per_site};
//!
//! let partitions = vec![InstrumentPartition::new("dig", "site0/CS,site1/CS", "site0,site1")];
//! let context = PinSiteContext::sites_only([0, 1]).unwrap();
//!
//! let lut = build_instrument_to_site(&partitions, &context).unwrap();
//! let mut passed = lut.new_destination(false);
//! scatter_per_site(&mut passed, &lut, &[vec![true, false]]).unwrap();
//! assert_eq!(passed, vec![true, false]);
//! ```

pub mod apply;
pub mod build;
pub mod check;
pub mod error;
pub mod grid;
pub mod table;

pub use apply::{gather_per_site, gather_per_site_pin, scatter_per_site, scatter_per_site_pin};
pub use build::{
    build_instrument_to_site, build_instrument_to_site_pin, build_site_pin_to_instrument,
    build_site_to_instrument, DuplicatePolicy, LutBuilder,
};
pub use check::{check_mapping, MappingIssue, MappingReport};
pub use error::LutError;
pub use grid::Grid;
pub use table::{
    InstrumentLocation, InstrumentToSite, InstrumentToSitePin, PinLocation, SitePinToInstrument,
    SiteToInstrument,
};
