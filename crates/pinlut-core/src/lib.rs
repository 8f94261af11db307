//! Site/pin data model and descriptor handling for multi-site test equipment.
//!
//! Test code addresses data per (site, pin). Instruments address it per
//! (session, channel). The pin map describes which instrument session owns
//! which channels as text descriptors such as `site0/CS,site1/CS`. This crate
//! holds the boundary of that translation:
//!
//! - [`descriptor`] parses channel and site descriptors into typed entries
//!   and formats them back.
//! - [`context`] holds the caller's ordered site and pin lists.
//! - [`partition`] models instrument partitions and parsed snapshots of them.
//! - [`filter`] restricts a snapshot to a subset of sites.
//!
//! Lookup tables and scatter/gather live in `pinlut-lut`.

pub mod context;
pub mod descriptor;
pub mod error;
pub mod filter;
pub mod partition;
pub mod site;

pub use context::{ContextSpec, PinKind, PinSiteContext, PinSpec};
pub use descriptor::{
    format_channel, format_channels, format_sites, parse_channels, parse_site_list, parse_sites,
    ChannelRef, SiteRef,
};
pub use error::{ContextError, DescriptorError, DescriptorKind};
pub use filter::{filter_by_sites, filter_by_sites_keep_system};
pub use partition::{InstrumentPartition, ParsedPartition, PartitionSet};
pub use site::{Site, MAX_SITE};
