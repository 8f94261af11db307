//! Restricting a partition set to a subset of sites.
//!
//! Used to scope later LUT builds and data exchanges to the sites a test step
//! runs on, without resolving instrument sessions again.

use std::collections::HashSet;

use crate::error::Result;
use crate::partition::{InstrumentPartition, ParsedPartition, PartitionSet};

impl PartitionSet {
    /// Keep only the channel and site entries that belong to `desired_sites`.
    ///
    /// Entry order within each partition is preserved. System channels have
    /// no site number and are dropped; use
    /// [`filter_sites_keep_system`](Self::filter_sites_keep_system) to retain
    /// them. Partitions left with no entries are dropped.
    pub fn filter_sites(&self, desired_sites: &[u32]) -> PartitionSet {
        self.filter_with(desired_sites, false)
    }

    /// Like [`filter_sites`](Self::filter_sites), but system channels are
    /// retained wherever they appear.
    pub fn filter_sites_keep_system(&self, desired_sites: &[u32]) -> PartitionSet {
        self.filter_with(desired_sites, true)
    }

    fn filter_with(&self, desired_sites: &[u32], keep_system: bool) -> PartitionSet {
        let desired: HashSet<u32> = desired_sites.iter().copied().collect();
        let filtered: Vec<ParsedPartition> = self
            .iter()
            .map(|partition| ParsedPartition {
                session: partition.session.clone(),
                channels: partition
                    .channels
                    .iter()
                    .filter(|c| c.site.number().map_or(keep_system, |n| desired.contains(&n)))
                    .cloned()
                    .collect(),
                sites: partition
                    .sites
                    .iter()
                    .filter(|s| desired.contains(&s.site))
                    .cloned()
                    .collect(),
            })
            .filter(|partition| !partition.is_empty())
            .collect();

        tracing::debug!(
            before = self.len(),
            after = filtered.len(),
            sites = desired_sites.len(),
            keep_system,
            "filtered partitions by site"
        );
        PartitionSet::from_parsed(filtered)
    }
}

/// Filter descriptor-form partitions down to `desired_sites`.
///
/// Parses each partition, filters as [`PartitionSet::filter_sites`] does and
/// serializes the retained entries back into descriptors.
pub fn filter_by_sites(
    partitions: &[InstrumentPartition],
    desired_sites: &[u32],
) -> Result<Vec<InstrumentPartition>> {
    let set = PartitionSet::parse(partitions)?;
    Ok(set.filter_sites(desired_sites).to_partitions())
}

/// [`filter_by_sites`] that keeps system channels.
pub fn filter_by_sites_keep_system(
    partitions: &[InstrumentPartition],
    desired_sites: &[u32],
) -> Result<Vec<InstrumentPartition>> {
    let set = PartitionSet::parse(partitions)?;
    Ok(set.filter_sites_keep_system(desired_sites).to_partitions())
}
