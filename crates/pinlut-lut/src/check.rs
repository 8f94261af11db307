//! Whole-map diagnostics.
//!
//! The builders stop at the first problem. [`check_mapping`] walks the whole
//! partition set against a context and reports every duplicate channel claim,
//! every entry outside the caller's lists and every logical coordinate nobody
//! claims, so a misconfigured pin map can be fixed in one pass.
//!
//! A site listed by several site descriptors is not a problem: one site's
//! pins are often split across instruments.

use std::collections::{HashMap, HashSet};
use std::fmt;

use pinlut_core::{format_channel, PartitionSet, PinKind, PinSiteContext, Site};
use serde::Serialize;

/// One problem found in a pin map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MappingIssue {
    /// A (site, pin) channel is claimed more than once.
    Duplicate {
        key: String,
        /// Every claiming partition, in order (may repeat).
        partitions: Vec<usize>,
    },
    /// A partition owns a site that is not in the caller's site list.
    UnknownSite { site: u32, partition: usize },
    /// A partition owns a channel whose (site, pin) is not in the caller's lists.
    UnknownChannel { channel: String, partition: usize },
    /// A caller site is not owned by any partition's site descriptor.
    UnclaimedSite { site: u32 },
    /// A caller (site, pin) is not owned by any partition's channel descriptor.
    UnclaimedChannel { channel: String },
}

impl fmt::Display for MappingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingIssue::Duplicate { key, partitions } => {
                write!(f, "{key} is claimed by partitions {partitions:?}")
            }
            MappingIssue::UnknownSite { site, partition } => {
                write!(f, "partition {partition} owns site{site}, which is not in the site list")
            }
            MappingIssue::UnknownChannel { channel, partition } => write!(
                f,
                "partition {partition} owns channel {channel}, which is not in the site/pin lists"
            ),
            MappingIssue::UnclaimedSite { site } => {
                write!(f, "site{site} is not owned by any partition")
            }
            MappingIssue::UnclaimedChannel { channel } => {
                write!(f, "channel {channel} is not owned by any partition")
            }
        }
    }
}

/// Result of [`check_mapping`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingReport {
    pub issues: Vec<MappingIssue>,
}

impl MappingReport {
    /// True when every channel is claimed exactly once, every site at least
    /// once, and nothing is unknown.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn duplicates(&self) -> impl Iterator<Item = &MappingIssue> {
        self.issues
            .iter()
            .filter(|i| matches!(i, MappingIssue::Duplicate { .. }))
    }
}

/// Check a partition set against a context.
///
/// Site-descriptor issues are only reported when the set carries site
/// descriptors, and channel issues only when the context has pins, so a
/// per-site-only or channel-only map is checked for what it describes.
pub fn check_mapping(set: &PartitionSet, context: &PinSiteContext) -> MappingReport {
    let mut issues = Vec::new();

    // Site descriptors.
    let mut claimed_sites: HashSet<u32> = HashSet::new();
    for (p, partition) in set.iter().enumerate() {
        for entry in &partition.sites {
            if context.site_index(entry.site).is_none() {
                issues.push(MappingIssue::UnknownSite {
                    site: entry.site,
                    partition: p,
                });
            }
            claimed_sites.insert(entry.site);
        }
    }
    if set.site_entry_count() > 0 {
        for &site in context.sites() {
            if !claimed_sites.contains(&site) {
                issues.push(MappingIssue::UnclaimedSite { site });
            }
        }
    }

    // Channel descriptors.
    let mut channel_claims: HashMap<(Site, &str), Vec<usize>> = HashMap::new();
    let mut channel_order = Vec::new();
    for (p, partition) in set.iter().enumerate() {
        for channel in &partition.channels {
            let known = match (channel.site, context.pin_kind(&channel.pin)) {
                (Site::System, Some(PinKind::System)) => true,
                (Site::Number(n), Some(PinKind::Site)) => context.site_index(n).is_some(),
                _ => false,
            };
            if !known {
                issues.push(MappingIssue::UnknownChannel {
                    channel: channel.to_string(),
                    partition: p,
                });
            }
            let key = (channel.site, channel.pin.as_str());
            let claims = channel_claims.entry(key).or_default();
            if claims.is_empty() {
                channel_order.push(key);
            }
            claims.push(p);
        }
    }
    for key in &channel_order {
        let partitions = &channel_claims[key];
        if partitions.len() > 1 {
            issues.push(MappingIssue::Duplicate {
                key: format_channel(key.0, key.1),
                partitions: partitions.clone(),
            });
        }
    }
    if context.pin_count() > 0 {
        for (site, pin) in context.expand() {
            if !channel_claims.contains_key(&(site, pin)) {
                issues.push(MappingIssue::UnclaimedChannel {
                    channel: format_channel(site, pin),
                });
            }
        }
    }

    tracing::debug!(
        partitions = set.len(),
        issues = issues.len(),
        "checked pin mapping"
    );
    MappingReport { issues }
}
