//! Instrument partitions: one instrument session and the channels/sites it owns.
//!
//! The pin-map layer resolves a logical pin list to an ordered list of
//! [`InstrumentPartition`]s. A [`PartitionSet`] is that list parsed once, so
//! builders, filters and checks work on typed `(site, pin)` entries and never
//! re-parse descriptor text.

use serde::{Deserialize, Serialize};

use crate::descriptor::{parse_channels, parse_sites, ChannelRef, SiteRef};
use crate::error::Result;

/// One instrument session with its channel and site descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentPartition {
    /// Instrument session or resource name.
    #[serde(default)]
    pub session: String,
    /// Channel descriptor, e.g. `site0/A,site1/A`.
    #[serde(default)]
    pub channels: String,
    /// Site descriptor, e.g. `site0,site1`.
    #[serde(default)]
    pub sites: String,
}

impl InstrumentPartition {
    pub fn new(
        session: impl Into<String>,
        channels: impl Into<String>,
        sites: impl Into<String>,
    ) -> Self {
        Self {
            session: session.into(),
            channels: channels.into(),
            sites: sites.into(),
        }
    }

    /// Parse both descriptors.
    pub fn parse(&self) -> Result<ParsedPartition> {
        Ok(ParsedPartition {
            session: self.session.clone(),
            channels: parse_channels(&self.channels)?,
            sites: parse_sites(&self.sites)?,
        })
    }
}

/// A partition with its descriptors parsed into typed entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedPartition {
    pub session: String,
    pub channels: Vec<ChannelRef>,
    pub sites: Vec<SiteRef>,
}

impl ParsedPartition {
    /// Serialize back to descriptor form, keeping the raw tokens.
    pub fn to_partition(&self) -> InstrumentPartition {
        InstrumentPartition {
            session: self.session.clone(),
            channels: crate::descriptor::format_channels(&self.channels),
            sites: crate::descriptor::format_sites(&self.sites),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() && self.sites.is_empty()
    }
}

/// An ordered, parsed snapshot of the partitions behind one pin resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSet {
    partitions: Vec<ParsedPartition>,
}

impl PartitionSet {
    /// Parse every partition, failing on the first malformed descriptor.
    pub fn parse(partitions: &[InstrumentPartition]) -> Result<Self> {
        let partitions = partitions
            .iter()
            .map(InstrumentPartition::parse)
            .collect::<Result<Vec<_>>>()?;
        tracing::trace!(partitions = partitions.len(), "parsed partition set");
        Ok(Self { partitions })
    }

    pub fn from_parsed(partitions: Vec<ParsedPartition>) -> Self {
        Self { partitions }
    }

    pub fn partitions(&self) -> &[ParsedPartition] {
        &self.partitions
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParsedPartition> {
        self.partitions.iter()
    }

    /// Total channel entries across all partitions.
    pub fn channel_count(&self) -> usize {
        self.partitions.iter().map(|p| p.channels.len()).sum()
    }

    /// Total site entries across all partitions.
    pub fn site_entry_count(&self) -> usize {
        self.partitions.iter().map(|p| p.sites.len()).sum()
    }

    /// Serialize every partition back to descriptor form.
    pub fn to_partitions(&self) -> Vec<InstrumentPartition> {
        self.partitions.iter().map(ParsedPartition::to_partition).collect()
    }
}

impl<'a> IntoIterator for &'a PartitionSet {
    type Item = &'a ParsedPartition;
    type IntoIter = std::slice::Iter<'a, ParsedPartition>;

    fn into_iter(self) -> Self::IntoIter {
        self.partitions.iter()
    }
}
