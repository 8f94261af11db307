//! LUT construction.
//!
//! All four builders walk the parsed partitions once. Key membership is
//! hash-backed, so the inverse builders stay linear in the total channel
//! count.
//!
//! When two partitions (or two entries of one partition) claim the same
//! `(site, pin)` key, [`DuplicatePolicy::FirstMatchWins`] keeps the first
//! claim in partition order and [`DuplicatePolicy::Strict`] fails with
//! [`LutError::AmbiguousMapping`].
//!
//! Site descriptors are not subject to the policy. A site whose pins are
//! split across instruments is listed by each of them, so the per-site
//! inverse table resolves a shared site to its first partition.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use pinlut_core::{
    ChannelRef, InstrumentPartition, PartitionSet, PinKind, PinSiteContext, Site,
};
use serde::{Deserialize, Serialize};

use crate::error::{LutError, Result};
use crate::table::{
    InstrumentLocation, InstrumentToSite, InstrumentToSitePin, PinLocation, SitePinToInstrument,
    SiteToInstrument,
};

/// How duplicate claims on one `(site, pin)` key are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The first claim in partition order wins; later ones are logged and ignored.
    #[default]
    FirstMatchWins,
    /// Any duplicate claim is an error.
    Strict,
}

/// First claim on each key, with the duplicate policy applied.
struct Claims<K> {
    policy: DuplicatePolicy,
    first: HashMap<K, InstrumentLocation>,
}

impl<K: Hash + Eq> Claims<K> {
    fn new(policy: DuplicatePolicy, capacity: usize) -> Self {
        Self {
            policy,
            first: HashMap::with_capacity(capacity),
        }
    }

    fn claim(
        &mut self,
        key: K,
        location: InstrumentLocation,
        describe: impl FnOnce() -> String,
    ) -> Result<()> {
        match self.first.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(location);
                Ok(())
            }
            Entry::Occupied(existing) => {
                let first = existing.get().partition;
                match self.policy {
                    DuplicatePolicy::Strict => Err(LutError::AmbiguousMapping {
                        key: describe(),
                        first,
                        second: location.partition,
                    }),
                    DuplicatePolicy::FirstMatchWins => {
                        tracing::warn!(
                            key = %describe(),
                            first,
                            second = location.partition,
                            "duplicate mapping, keeping first claim"
                        );
                        Ok(())
                    }
                }
            }
        }
    }

    fn get(&self, key: &K) -> Option<InstrumentLocation> {
        self.first.get(key).copied()
    }
}

/// Builds lookup tables against one site/pin context.
#[derive(Debug, Clone, Copy)]
pub struct LutBuilder<'a> {
    context: &'a PinSiteContext,
    policy: DuplicatePolicy,
}

impl<'a> LutBuilder<'a> {
    /// A builder with the default first-match-wins policy.
    pub fn new(context: &'a PinSiteContext) -> Self {
        Self {
            context,
            policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn strict(self) -> Self {
        self.with_policy(DuplicatePolicy::Strict)
    }

    pub fn context(&self) -> &'a PinSiteContext {
        self.context
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Per-instrument -> per-site, from each partition's site descriptor.
    pub fn instrument_to_site(&self, set: &PartitionSet) -> Result<InstrumentToSite> {
        let mut partitions = Vec::with_capacity(set.len());

        for (p, partition) in set.iter().enumerate() {
            let mut indices = Vec::with_capacity(partition.sites.len());
            for entry in &partition.sites {
                let index = self.context.site_index(entry.site).ok_or(LutError::UnresolvedSite {
                    site: Site::Number(entry.site),
                    partition: Some(p),
                })?;
                indices.push(index);
            }
            tracing::trace!(partition = p, session = %partition.session, ?indices, "site locations");
            partitions.push(indices);
        }

        tracing::debug!(
            partitions = partitions.len(),
            sites = self.context.site_count(),
            "built instrument-to-site LUT"
        );
        Ok(InstrumentToSite {
            partitions,
            site_count: self.context.site_count(),
        })
    }

    /// Per-instrument -> per-site-per-pin, from each partition's channel descriptor.
    pub fn instrument_to_site_pin(&self, set: &PartitionSet) -> Result<InstrumentToSitePin> {
        let mut claims = Claims::new(self.policy, set.channel_count());
        let mut partitions = Vec::with_capacity(set.len());

        for (p, partition) in set.iter().enumerate() {
            let mut locations = Vec::with_capacity(partition.channels.len());
            for (offset, channel) in partition.channels.iter().enumerate() {
                let location = self.resolve_channel(channel, p)?;
                claims.claim(
                    (channel.site, channel.pin.as_str()),
                    InstrumentLocation::new(p, offset),
                    || channel.to_string(),
                )?;
                locations.push(location);
            }
            tracing::trace!(partition = p, session = %partition.session, channels = locations.len(), "channel locations");
            partitions.push(locations);
        }

        tracing::debug!(
            partitions = partitions.len(),
            sites = self.context.site_count(),
            pins = self.context.pin_count(),
            "built instrument-to-site-pin LUT"
        );
        Ok(InstrumentToSitePin {
            partitions,
            site_count: self.context.site_count(),
            pin_count: self.context.pin_count(),
        })
    }

    /// Per-site -> per-instrument: where each site in `S` lives.
    ///
    /// Partition sites outside `S` are not an error here; they simply receive
    /// no value when gathering. A site listed by several partitions resolves
    /// to the first of them under either policy.
    pub fn site_to_instrument(&self, set: &PartitionSet) -> Result<SiteToInstrument> {
        let mut first: HashMap<u32, InstrumentLocation> =
            HashMap::with_capacity(set.site_entry_count());
        let mut partition_lengths = Vec::with_capacity(set.len());

        for (p, partition) in set.iter().enumerate() {
            for (offset, entry) in partition.sites.iter().enumerate() {
                first
                    .entry(entry.site)
                    .or_insert(InstrumentLocation::new(p, offset));
            }
            partition_lengths.push(partition.sites.len());
        }

        let sites = self
            .context
            .sites()
            .iter()
            .map(|&site| {
                first.get(&site).copied().ok_or(LutError::UnresolvedSite {
                    site: Site::Number(site),
                    partition: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let max_sites_on_instrument = partition_lengths.iter().copied().max().unwrap_or(0);
        tracing::debug!(
            sites = sites.len(),
            instruments = set.len(),
            max_sites_on_instrument,
            "built site-to-instrument LUT"
        );
        Ok(SiteToInstrument {
            sites,
            instrument_count: set.len(),
            max_sites_on_instrument,
            partition_lengths,
        })
    }

    /// Per-site-per-pin -> per-instrument: where each `(site, pin)` lives.
    ///
    /// A system pin resolves to the same instrument cell for every site.
    pub fn site_pin_to_instrument(&self, set: &PartitionSet) -> Result<SitePinToInstrument> {
        let mut claims = Claims::new(self.policy, set.channel_count());
        let mut partition_lengths = Vec::with_capacity(set.len());

        for (p, partition) in set.iter().enumerate() {
            for (offset, channel) in partition.channels.iter().enumerate() {
                claims.claim(
                    (channel.site, channel.pin.as_str()),
                    InstrumentLocation::new(p, offset),
                    || channel.to_string(),
                )?;
            }
            partition_lengths.push(partition.channels.len());
        }

        let sites = self
            .context
            .sites()
            .iter()
            .map(|&site| {
                self.context
                    .pins()
                    .iter()
                    .map(|pin| {
                        let key_site = match pin.kind {
                            PinKind::Site => Site::Number(site),
                            PinKind::System => Site::System,
                        };
                        claims
                            .get(&(key_site, pin.name.as_str()))
                            .ok_or_else(|| LutError::UnresolvedPin {
                                pin: pin.name.clone(),
                                site: key_site,
                                partition: None,
                            })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let max_sites_on_instrument = partition_lengths.iter().copied().max().unwrap_or(0);
        tracing::debug!(
            sites = sites.len(),
            pins = self.context.pin_count(),
            instruments = set.len(),
            max_sites_on_instrument,
            "built site-pin-to-instrument LUT"
        );
        Ok(SitePinToInstrument {
            sites,
            pin_count: self.context.pin_count(),
            instrument_count: set.len(),
            max_sites_on_instrument,
            partition_lengths,
        })
    }

    /// Map one channel to its cell in the site x pin array.
    ///
    /// A site-tagged channel must name a site pin and a site in `S`; a bare
    /// channel must name a system pin.
    fn resolve_channel(&self, channel: &ChannelRef, partition: usize) -> Result<PinLocation> {
        let unresolved_pin = || LutError::UnresolvedPin {
            pin: channel.pin.clone(),
            site: channel.site,
            partition: Some(partition),
        };
        let pin = self.context.pin_index(&channel.pin).ok_or_else(unresolved_pin)?;
        match (channel.site, self.context.pins()[pin].kind) {
            (Site::System, PinKind::System) => Ok(PinLocation::system(pin)),
            (Site::Number(n), PinKind::Site) => {
                let site = self.context.site_index(n).ok_or(LutError::UnresolvedSite {
                    site: channel.site,
                    partition: Some(partition),
                })?;
                Ok(PinLocation::new(site, pin))
            }
            _ => Err(unresolved_pin()),
        }
    }
}

/// Parse `partitions` and build the per-instrument -> per-site LUT.
pub fn build_instrument_to_site(
    partitions: &[InstrumentPartition],
    context: &PinSiteContext,
) -> Result<InstrumentToSite> {
    LutBuilder::new(context).instrument_to_site(&PartitionSet::parse(partitions)?)
}

/// Parse `partitions` and build the per-instrument -> per-site-per-pin LUT.
pub fn build_instrument_to_site_pin(
    partitions: &[InstrumentPartition],
    context: &PinSiteContext,
) -> Result<InstrumentToSitePin> {
    LutBuilder::new(context).instrument_to_site_pin(&PartitionSet::parse(partitions)?)
}

/// Parse `partitions` and build the per-site -> per-instrument LUT.
pub fn build_site_to_instrument(
    partitions: &[InstrumentPartition],
    context: &PinSiteContext,
) -> Result<SiteToInstrument> {
    LutBuilder::new(context).site_to_instrument(&PartitionSet::parse(partitions)?)
}

/// Parse `partitions` and build the per-site-per-pin -> per-instrument LUT.
pub fn build_site_pin_to_instrument(
    partitions: &[InstrumentPartition],
    context: &PinSiteContext,
) -> Result<SitePinToInstrument> {
    LutBuilder::new(context).site_pin_to_instrument(&PartitionSet::parse(partitions)?)
}
