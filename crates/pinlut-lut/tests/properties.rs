//! Property tests over randomly laid out pin maps.

use pinlut_core::{InstrumentPartition, PartitionSet, PinSiteContext};
use pinlut_lut::{
    gather_per_site, gather_per_site_pin, scatter_per_site, scatter_per_site_pin, LutBuilder,
};
use proptest::prelude::*;

/// A pin map where every (site, pin) is owned by exactly one partition.
#[derive(Debug, Clone)]
struct Layout {
    sites: Vec<u32>,
    pins: Vec<String>,
    partitions: Vec<InstrumentPartition>,
}

/// Assign each (site, pin) to one of `owners` partitions. A partition's
/// site descriptor lists the sites of its channels, first-seen order.
fn layout(site_count: usize, pin_count: usize, owners: &[usize], reverse: bool) -> Layout {
    let sites: Vec<u32> = (0..site_count as u32).map(|s| s * 2 + 1).collect();
    let pins: Vec<String> = (0..pin_count).map(|p| format!("P{p}")).collect();
    let partition_count = owners.iter().copied().max().map_or(0, |m| m + 1);

    let mut channels = vec![Vec::new(); partition_count];
    let mut site_lists: Vec<Vec<u32>> = vec![Vec::new(); partition_count];
    let mut site_owner = std::collections::HashMap::new();
    for (i, &owner) in owners.iter().enumerate() {
        let site = sites[i / pin_count];
        channels[owner].push(format!("site{site}/{}", pins[i % pin_count]));
        // Each site belongs to the partition owning its first pin.
        if site_owner.insert(site, owner).is_none() {
            site_lists[owner].push(site);
        }
    }

    let partitions = channels
        .into_iter()
        .zip(site_lists)
        .enumerate()
        .map(|(p, (mut channels, sites))| {
            if reverse {
                channels.reverse();
            }
            let sites: Vec<String> = sites.iter().map(|s| format!("site{s}")).collect();
            InstrumentPartition::new(format!("inst{p}"), channels.join(","), sites.join(","))
        })
        .collect();
    Layout {
        sites,
        pins,
        partitions,
    }
}

fn layouts() -> impl Strategy<Value = Layout> {
    (1usize..6, 1usize..4)
        .prop_flat_map(|(sites, pins)| {
            (
                Just(sites),
                Just(pins),
                prop::collection::vec(0usize..4, sites * pins),
                any::<bool>(),
            )
        })
        .prop_map(|(sites, pins, owners, reverse)| layout(sites, pins, &owners, reverse))
}

fn context(layout: &Layout) -> PinSiteContext {
    PinSiteContext::with_site_pins(layout.sites.clone(), layout.pins.clone()).unwrap()
}

proptest! {
    #[test]
    fn site_pin_round_trip(layout in layouts()) {
        let set = PartitionSet::parse(&layout.partitions).unwrap();
        let context = context(&layout);
        let builder = LutBuilder::new(&context).strict();

        let values: Vec<Vec<usize>> = set
            .iter()
            .enumerate()
            .map(|(p, partition)| (0..partition.channels.len()).map(|o| p * 100 + o).collect())
            .collect();

        let forward = builder.instrument_to_site_pin(&set).unwrap();
        let mut per_site_pin = forward.new_destination(usize::MAX);
        scatter_per_site_pin(&mut per_site_pin, &forward, &values).unwrap();
        prop_assert!(per_site_pin.iter_rows().flatten().all(|&v| v != usize::MAX));

        let inverse = builder.site_pin_to_instrument(&set).unwrap();
        let mut gathered = inverse.new_destination(usize::MAX);
        gather_per_site_pin(&mut gathered, &inverse, &per_site_pin).unwrap();
        prop_assert_eq!(gathered.ragged(&inverse.partition_lengths).unwrap(), values);
    }

    #[test]
    fn site_round_trip(layout in layouts()) {
        let set = PartitionSet::parse(&layout.partitions).unwrap();
        let context = PinSiteContext::sites_only(layout.sites.clone()).unwrap();
        let builder = LutBuilder::new(&context).strict();

        let values: Vec<Vec<u32>> = set
            .iter()
            .map(|partition| partition.sites.iter().map(|entry| entry.site * 10).collect())
            .collect();

        let forward = builder.instrument_to_site(&set).unwrap();
        let mut per_site = forward.new_destination(0);
        scatter_per_site(&mut per_site, &forward, &values).unwrap();
        let expected: Vec<u32> = layout.sites.iter().map(|s| s * 10).collect();
        prop_assert_eq!(&per_site, &expected);

        let inverse = builder.site_to_instrument(&set).unwrap();
        let mut gathered = inverse.new_destination(0);
        gather_per_site(&mut gathered, &inverse, &per_site).unwrap();
        prop_assert_eq!(gathered.ragged(&inverse.partition_lengths).unwrap(), values);
    }

    #[test]
    fn every_site_pin_resolves_inside_its_partition(layout in layouts()) {
        let set = PartitionSet::parse(&layout.partitions).unwrap();
        let context = context(&layout);
        let lut = LutBuilder::new(&context).site_pin_to_instrument(&set).unwrap();

        prop_assert_eq!(lut.sites.len(), layout.sites.len());
        for pins in &lut.sites {
            prop_assert_eq!(pins.len(), layout.pins.len());
            for location in pins {
                prop_assert!(location.partition < lut.instrument_count);
                prop_assert!(location.offset < lut.partition_lengths[location.partition]);
                prop_assert!(location.offset < lut.max_sites_on_instrument);
            }
        }
    }

    #[test]
    fn filtering_is_idempotent(layout in layouts(), keep in prop::collection::vec(any::<bool>(), 6)) {
        let desired: Vec<u32> = layout
            .sites
            .iter()
            .zip(&keep)
            .filter_map(|(&site, &k)| k.then_some(site))
            .collect();
        let set = PartitionSet::parse(&layout.partitions).unwrap();
        let once = set.filter_sites(&desired);
        prop_assert_eq!(once.filter_sites(&desired), once.clone());

        // The filtered map is still complete for the desired sites.
        let context = context(&layout).restrict_sites(&desired);
        let lut = LutBuilder::new(&context).strict().instrument_to_site_pin(&once).unwrap();
        prop_assert_eq!(lut.partition_lengths().iter().sum::<usize>(), desired.len() * layout.pins.len());
    }
}
