//! `pinlut lut`: build and print one of the four lookup tables.

use std::path::Path;

use anyhow::{bail, Context, Result};
use pinlut_core::{parse_site_list, PartitionSet, PinKind};
use pinlut_lut::{DuplicatePolicy, LutBuilder};

use super::{export_format, Export};
use crate::snapshot::load_snapshot;

/// Build the LUT named by `kind` from a snapshot and print it.
pub fn run(
    snapshot_path: &Path,
    kind: &str,
    strict: bool,
    sites: Option<&str>,
    export: Option<&str>,
) -> Result<()> {
    let format = export_format(export, &[Export::Text, Export::Json])?;
    let snapshot = load_snapshot(snapshot_path)?;
    let mut context = snapshot.pin_site_context()?;
    let mut set = PartitionSet::parse(&snapshot.partitions)
        .with_context(|| format!("parsing partitions of {}", snapshot_path.display()))?;

    if let Some(list) = sites {
        let keep = parse_site_list(list).context("parsing --sites")?;
        set = set.filter_sites_keep_system(&keep);
        context = context.restrict_sites(&keep);
    }

    let policy = if strict {
        DuplicatePolicy::Strict
    } else {
        DuplicatePolicy::FirstMatchWins
    };
    let builder = LutBuilder::new(&context).with_policy(policy);
    let session = |p: usize| set.partitions()[p].session.as_str();

    match kind {
        "instrument-to-site" => {
            let lut = builder.instrument_to_site(&set)?;
            if format == Export::Json {
                println!("{}", serde_json::to_string_pretty(&lut)?);
                return Ok(());
            }
            println!("instrument -> site ({} sites)", lut.site_count);
            for (p, indices) in lut.partitions.iter().enumerate() {
                println!("  [{p}] {}", session(p));
                for (offset, &index) in indices.iter().enumerate() {
                    println!("      {offset:>3} -> site{}", context.sites()[index]);
                }
            }
        }
        "instrument-to-site-pin" => {
            let lut = builder.instrument_to_site_pin(&set)?;
            if format == Export::Json {
                println!("{}", serde_json::to_string_pretty(&lut)?);
                return Ok(());
            }
            println!(
                "instrument -> site x pin ({} sites, {} pins)",
                lut.site_count, lut.pin_count
            );
            for (p, locations) in lut.partitions.iter().enumerate() {
                println!("  [{p}] {}", session(p));
                for (offset, location) in locations.iter().enumerate() {
                    let pin = &context.pins()[location.pin].name;
                    match location.site {
                        Some(index) => println!(
                            "      {offset:>3} -> site{}/{pin} {location}",
                            context.sites()[index]
                        ),
                        None => println!("      {offset:>3} -> {pin} (all sites) {location}"),
                    }
                }
            }
        }
        "site-to-instrument" => {
            let lut = builder.site_to_instrument(&set)?;
            if format == Export::Json {
                println!("{}", serde_json::to_string_pretty(&lut)?);
                return Ok(());
            }
            println!(
                "site -> instrument ({} instruments, up to {} sites each)",
                lut.instrument_count, lut.max_sites_on_instrument
            );
            for (site, location) in context.sites().iter().zip(&lut.sites) {
                println!("  site{site:<6} -> {location} {}", session(location.partition));
            }
        }
        "site-pin-to-instrument" => {
            let lut = builder.site_pin_to_instrument(&set)?;
            if format == Export::Json {
                println!("{}", serde_json::to_string_pretty(&lut)?);
                return Ok(());
            }
            println!(
                "site x pin -> instrument ({} instruments, up to {} channels each)",
                lut.instrument_count, lut.max_sites_on_instrument
            );
            for (site, pins) in context.sites().iter().zip(&lut.sites) {
                for (pin, location) in context.pins().iter().zip(pins) {
                    let name = match pin.kind {
                        PinKind::Site => format!("site{site}/{}", pin.name),
                        PinKind::System => pin.name.clone(),
                    };
                    println!("  {name:<20} -> {location} {}", session(location.partition));
                }
            }
        }
        other => bail!(
            "unknown LUT kind: '{other}' (expected instrument-to-site, instrument-to-site-pin, \
             site-to-instrument or site-pin-to-instrument)"
        ),
    }
    Ok(())
}
