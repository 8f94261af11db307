//! `pinlut parse`: show how a descriptor is tokenized.

use anyhow::{Context, Result};
use pinlut_core::{parse_channels, parse_sites};

use super::{export_format, Export};

/// Parse a channel descriptor and print one entry per line.
pub fn channels(descriptor: &str, export: Option<&str>) -> Result<()> {
    let format = export_format(export, &[Export::Text, Export::Json])?;
    let channels = parse_channels(descriptor).context("parsing channel descriptor")?;

    if format == Export::Json {
        println!("{}", serde_json::to_string_pretty(&channels)?);
        return Ok(());
    }
    for (i, channel) in channels.iter().enumerate() {
        println!(
            "  {i:>3}  {:<20} site {:<7} pin {}",
            channel.raw,
            channel.site.to_string(),
            channel.pin
        );
    }
    println!("{} channel(s)", channels.len());
    Ok(())
}

/// Parse a site descriptor and print one entry per line.
pub fn sites(descriptor: &str, export: Option<&str>) -> Result<()> {
    let format = export_format(export, &[Export::Text, Export::Json])?;
    let sites = parse_sites(descriptor).context("parsing site descriptor")?;

    if format == Export::Json {
        println!("{}", serde_json::to_string_pretty(&sites)?);
        return Ok(());
    }
    for (i, entry) in sites.iter().enumerate() {
        println!("  {i:>3}  {:<12} site {}", entry.raw, entry.site);
    }
    println!("{} site(s)", sites.len());
    Ok(())
}
