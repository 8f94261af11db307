//! `pinlut filter`: write a snapshot restricted to a subset of sites.

use std::path::Path;

use anyhow::{Context, Result};
use pinlut_core::{filter_by_sites, filter_by_sites_keep_system, parse_site_list};

use super::{export_format, Export};
use crate::snapshot::{load_snapshot, snapshot_to_toml, Snapshot};

/// Filter the snapshot's partitions and context to `sites` and print the result.
pub fn run(
    snapshot_path: &Path,
    sites: &str,
    keep_system: bool,
    export: Option<&str>,
) -> Result<()> {
    let format = export_format(export, &[Export::Toml, Export::Json])?;
    let snapshot = load_snapshot(snapshot_path)?;
    let filtered = filter_snapshot(&snapshot, sites, keep_system)?;

    match format {
        Export::Json => println!("{}", serde_json::to_string_pretty(&filtered)?),
        _ => print!("{}", snapshot_to_toml(&filtered)?),
    }
    Ok(())
}

/// The snapshot restricted to `sites`: context sites outside the list are
/// removed, and partitions keep only their entries for the listed sites.
/// System channels survive only with `keep_system`.
pub fn filter_snapshot(snapshot: &Snapshot, sites: &str, keep_system: bool) -> Result<Snapshot> {
    let keep = parse_site_list(sites).context("parsing --sites")?;
    let partitions = if keep_system {
        filter_by_sites_keep_system(&snapshot.partitions, &keep)
    } else {
        filter_by_sites(&snapshot.partitions, &keep)
    }
    .context("filtering partitions")?;

    let mut context = snapshot.context.clone();
    context.sites.retain(|site| keep.contains(site));
    Ok(Snapshot {
        context,
        partitions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::parse_snapshot;

    #[test]
    fn filter_keeps_listed_sites() {
        let snapshot = parse_snapshot(
            r#"
[context]
sites = [0, 1, 2]
pins = [{ name = "A" }, { name = "VCC", kind = "system" }]

[[partition]]
session = "dig"
channels = "site0/A,site1/A,VCC"
sites = "site0,site1"

[[partition]]
session = "dig2"
channels = "site2/A"
sites = "site2"
"#,
        )
        .unwrap();

        let filtered = filter_snapshot(&snapshot, "site1", false).unwrap();
        assert_eq!(filtered.context.sites, vec![1]);
        assert_eq!(filtered.partitions.len(), 1);
        assert_eq!(filtered.partitions[0].channels, "site1/A");
        assert_eq!(filtered.partitions[0].sites, "site1");

        let filtered = filter_snapshot(&snapshot, "site1", true).unwrap();
        assert_eq!(filtered.partitions[0].channels, "site1/A,VCC");

        let filtered = filter_snapshot(&snapshot, "0,2", false).unwrap();
        assert_eq!(filtered.context.sites, vec![0, 2]);
        assert_eq!(filtered.partitions[1].channels, "site2/A");
    }

    #[test]
    fn bad_site_list() {
        let err = filter_snapshot(&Snapshot::default(), "site", false).unwrap_err();
        assert!(format!("{err:#}").contains("--sites"));
    }

    #[test]
    fn run_writes_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinmap.toml");
        std::fs::write(
            &path,
            "[context]\nsites = [0]\n[[partition]]\nsession = \"x\"\nsites = \"site0\"\n",
        )
        .unwrap();
        run(&path, "0", false, None).unwrap();
        run(&path, "0", true, Some("json")).unwrap();
        assert!(run(&path, "0", false, Some("text")).is_err());
    }
}
