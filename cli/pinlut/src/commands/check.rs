//! `pinlut check`: structural validation plus whole-map diagnostics.

use std::path::Path;

use anyhow::{bail, Result};
use pinlut_core::PartitionSet;
use pinlut_lut::{check_mapping, MappingIssue};

use super::{export_format, Export};
use crate::snapshot::{load_snapshot, validate_snapshot, Snapshot, ValidationIssue};

/// Validate a snapshot and report every problem in its pin map.
///
/// Fails if any error-severity issue or mapping issue was found.
pub fn run(snapshot_path: &Path, export: Option<&str>) -> Result<()> {
    let format = export_format(export, &[Export::Text, Export::Json])?;
    let snapshot = load_snapshot(snapshot_path)?;
    let (validation, mapping) = check_snapshot(&snapshot);

    if format == Export::Json {
        let json = serde_json::json!({
            "file": snapshot_path.display().to_string(),
            "validation": validation,
            "mapping": mapping,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("--- {} ---", snapshot_path.display());
        for issue in &validation {
            println!("  {}: {}", issue.severity, issue.message);
        }
        for issue in &mapping {
            println!("  mapping: {issue}");
        }
        if validation.is_empty() && mapping.is_empty() {
            println!("  ok");
        }
    }

    let errors = validation.iter().filter(|i| i.severity == "error").count() + mapping.len();
    if errors > 0 {
        bail!("{} found {errors} problem(s)", snapshot_path.display());
    }
    Ok(())
}

/// Run structural validation, then, if the snapshot is usable, the mapping check.
pub fn check_snapshot(snapshot: &Snapshot) -> (Vec<ValidationIssue>, Vec<MappingIssue>) {
    let validation = validate_snapshot(snapshot).err().unwrap_or_default();
    if validation.iter().any(|i| i.severity == "error") {
        return (validation, Vec::new());
    }

    let (Ok(context), Ok(set)) = (
        snapshot.pin_site_context(),
        PartitionSet::parse(&snapshot.partitions),
    ) else {
        return (validation, Vec::new());
    };
    (validation, check_mapping(&set, &context).issues)
}
