//! Pin-map snapshot files: the caller's site/pin lists plus the instrument
//! partitions resolved for them, stored as TOML.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use pinlut_core::{ContextSpec, InstrumentPartition, PinSiteContext};
use serde::{Deserialize, Serialize};

/// A pin-map snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ordered sites and pins.
    #[serde(default)]
    pub context: ContextSpec,
    /// Instrument partitions, in resolution order.
    #[serde(default, rename = "partition")]
    pub partitions: Vec<InstrumentPartition>,
}

impl Snapshot {
    /// Build the lookup context from the `[context]` section.
    pub fn pin_site_context(&self) -> Result<PinSiteContext> {
        PinSiteContext::from_spec(&self.context).context("invalid [context] section")
    }
}

/// A validation issue found in a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Load a snapshot from a TOML file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        bail!("snapshot file not found: {}", path.display());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_snapshot(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Parse a snapshot from a TOML string.
pub fn parse_snapshot(toml_str: &str) -> Result<Snapshot> {
    let snapshot: Snapshot = toml::from_str(toml_str)?;
    tracing::debug!(
        sites = snapshot.context.sites.len(),
        pins = snapshot.context.pins.len(),
        partitions = snapshot.partitions.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

/// Serialize a snapshot to pretty TOML.
pub fn snapshot_to_toml(snapshot: &Snapshot) -> Result<String> {
    Ok(toml::to_string_pretty(snapshot)?)
}

/// Check a snapshot for structural problems.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with every problem found.
pub fn validate_snapshot(snapshot: &Snapshot) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for &site in &snapshot.context.sites {
        if !seen.insert(site) {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("site {site} is listed more than once"),
            });
        }
    }

    let mut seen = HashSet::new();
    for pin in &snapshot.context.pins {
        if !seen.insert(pin.name.as_str()) {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("pin '{}' is listed more than once", pin.name),
            });
        }
    }
    // Pin name rules live in the context constructor.
    if issues.is_empty() {
        if let Err(e) = PinSiteContext::from_spec(&snapshot.context) {
            issues.push(ValidationIssue {
                severity: "error",
                message: e.to_string(),
            });
        }
    }

    for (p, partition) in snapshot.partitions.iter().enumerate() {
        if partition.session.trim().is_empty() {
            issues.push(ValidationIssue {
                severity: "warning",
                message: format!("partition {p} has no session name"),
            });
        }
        if let Err(e) = partition.parse() {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("partition {p} ({}): {e}", partition.session),
            });
        }
    }

    if snapshot.partitions.is_empty() {
        issues.push(ValidationIssue {
            severity: "warning",
            message: "snapshot has no partitions".into(),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
