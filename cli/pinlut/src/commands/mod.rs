//! CLI command implementations.

pub mod check;
pub mod filter;
pub mod lut;
pub mod parse;

use anyhow::{bail, Result};

/// Output format selected by `--export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Export {
    Text,
    Json,
    Toml,
}

/// Resolve `--export`, accepting only the formats a command supports.
/// The first entry of `allowed` is the default.
pub fn export_format(export: Option<&str>, allowed: &[Export]) -> Result<Export> {
    let Some(name) = export else {
        return Ok(allowed[0]);
    };
    let format = match name {
        "text" => Export::Text,
        "json" => Export::Json,
        "toml" => Export::Toml,
        other => bail!("unknown export format: '{other}'"),
    };
    if !allowed.contains(&format) {
        bail!("export format '{name}' is not supported here");
    }
    Ok(format)
}
