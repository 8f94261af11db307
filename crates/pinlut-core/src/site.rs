//! Site identifiers and `site<N>` tag parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of every site tag (`site0`, `site12`, ...).
pub const SITE_PREFIX: &str = "site";

/// Numeric value used for system-scoped resources at the descriptor boundary.
pub const SYSTEM_SITE: i64 = -1;

/// Largest site number. Sites share a signed encoding with [`SYSTEM_SITE`],
/// so they are bounded by `i32::MAX`.
pub const MAX_SITE: u32 = i32::MAX as u32;

/// A parallel test position, or the system scope shared by all sites.
///
/// At the boundary sites travel as integers, with `-1` meaning "no site".
/// Serialization keeps that encoding; numbers above [`MAX_SITE`] are
/// rejected when read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Site {
    /// Not tied to a site; the resource is shared by every site.
    System,
    /// A numbered site.
    Number(u32),
}

impl Site {
    /// The site number, or `None` for the system scope.
    pub fn number(self) -> Option<u32> {
        match self {
            Site::System => None,
            Site::Number(n) => Some(n),
        }
    }

    pub fn is_system(self) -> bool {
        matches!(self, Site::System)
    }

    /// Integer encoding, `-1` for [`Site::System`].
    pub fn as_i64(self) -> i64 {
        match self {
            Site::System => SYSTEM_SITE,
            Site::Number(n) => i64::from(n),
        }
    }
}

impl TryFrom<u32> for Site {
    type Error = String;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        if n > MAX_SITE {
            return Err(format!("site number {n} exceeds the maximum of {MAX_SITE}"));
        }
        Ok(Site::Number(n))
    }
}

impl From<Site> for i64 {
    fn from(site: Site) -> Self {
        site.as_i64()
    }
}

impl TryFrom<i64> for Site {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            SYSTEM_SITE => Ok(Site::System),
            n if n >= 0 => u32::try_from(n)
                .map_err(|_| format!("site number {n} exceeds the maximum of {MAX_SITE}"))
                .and_then(Site::try_from),
            n => Err(format!("invalid site number {n}: expected -1 or a non-negative integer")),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::System => write!(f, "system"),
            Site::Number(n) => write!(f, "{SITE_PREFIX}{n}"),
        }
    }
}

/// Parse the text of a site tag.
///
/// The fixed `site` prefix is stripped and the remainder must be one or more
/// ASCII digits. Returns a short reason on failure so callers can wrap it with
/// token and position context.
pub fn parse_site_tag(tag: &str) -> Result<u32, &'static str> {
    let digits = tag
        .strip_prefix(SITE_PREFIX)
        .ok_or("does not start with 'site'")?;
    if digits.is_empty() {
        return Err("has no site number after 'site'");
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("has a non-digit site number");
    }
    digits
        .parse::<u32>()
        .ok()
        .filter(|&n| n <= MAX_SITE)
        .ok_or("has a site number that is too large")
}
