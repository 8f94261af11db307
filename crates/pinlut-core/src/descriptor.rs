//! Channel and site descriptor parsing and formatting.
//!
//! Descriptors are the textual coordinates handed over by the pin-map layer:
//!
//! - a **channel descriptor** lists the channels an instrument partition owns,
//!   e.g. `site0/CS, site1/CS` or `VCC` for a system pin. A backslash works as
//!   the site/pin separator too (`site0\CS`).
//! - a **site descriptor** lists the sites it owns, e.g. `site0,site1`.
//!
//! Token order is significant: LUT offsets index into it. Both parsers
//! return exactly one entry per comma-separated token, and nothing for an
//! empty descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DescriptorError, DescriptorKind, Result};
use crate::site::{parse_site_tag, Site, MAX_SITE, SITE_PREFIX};

/// One parsed token of a channel descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRef {
    /// The trimmed token exactly as it appeared in the descriptor.
    pub raw: String,
    /// Pin name.
    pub pin: String,
    /// Owning site, [`Site::System`] for a bare pin token.
    pub site: Site,
}

impl ChannelRef {
    /// Create a channel reference with its canonical raw text.
    pub fn new(site: Site, pin: impl Into<String>) -> Self {
        let pin = pin.into();
        Self {
            raw: format_channel(site, &pin),
            pin,
            site,
        }
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_channel(self.site, &self.pin))
    }
}

/// One parsed token of a site descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteRef {
    /// The site number.
    pub site: u32,
    /// The trimmed token exactly as it appeared in the descriptor.
    pub raw: String,
}

impl SiteRef {
    pub fn new(site: u32) -> Self {
        Self {
            site,
            raw: format!("{SITE_PREFIX}{site}"),
        }
    }
}

impl fmt::Display for SiteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SITE_PREFIX}{}", self.site)
    }
}

/// Split a descriptor into trimmed tokens.
///
/// An empty or all-whitespace descriptor has no tokens; naive splitting
/// would yield one empty token. Empty tokens anywhere else are malformed.
fn tokens(descriptor: &str, kind: DescriptorKind) -> Result<Vec<&str>> {
    if descriptor.trim().is_empty() {
        return Ok(Vec::new());
    }
    descriptor
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(position, token)| {
            if token.is_empty() {
                Err(DescriptorError::malformed(kind, token, position, "is empty"))
            } else {
                Ok(token)
            }
        })
        .collect()
}

/// Parse a channel descriptor into its `(raw, pin, site)` entries.
///
/// Each token is split on its first `/` or `\`. The left side must be a
/// `site<N>` tag; with no separator the whole token is a system pin.
pub fn parse_channels(descriptor: &str) -> Result<Vec<ChannelRef>> {
    tokens(descriptor, DescriptorKind::Channel)?
        .into_iter()
        .enumerate()
        .map(|(position, token)| parse_channel_token(token, position))
        .collect()
}

fn parse_channel_token(token: &str, position: usize) -> Result<ChannelRef> {
    let malformed =
        |reason: &str| DescriptorError::malformed(DescriptorKind::Channel, token, position, reason);

    let Some(split) = token.find(|c: char| c == '/' || c == '\\') else {
        return Ok(ChannelRef {
            raw: token.to_string(),
            pin: token.to_string(),
            site: Site::System,
        });
    };

    let (site_text, rest) = token.split_at(split);
    let pin = rest[1..].trim();
    let site = parse_site_tag(site_text.trim()).map_err(|reason| malformed(reason))?;
    if pin.is_empty() {
        return Err(malformed("has an empty pin name"));
    }
    Ok(ChannelRef {
        raw: token.to_string(),
        pin: pin.to_string(),
        site: Site::Number(site),
    })
}

/// Parse a site descriptor into its `(site_number, raw)` entries.
pub fn parse_sites(descriptor: &str) -> Result<Vec<SiteRef>> {
    tokens(descriptor, DescriptorKind::Site)?
        .into_iter()
        .enumerate()
        .map(|(position, token)| {
            parse_site_tag(token)
                .map(|site| SiteRef {
                    site,
                    raw: token.to_string(),
                })
                .map_err(|reason| {
                    DescriptorError::malformed(DescriptorKind::Site, token, position, reason)
                })
        })
        .collect()
}

/// Parse a caller-supplied site list such as `0,2,3` or `site0,site2`.
///
/// Bare numbers and site tags may be mixed.
pub fn parse_site_list(list: &str) -> Result<Vec<u32>> {
    tokens(list, DescriptorKind::Site)?
        .into_iter()
        .enumerate()
        .map(|(position, token)| {
            let parsed = if token.bytes().all(|b| b.is_ascii_digit()) {
                token
                    .parse::<u32>()
                    .ok()
                    .filter(|&n| n <= MAX_SITE)
                    .ok_or("has a site number that is too large")
            } else {
                parse_site_tag(token)
            };
            parsed.map_err(|reason| {
                DescriptorError::malformed(DescriptorKind::Site, token, position, reason)
            })
        })
        .collect()
}

/// Canonical text of one channel: `site<N>/<pin>`, or `<pin>` for a system pin.
pub fn format_channel(site: Site, pin: &str) -> String {
    match site {
        Site::System => pin.to_string(),
        Site::Number(n) => format!("{SITE_PREFIX}{n}/{pin}"),
    }
}

/// Join channel references back into a descriptor, keeping their raw text.
pub fn format_channels<'a>(channels: impl IntoIterator<Item = &'a ChannelRef>) -> String {
    join_raw(channels.into_iter().map(|c| c.raw.as_str()))
}

/// Join site references back into a descriptor, keeping their raw text.
pub fn format_sites<'a>(sites: impl IntoIterator<Item = &'a SiteRef>) -> String {
    join_raw(sites.into_iter().map(|s| s.raw.as_str()))
}

fn join_raw<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_descriptors_have_no_entries() {
        assert!(parse_channels("").unwrap().is_empty());
        assert!(parse_sites("").unwrap().is_empty());
        assert!(parse_channels("   ").unwrap().is_empty());
        assert!(parse_sites(" \t").unwrap().is_empty());
    }

    #[test]
    fn parse_site_channels() {
        let channels = parse_channels("site0/CS, site1/CS").unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].pin, "CS");
        assert_eq!(channels[0].site, Site::Number(0));
        assert_eq!(channels[0].raw, "site0/CS");
        assert_eq!(channels[1].site, Site::Number(1));
        assert_eq!(channels[1].raw, "site1/CS");
    }

    #[test]
    fn parse_backslash_separator() {
        let channels = parse_channels("site3\\DIO0").unwrap();
        assert_eq!(channels[0].site, Site::Number(3));
        assert_eq!(channels[0].pin, "DIO0");
        assert_eq!(channels[0].raw, "site3\\DIO0");
    }

    #[test]
    fn splits_on_first_separator_only() {
        let channels = parse_channels("site1/bus/0").unwrap();
        assert_eq!(channels[0].site, Site::Number(1));
        assert_eq!(channels[0].pin, "bus/0");
    }

    #[test]
    fn bare_token_is_system_pin() {
        let channels = parse_channels("VCC,site0/A").unwrap();
        assert_eq!(channels[0].site, Site::System);
        assert_eq!(channels[0].pin, "VCC");
        assert_eq!(channels[0].site.as_i64(), -1);
        assert_eq!(channels[1].site, Site::Number(0));
    }

    #[test]
    fn malformed_channel_site_tag() {
        let err = parse_channels("site0/A,slot1/A").unwrap_err();
        assert_eq!(err.token(), "slot1/A");
        assert_eq!(err.position(), 1);
        assert!(matches!(
            err,
            DescriptorError::Malformed {
                kind: DescriptorKind::Channel,
                ..
            }
        ));
    }

    #[test]
    fn empty_pin_is_malformed() {
        let err = parse_channels("site0/").unwrap_err();
        assert_eq!(err.token(), "site0/");
    }

    #[test]
    fn empty_inner_token_is_malformed() {
        let err = parse_sites("site0,,site1").unwrap_err();
        assert_eq!(err.position(), 1);
        let err = parse_channels("site0/A,").unwrap_err();
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn parse_sites_in_order() {
        let sites = parse_sites("site3, site1 ,site2").unwrap();
        let numbers: Vec<u32> = sites.iter().map(|s| s.site).collect();
        assert_eq!(numbers, vec![3, 1, 2]);
        assert_eq!(sites[1].raw, "site1");
    }

    #[test]
    fn malformed_site_token_is_reported() {
        let err = parse_sites("site2X").unwrap_err();
        assert_eq!(err.token(), "site2X");
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn site_list_accepts_numbers_and_tags() {
        assert_eq!(parse_site_list("0, 2,site5").unwrap(), vec![0, 2, 5]);
        assert!(parse_site_list("").unwrap().is_empty());
        assert!(parse_site_list("1,x").is_err());
    }

    #[test]
    fn formatting() {
        assert_eq!(format_channel(Site::Number(4), "A"), "site4/A");
        assert_eq!(format_channel(Site::System, "VCC"), "VCC");
        assert_eq!(ChannelRef::new(Site::Number(1), "B").to_string(), "site1/B");
        assert_eq!(SiteRef::new(9).to_string(), "site9");

        let channels = parse_channels("site0\\A, site1/A").unwrap();
        assert_eq!(format_channels(&channels), "site0\\A,site1/A");
        let sites = parse_sites(" site0 , site1").unwrap();
        assert_eq!(format_sites(&sites), "site0,site1");
        assert_eq!(format_sites(&[]), "");
    }

    #[test]
    fn formatted_descriptors_parse_back() {
        let channels = vec![
            ChannelRef::new(Site::Number(0), "A"),
            ChannelRef::new(Site::System, "VCC"),
        ];
        let text = format_channels(&channels);
        assert_eq!(parse_channels(&text).unwrap(), channels);
    }
}
