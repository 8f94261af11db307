//! The caller's canonical site and pin lists.
//!
//! A [`PinSiteContext`] is built once per logical session and passed
//! explicitly to every builder. Its order defines the axes of the per-site and
//! per-site-per-pin arrays.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ContextError;
use crate::site::{Site, MAX_SITE};

/// Whether a pin has one instance per site or one shared instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PinKind {
    /// One instance per site (`site<N>/<pin>` channels).
    #[default]
    Site,
    /// One instance shared by all sites (bare `<pin>` channels).
    System,
}

/// A named pin and its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinSpec {
    pub name: String,
    #[serde(default)]
    pub kind: PinKind,
}

impl PinSpec {
    pub fn site(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PinKind::Site,
        }
    }

    pub fn system(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PinKind::System,
        }
    }
}

/// Serializable form of a context, as it appears in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSpec {
    /// Ordered site numbers.
    #[serde(default)]
    pub sites: Vec<u32>,
    /// Ordered pins.
    #[serde(default)]
    pub pins: Vec<PinSpec>,
}

/// Immutable, ordered site list `S` and pin list `P` with hash-backed lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinSiteContext {
    sites: Vec<u32>,
    pins: Vec<PinSpec>,
    site_index: HashMap<u32, usize>,
    pin_index: HashMap<String, usize>,
}

impl PinSiteContext {
    /// Build a context, rejecting duplicate or out-of-range sites and
    /// duplicate or invalid pin names.
    pub fn new(
        sites: impl IntoIterator<Item = u32>,
        pins: impl IntoIterator<Item = PinSpec>,
    ) -> Result<Self, ContextError> {
        let sites: Vec<u32> = sites.into_iter().collect();
        let pins: Vec<PinSpec> = pins.into_iter().collect();

        let mut site_index = HashMap::with_capacity(sites.len());
        for (index, &site) in sites.iter().enumerate() {
            if site > MAX_SITE {
                return Err(ContextError::SiteOutOfRange(site));
            }
            if site_index.insert(site, index).is_some() {
                return Err(ContextError::DuplicateSite(site));
            }
        }

        let mut pin_index = HashMap::with_capacity(pins.len());
        for (index, pin) in pins.iter().enumerate() {
            validate_pin_name(&pin.name)?;
            if pin_index.insert(pin.name.clone(), index).is_some() {
                return Err(ContextError::DuplicatePin(pin.name.clone()));
            }
        }

        Ok(Self {
            sites,
            pins,
            site_index,
            pin_index,
        })
    }

    /// Context with site pins only.
    pub fn with_site_pins<S: Into<String>>(
        sites: impl IntoIterator<Item = u32>,
        pins: impl IntoIterator<Item = S>,
    ) -> Result<Self, ContextError> {
        Self::new(sites, pins.into_iter().map(PinSpec::site))
    }

    /// Context with no pins, for per-site operations.
    pub fn sites_only(sites: impl IntoIterator<Item = u32>) -> Result<Self, ContextError> {
        Self::new(sites, std::iter::empty())
    }

    pub fn from_spec(spec: &ContextSpec) -> Result<Self, ContextError> {
        Self::new(spec.sites.iter().copied(), spec.pins.iter().cloned())
    }

    pub fn to_spec(&self) -> ContextSpec {
        ContextSpec {
            sites: self.sites.clone(),
            pins: self.pins.clone(),
        }
    }

    pub fn sites(&self) -> &[u32] {
        &self.sites
    }

    pub fn pins(&self) -> &[PinSpec] {
        &self.pins
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Position of `site` in `S`.
    pub fn site_index(&self, site: u32) -> Option<usize> {
        self.site_index.get(&site).copied()
    }

    /// Position of the pin named `name` in `P`.
    pub fn pin_index(&self, name: &str) -> Option<usize> {
        self.pin_index.get(name).copied()
    }

    pub fn pin_kind(&self, name: &str) -> Option<PinKind> {
        self.pin_index(name).map(|i| self.pins[i].kind)
    }

    /// Site-scoped pins, in `P` order.
    pub fn site_pins(&self) -> impl Iterator<Item = &PinSpec> {
        self.pins.iter().filter(|p| p.kind == PinKind::Site)
    }

    /// System pins, in `P` order.
    pub fn system_pins(&self) -> impl Iterator<Item = &PinSpec> {
        self.pins.iter().filter(|p| p.kind == PinKind::System)
    }

    /// Logical (site, pin) pairs: site pins for every site in site-major
    /// order, then each system pin once with [`Site::System`].
    pub fn expand(&self) -> Vec<(Site, &str)> {
        let mut pairs = Vec::with_capacity(self.sites.len() * self.pins.len());
        for &site in &self.sites {
            for pin in self.site_pins() {
                pairs.push((Site::Number(site), pin.name.as_str()));
            }
        }
        for pin in self.system_pins() {
            pairs.push((Site::System, pin.name.as_str()));
        }
        pairs
    }

    /// The same context with `S` reduced to the sites in `keep`, in `S` order.
    pub fn restrict_sites(&self, keep: &[u32]) -> Self {
        let keep: HashSet<u32> = keep.iter().copied().collect();
        let sites: Vec<u32> = self.sites.iter().copied().filter(|s| keep.contains(s)).collect();
        let site_index = sites.iter().enumerate().map(|(i, &s)| (s, i)).collect();
        Self {
            sites,
            pins: self.pins.clone(),
            site_index,
            pin_index: self.pin_index.clone(),
        }
    }
}

fn validate_pin_name(name: &str) -> Result<(), ContextError> {
    if name.trim().is_empty() {
        return Err(ContextError::EmptyPinName);
    }
    if name.contains(|c: char| matches!(c, ',' | '/' | '\\')) || name.trim() != name {
        return Err(ContextError::InvalidPinName(name.to_string()));
    }
    Ok(())
}
