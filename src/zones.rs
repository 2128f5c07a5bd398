//! Hosted zone lookup
//!
//! Zones are never created, only referenced. The catalog plays the role of
//! a lookup cache: it is filled from the config file ahead of planning, so
//! building a plan stays free of network I/O.

use serde::{Deserialize, Serialize};

/// An existing public DNS zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostedZone {
    /// Provider-assigned zone id
    pub id: String,
    /// Zone apex, e.g. `example.org`
    pub name: String,
}

/// Resolves a domain to the hosted zone that serves it
pub trait ZoneLookup {
    fn find(&self, domain: &str) -> Option<&HostedZone>;
}

/// In-memory zone catalog
#[derive(Debug, Clone, Default)]
pub struct ZoneCatalog {
    zones: Vec<HostedZone>,
}

impl ZoneCatalog {
    pub fn new(zones: Vec<HostedZone>) -> Self {
        Self { zones }
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> &[HostedZone] {
        &self.zones
    }
}

impl ZoneLookup for ZoneCatalog {
    /// Exact name match, ignoring case and a trailing dot
    fn find(&self, domain: &str) -> Option<&HostedZone> {
        let wanted = normalize(domain);
        self.zones.iter().find(|z| normalize(&z.name) == wanted)
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}
