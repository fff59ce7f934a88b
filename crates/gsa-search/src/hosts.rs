use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Appliance endpoint kinds reachable from one base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    Suggest,
    /// Feeds go to the bare host; the feed client adds the port.
    Feed,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Search => "/search",
            Endpoint::Suggest => "/suggest",
            Endpoint::Feed => "",
        }
    }
}

/// Logical system name → appliance base address, e.g.
/// `intranet = "http://gsa.example.com"`. Names match case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemHosts(HashMap<String, String>);

impl SystemHosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, system: impl Into<String>, base_address: impl Into<String>) {
        self.0.insert(system.into(), base_address.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn systems(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Address of `endpoint` on the appliance serving `system`.
    pub fn resolve(&self, system: &str, endpoint: Endpoint) -> Option<String> {
        let base = self
            .0
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(system))
            .map(|(_, base)| base.trim_end_matches('/'))?;
        Some(format!("{}{}", base, endpoint.path()))
    }
}

impl FromIterator<(String, String)> for SystemHosts {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> SystemHosts {
        let mut hosts = SystemHosts::new();
        hosts.insert("Intranet", "http://gsa.example.com/");
        hosts
    }

    #[test]
    fn test_resolve_endpoints() {
        let hosts = hosts();
        assert_eq!(
            hosts.resolve("Intranet", Endpoint::Search).as_deref(),
            Some("http://gsa.example.com/search")
        );
        assert_eq!(
            hosts.resolve("intranet", Endpoint::Suggest).as_deref(),
            Some("http://gsa.example.com/suggest")
        );
        assert_eq!(
            hosts.resolve("INTRANET", Endpoint::Feed).as_deref(),
            Some("http://gsa.example.com")
        );
    }

    #[test]
    fn test_unknown_system() {
        assert!(hosts().resolve("extranet", Endpoint::Search).is_none());
    }

    #[test]
    fn test_deserialize_from_table() {
        let hosts: SystemHosts =
            serde_json::from_str(r#"{"a": "http://a", "b": "http://b"}"#).unwrap();
        assert_eq!(hosts.resolve("b", Endpoint::Feed).as_deref(), Some("http://b"));
    }
}
