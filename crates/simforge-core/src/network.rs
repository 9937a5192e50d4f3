use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of digits in a carrier prefix.
pub const PREFIX_LEN: usize = 3;

/// A mobile carrier and the prefixes routed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    /// Prefixes in listed order. Repeats are kept as-is.
    pub prefixes: Vec<String>,
}

impl Network {
    pub fn new(name: impl Into<String>, prefixes: &[&str]) -> Self {
        Self {
            name: name.into(),
            prefixes: prefixes.iter().map(|prefix| prefix.to_string()).collect(),
        }
    }

    /// Prefixes in listed order with in-pool repeats removed.
    pub fn distinct_prefixes(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.prefixes
            .iter()
            .map(String::as_str)
            .filter(|prefix| seen.insert(*prefix))
            .collect()
    }
}

/// Ordered mapping from network name to prefix pool.
///
/// Table order doubles as the default network priority. A prefix may
/// belong to several networks (shared carrier ranges), so lookups by
/// prefix resolve to the first network in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Network>", into = "Vec<Network>")]
pub struct NetworkTable {
    networks: Vec<Network>,
}

impl NetworkTable {
    /// Build a table, rejecting malformed names and prefixes.
    pub fn new(networks: Vec<Network>) -> Result<Self> {
        let mut names = BTreeSet::new();
        for network in &networks {
            if network.name.trim().is_empty() {
                return Err(Error::InvalidTable("network name is empty".to_string()));
            }
            if !names.insert(network.name.as_str()) {
                return Err(Error::InvalidTable(format!(
                    "duplicate network name: {}",
                    network.name
                )));
            }
            for prefix in &network.prefixes {
                if prefix.len() != PREFIX_LEN || !prefix.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::InvalidTable(format!(
                        "prefix '{}' of network '{}' is not {PREFIX_LEN} digits",
                        prefix, network.name
                    )));
                }
            }
        }
        Ok(Self { networks })
    }

    /// Philippine mobile prefixes, in descending network priority.
    ///
    /// Shared ranges ("946", "907", ...) and the repeated "932" under Sun
    /// are part of the published data and kept verbatim.
    pub fn philippines() -> Self {
        Self {
            networks: vec![
                Network::new(
                    "Globe/TM",
                    &[
                        "905", "906", "915", "916", "917", "926", "927", "935", "936", "945",
                    ],
                ),
                Network::new(
                    "Smart",
                    &[
                        "908", "918", "919", "920", "921", "928", "929", "939", "946", "947",
                        "949",
                    ],
                ),
                Network::new(
                    "TNT",
                    &["907", "909", "910", "912", "930", "938", "946", "948", "950"],
                ),
                Network::new(
                    "Smart/TNT",
                    &["907", "908", "909", "910", "912", "913", "914"],
                ),
                Network::new(
                    "Sun",
                    &[
                        "922", "923", "924", "925", "931", "932", "932", "934", "940", "941",
                        "942",
                    ],
                ),
            ],
        }
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn get(&self, name: &str) -> Option<&Network> {
        self.networks.iter().find(|network| network.name == name)
    }

    /// Look up a network or fail with a configuration error.
    pub fn require(&self, name: &str) -> Result<&Network> {
        self.get(name)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown network: {name}")))
    }

    pub fn names(&self) -> Vec<&str> {
        self.networks.iter().map(|network| network.name.as_str()).collect()
    }

    /// Every (network, prefix) pair in table order, repeats included.
    pub fn flattened(&self) -> Vec<(&str, &str)> {
        self.networks
            .iter()
            .flat_map(|network| {
                network
                    .prefixes
                    .iter()
                    .map(move |prefix| (network.name.as_str(), prefix.as_str()))
            })
            .collect()
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.network_for_prefix(prefix).is_some()
    }

    /// First network in table order whose pool holds `prefix`.
    pub fn network_for_prefix(&self, prefix: &str) -> Option<&Network> {
        self.networks
            .iter()
            .find(|network| network.prefixes.iter().any(|p| p == prefix))
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl Default for NetworkTable {
    fn default() -> Self {
        Self::philippines()
    }
}

impl TryFrom<Vec<Network>> for NetworkTable {
    type Error = Error;

    fn try_from(value: Vec<Network>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<NetworkTable> for Vec<Network> {
    fn from(value: NetworkTable) -> Self {
        value.networks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn philippine_table_keeps_repeated_prefix() {
        let table = NetworkTable::philippines();
        let sun = table.get("Sun").expect("sun network");
        assert_eq!(sun.prefixes.iter().filter(|p| *p == "932").count(), 2);
        assert_eq!(sun.distinct_prefixes().len(), sun.prefixes.len() - 1);
    }

    #[test]
    fn shared_prefix_resolves_to_first_network() {
        let table = NetworkTable::philippines();
        let network = table.network_for_prefix("946").expect("946 is assigned");
        assert_eq!(network.name, "Smart");
        assert!(table.get("TNT").expect("tnt").prefixes.contains(&"946".to_string()));
    }

    #[test]
    fn rejects_non_digit_prefix() {
        let result = NetworkTable::new(vec![Network::new("A", &["90a"])]);
        assert!(matches!(result, Err(Error::InvalidTable(_))));
    }

    #[test]
    fn rejects_duplicate_network_name() {
        let result = NetworkTable::new(vec![
            Network::new("A", &["900"]),
            Network::new("A", &["901"]),
        ]);
        assert!(matches!(result, Err(Error::InvalidTable(_))));
    }

    #[test]
    fn require_reports_unknown_network() {
        let table = NetworkTable::philippines();
        assert!(matches!(
            table.require("Dito"),
            Err(Error::InvalidConfig(message)) if message.contains("Dito")
        ));
    }
}
