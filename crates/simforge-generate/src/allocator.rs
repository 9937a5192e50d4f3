use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use simforge_core::{Allocation, FillStrategy, Network, NetworkCount, NetworkTable};

use crate::errors::GenerationError;

/// One slot of the unique segment: the prefix a record will be built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixPick {
    pub network: String,
    pub prefix: String,
}

impl PrefixPick {
    pub fn new(network: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            prefix: prefix.into(),
        }
    }
}

/// Turn an allocation request into an ordered list of prefix picks.
pub fn allocate<R: Rng + ?Sized>(
    table: &NetworkTable,
    allocation: &Allocation,
    rng: &mut R,
) -> Result<Vec<PrefixPick>, GenerationError> {
    let picks = match allocation {
        Allocation::Priority {
            unique,
            order,
            fill,
        } => {
            let networks = priority_networks(table, order.as_deref())?;
            let mut picks = coverage_phase(&networks, *unique);
            let remaining = unique.saturating_sub(picks.len());
            if remaining > 0 {
                let filled = fill_phase(&networks, &picks, *fill, remaining, rng)?;
                picks.extend(filled);
            }
            picks
        }
        Allocation::Explicit { networks } => explicit_counts(table, networks, rng)?,
        Allocation::Uniform { count } => uniform_draws(table, *count, rng)?,
    };

    Ok(picks)
}

/// Resolve the priority order, defaulting to table order.
pub fn priority_networks<'a>(
    table: &'a NetworkTable,
    order: Option<&[String]>,
) -> Result<Vec<&'a Network>, GenerationError> {
    match order {
        None => Ok(table.networks().iter().collect()),
        Some(order) => order
            .iter()
            .map(|name| table.require(name).map_err(GenerationError::from))
            .collect(),
    }
}

/// First phase: one pick per distinct prefix of each network, in order,
/// stopping at `limit`.
pub fn coverage_phase(networks: &[&Network], limit: usize) -> Vec<PrefixPick> {
    networks
        .iter()
        .flat_map(|network| {
            network
                .distinct_prefixes()
                .into_iter()
                .map(move |prefix| PrefixPick::new(network.name.as_str(), prefix))
        })
        .take(limit)
        .collect()
}

/// Second phase: `remaining` uniform draws from the fill pool.
pub fn fill_phase<R: Rng + ?Sized>(
    networks: &[&Network],
    covered: &[PrefixPick],
    strategy: FillStrategy,
    remaining: usize,
    rng: &mut R,
) -> Result<Vec<PrefixPick>, GenerationError> {
    let pool: Vec<PrefixPick> = match strategy {
        FillStrategy::HighestPriority => networks
            .iter()
            .find(|network| !network.prefixes.is_empty())
            .map(|network| {
                network
                    .prefixes
                    .iter()
                    .map(|prefix| PrefixPick::new(network.name.as_str(), prefix.as_str()))
                    .collect()
            })
            .unwrap_or_default(),
        FillStrategy::AllNetworks => covered.to_vec(),
    };

    (0..remaining)
        .map(|_| {
            pool.choose(rng).cloned().ok_or_else(|| {
                GenerationError::InvalidConfig("no prefixes available to fill from".to_string())
            })
        })
        .collect()
}

fn explicit_counts<R: Rng + ?Sized>(
    table: &NetworkTable,
    counts: &[NetworkCount],
    rng: &mut R,
) -> Result<Vec<PrefixPick>, GenerationError> {
    let capacity = counts
        .iter()
        .try_fold(0usize, |total, entry| total.checked_add(entry.count))
        .ok_or_else(|| {
            GenerationError::InvalidConfig("explicit counts overflow usize".to_string())
        })?;
    let mut picks = Vec::with_capacity(capacity);
    for entry in counts {
        let network = table.require(&entry.network)?;
        for _ in 0..entry.count {
            let prefix = network.prefixes.choose(rng).ok_or_else(|| {
                GenerationError::InvalidConfig(format!(
                    "network '{}' has no prefixes",
                    network.name
                ))
            })?;
            picks.push(PrefixPick::new(network.name.as_str(), prefix.as_str()));
        }
    }
    Ok(picks)
}

fn uniform_draws<R: Rng + ?Sized>(
    table: &NetworkTable,
    count: usize,
    rng: &mut R,
) -> Result<Vec<PrefixPick>, GenerationError> {
    let pool = table.flattened();
    (0..count)
        .map(|_| {
            pool.choose(rng)
                .map(|(network, prefix)| PrefixPick::new(*network, *prefix))
                .ok_or_else(|| {
                    GenerationError::InvalidConfig("network table has no prefixes".to_string())
                })
        })
        .collect()
}
