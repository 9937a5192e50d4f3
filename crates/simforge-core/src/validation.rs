use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::network::NetworkTable;
use crate::request::{Allocation, GenerationRequest, RecordKind};

/// Check a request against a table before any generation work starts.
///
/// This checks:
/// - every named network exists and is named once
/// - networks asked for records have a non-empty pool
/// - duplicates never exceed the unique count
/// - invalid numbers are only requested for number output
/// - record counts add up without overflowing
/// - the request produces at least one record
pub fn validate_request(table: &NetworkTable, request: &GenerationRequest) -> Result<()> {
    match &request.allocation {
        Allocation::Priority { unique, order, .. } => {
            if let Some(order) = order {
                let mut seen = BTreeSet::new();
                for name in order {
                    table.require(name)?;
                    if !seen.insert(name.as_str()) {
                        return Err(Error::InvalidConfig(format!(
                            "network '{name}' appears twice in the priority order"
                        )));
                    }
                }
            }
            if *unique > 0 {
                let names: Vec<&str> = match order {
                    Some(order) => order.iter().map(String::as_str).collect(),
                    None => table.names(),
                };
                let has_prefix = names.iter().any(|name| {
                    table
                        .get(name)
                        .is_some_and(|network| !network.prefixes.is_empty())
                });
                if !has_prefix {
                    return Err(Error::InvalidConfig(
                        "priority order has no prefixes to draw from".to_string(),
                    ));
                }
            }
        }
        Allocation::Explicit { networks } => {
            let mut seen = BTreeSet::new();
            for entry in networks {
                let network = table.require(&entry.network)?;
                if !seen.insert(entry.network.as_str()) {
                    return Err(Error::InvalidConfig(format!(
                        "network '{}' is listed twice",
                        entry.network
                    )));
                }
                if entry.count > 0 && network.prefixes.is_empty() {
                    return Err(Error::InvalidConfig(format!(
                        "network '{}' has no prefixes",
                        entry.network
                    )));
                }
            }
        }
        Allocation::Uniform { count } => {
            if *count > 0 && table.flattened().is_empty() {
                return Err(Error::InvalidConfig(
                    "network table has no prefixes".to_string(),
                ));
            }
        }
    }

    let unique = request.unique_count()?;
    if request.duplicates > unique {
        return Err(Error::InvalidConfig(format!(
            "duplicate count {} exceeds unique count {}",
            request.duplicates, unique
        )));
    }

    if request.invalids > 0 && request.record_kind == RecordKind::Contact {
        return Err(Error::InvalidConfig(
            "invalid numbers are only supported for number output".to_string(),
        ));
    }

    if request.total_count()? == 0 {
        return Err(Error::InvalidConfig(
            "request produces no records".to_string(),
        ));
    }

    Ok(())
}
