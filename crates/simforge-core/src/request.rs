use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Desired count for one network in explicit-count mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCount {
    pub network: String,
    pub count: usize,
}

impl NetworkCount {
    pub fn new(network: impl Into<String>, count: usize) -> Self {
        Self {
            network: network.into(),
            count,
        }
    }
}

/// Parses `NAME=COUNT`, splitting on the last `=`.
impl FromStr for NetworkCount {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (network, count) = value.rsplit_once('=').ok_or_else(|| {
            Error::InvalidConfig(format!("expected NETWORK=COUNT, got '{value}'"))
        })?;
        let network = network.trim();
        if network.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "missing network name in '{value}'"
            )));
        }
        let count = count.trim().parse::<usize>().map_err(|err| {
            Error::InvalidConfig(format!("invalid count in '{value}': {err}"))
        })?;
        Ok(Self::new(network, count))
    }
}

/// Pool used by priority allocation once every prefix is covered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStrategy {
    /// Draw from the first network in priority order with a non-empty pool.
    #[default]
    HighestPriority,
    /// Draw from every (network, prefix) pair covered so far.
    AllNetworks,
}

/// How unique records are distributed across networks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Allocation {
    /// Total count walked over networks in priority order.
    Priority {
        unique: usize,
        /// Network names in priority order; table order when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order: Option<Vec<String>>,
        #[serde(default)]
        fill: FillStrategy,
    },
    /// Exact count per network, in caller order.
    Explicit { networks: Vec<NetworkCount> },
    /// Independent draws over the flattened prefix list of every network.
    Uniform { count: usize },
}

impl Allocation {
    /// Unique records requested; fails when the per-network counts
    /// overflow `usize`.
    pub fn unique_count(&self) -> Result<usize, Error> {
        match self {
            Allocation::Priority { unique, .. } => Ok(*unique),
            Allocation::Explicit { networks } => networks
                .iter()
                .try_fold(0usize, |total, entry| total.checked_add(entry.count))
                .ok_or_else(|| count_overflow("unique")),
            Allocation::Uniform { count } => Ok(*count),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Allocation::Priority { .. } => "priority",
            Allocation::Explicit { .. } => "explicit",
            Allocation::Uniform { .. } => "uniform",
        }
    }
}

/// Output record layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Number,
    Contact,
}

/// Leading digits written before the carrier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// Country code `63`, twelve characters in total.
    International,
    /// Trunk `0`, eleven characters in total.
    Trunk,
}

impl NumberFormat {
    /// Random digits following the prefix.
    pub const SUBSCRIBER_DIGITS: usize = 7;

    pub fn lead(self) -> &'static str {
        match self {
            NumberFormat::International => "63",
            NumberFormat::Trunk => "0",
        }
    }

    /// Length of a well-formed number in this format.
    pub fn width(self) -> usize {
        self.lead().len() + crate::network::PREFIX_LEN + Self::SUBSCRIBER_DIGITS
    }

    pub fn default_for(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Number => NumberFormat::International,
            RecordKind::Contact => NumberFormat::Trunk,
        }
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberFormat::International => f.write_str("international"),
            NumberFormat::Trunk => f.write_str("trunk"),
        }
    }
}

/// Everything needed to build one output sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub allocation: Allocation,
    /// Copies of the first uniques appended after the unique segment.
    #[serde(default)]
    pub duplicates: usize,
    /// Malformed numbers appended last.
    #[serde(default)]
    pub invalids: usize,
    /// Draw the invalid segment without repeats.
    #[serde(default)]
    pub unique_invalids: bool,
    #[serde(default)]
    pub record_kind: RecordKind,
    /// Defaults to international for numbers and trunk for contacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<NumberFormat>,
}

impl GenerationRequest {
    pub fn new(allocation: Allocation) -> Self {
        Self {
            allocation,
            duplicates: 0,
            invalids: 0,
            unique_invalids: false,
            record_kind: RecordKind::Number,
            number_format: None,
        }
    }

    pub fn priority(unique: usize, duplicates: usize) -> Self {
        Self::new(Allocation::Priority {
            unique,
            order: None,
            fill: FillStrategy::default(),
        })
        .with_duplicates(duplicates)
    }

    pub fn explicit(networks: Vec<NetworkCount>, duplicates: usize) -> Self {
        Self::new(Allocation::Explicit { networks }).with_duplicates(duplicates)
    }

    pub fn uniform(count: usize) -> Self {
        Self::new(Allocation::Uniform { count })
    }

    /// Invalid numbers only, drawn without repeats.
    pub fn invalid_only(count: usize) -> Self {
        let mut request = Self::uniform(0).with_invalids(count);
        request.unique_invalids = true;
        request
    }

    pub fn with_duplicates(mut self, duplicates: usize) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_invalids(mut self, invalids: usize) -> Self {
        self.invalids = invalids;
        self
    }

    pub fn with_record_kind(mut self, kind: RecordKind) -> Self {
        self.record_kind = kind;
        self
    }

    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = Some(format);
        self
    }

    pub fn unique_count(&self) -> Result<usize, Error> {
        self.allocation.unique_count()
    }

    /// Uniques, duplicates and invalids together.
    pub fn total_count(&self) -> Result<usize, Error> {
        self.unique_count()?
            .checked_add(self.duplicates)
            .and_then(|total| total.checked_add(self.invalids))
            .ok_or_else(|| count_overflow("total"))
    }

    pub fn number_format(&self) -> NumberFormat {
        self.number_format
            .unwrap_or_else(|| NumberFormat::default_for(self.record_kind))
    }
}

fn count_overflow(what: &str) -> Error {
    Error::InvalidConfig(format!("{what} record count does not fit in usize"))
}
