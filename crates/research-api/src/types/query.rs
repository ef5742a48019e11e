//! Query request types

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Query complexity tier, selects depth and simulated latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
pub enum Tier {
    /// Shallow analysis (`max_number = 3`)
    Three,
    /// Deep analysis (`max_number = 6`)
    Six,
}

impl Tier {
    /// Wire value of the tier
    pub fn as_number(self) -> u8 {
        match self {
            Tier::Three => 3,
            Tier::Six => 6,
        }
    }

    /// Simulated latency window in whole seconds
    pub fn latency_window(self) -> RangeInclusive<u64> {
        match self {
            Tier::Three => 120..=240, // 2-4 minutes
            Tier::Six => 180..=360,   // 3-6 minutes
        }
    }
}

impl TryFrom<i64> for Tier {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            3 => Ok(Tier::Three),
            6 => Ok(Tier::Six),
            _ => Err(Error::validation("max_number must be 3 or 6")),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.as_number()
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

/// Research query as received on the wire
///
/// `max_number` is kept as a raw integer so that out-of-range values reach
/// validation instead of failing JSON extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's natural-language question
    pub query: String,
    /// Requested tier, only 3 and 6 are accepted
    pub max_number: i64,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(query: impl Into<String>, max_number: i64) -> Self {
        Self {
            query: query.into(),
            max_number,
        }
    }

    /// Check the request and resolve its tier
    pub fn validate(&self) -> Result<Tier> {
        let tier = Tier::try_from(self.max_number)?;
        if self.query.trim().is_empty() {
            return Err(Error::validation("query must not be empty"));
        }
        Ok(tier)
    }
}
