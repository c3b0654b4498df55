use serde::{Deserialize, Serialize};
use std::fmt;

/// One round-trip-time observation for a directed endpoint pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub from_id: String,
    pub to_id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub rtt_ms: u32,
}

impl Sample {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>, timestamp: i64, rtt_ms: u32) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            timestamp,
            rtt_ms,
        }
    }

    /// The partition this sample belongs to
    pub fn pair(&self) -> PairKey {
        PairKey::new(&self.from_id, &self.to_id)
    }
}

/// Directed pair of endpoint ids. `(a, b)` and `(b, a)` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    pub from: String,
    pub to: String,
}

impl PairKey {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.to.clone(), self.from.clone())
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
