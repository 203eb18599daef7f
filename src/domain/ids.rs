//! Identifier generation for tree nodes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a course, module or resource.
///
/// Issued by a single [`IdGenerator`], so an id is unique across all three
/// node kinds, not only within its own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(NodeId)
    }
}

/// How fresh identifiers are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// 1, 2, 3, ...
    #[default]
    Counter,
    /// Millisecond wall clock, bumped past the last issued value when two
    /// requests land in the same millisecond.
    Clock,
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Counter => write!(f, "counter"),
            IdStrategy::Clock => write!(f, "clock"),
        }
    }
}

/// Issues strictly increasing identifiers for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,
    last: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(IdStrategy::Counter)
    }
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self { strategy, last: 0 }
    }

    /// Returns an id greater than every id issued before.
    pub fn next_id(&mut self) -> NodeId {
        let candidate = match self.strategy {
            IdStrategy::Counter => self.last + 1,
            IdStrategy::Clock => {
                let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
                now.max(self.last + 1)
            }
        };
        self.last = candidate;
        NodeId(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn given_counter_strategy_when_issuing_then_ids_are_sequential() {
        let mut ids = IdGenerator::new(IdStrategy::Counter);
        assert_eq!(ids.next_id(), NodeId::new(1));
        assert_eq!(ids.next_id(), NodeId::new(2));
        assert_eq!(ids.next_id(), NodeId::new(3));
    }

    #[test]
    fn given_clock_strategy_when_issuing_in_a_burst_then_ids_stay_distinct_and_increasing() {
        let mut ids = IdGenerator::new(IdStrategy::Clock);
        let issued: Vec<NodeId> = (0..500).map(|_| ids.next_id()).collect();

        let unique: HashSet<_> = issued.iter().collect();
        assert_eq!(unique.len(), issued.len());
        assert!(issued.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn given_text_when_parsing_node_id_then_accepts_surrounding_whitespace() {
        assert_eq!(" 42 ".parse::<NodeId>().unwrap(), NodeId::new(42));
        assert!("abc".parse::<NodeId>().is_err());
    }
}
