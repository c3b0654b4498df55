use crate::clock::Clock;
use crate::error::{Result, TopologyError};
use crate::store::constants::*;
use crate::store::sample::{PairKey, Sample};
use parking_lot::RwLock;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Retention and query bounds for a [`SampleStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub max_samples_per_pair: usize,
    pub retention: Duration,
    pub query_limit: usize,
    pub recent_per_pair: usize,
    pub recent_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_samples_per_pair: MAX_SAMPLES_PER_PAIR,
            retention: RETENTION_WINDOW,
            query_limit: QUERY_LIMIT,
            recent_per_pair: RECENT_PER_PAIR,
            recent_limit: RECENT_LIMIT,
        }
    }
}

impl StoreConfig {
    /// Validates the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_samples_per_pair == 0 {
            return Err(TopologyError::Config("max_samples_per_pair must be > 0".into()));
        }
        if self.retention.is_zero() {
            return Err(TopologyError::Config("retention must be > 0".into()));
        }
        if self.query_limit == 0 {
            return Err(TopologyError::Config("query_limit must be > 0".into()));
        }
        if self.recent_per_pair == 0 {
            return Err(TopologyError::Config("recent_per_pair must be > 0".into()));
        }
        if self.recent_limit == 0 {
            return Err(TopologyError::Config("recent_limit must be > 0".into()));
        }
        Ok(())
    }

    fn retention_ms(&self) -> i64 {
        i64::try_from(self.retention.as_millis()).unwrap_or(i64::MAX)
    }
}

/// In-memory latency history, partitioned by directed endpoint pair.
///
/// Every partition keeps insertion order and is bounded twice: by count
/// (`max_samples_per_pair`, oldest dropped first) and by age (`retention`
/// relative to the store's clock). Both bounds are enforced right after each
/// insert. Reads additionally hide anything that aged out since the last
/// insert on that pair, so callers never see expired samples.
///
/// A single `RwLock` guards the partition map; each operation holds it for
/// its whole duration, so no reader observes a partition mid-eviction.
pub struct SampleStore {
    config: StoreConfig,
    clock: Arc<dyn Clock>,
    partitions: RwLock<BTreeMap<PairKey, VecDeque<Sample>>>,
}

impl SampleStore {
    /// Create a store with the default bounds
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::build(clock, StoreConfig::default())
    }

    /// Create a store with custom bounds, rejecting any zero cap or window
    pub fn with_config(clock: Arc<dyn Clock>, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(clock, config))
    }

    fn build(clock: Arc<dyn Clock>, config: StoreConfig) -> Self {
        debug!(
            max_samples_per_pair = config.max_samples_per_pair,
            retention_secs = config.retention.as_secs(),
            "Creating sample store"
        );
        Self {
            config,
            clock,
            partitions: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Append a sample to its pair's partition, then evict by count and by age.
    pub fn insert(&self, sample: Sample) {
        let key = sample.pair();
        let cutoff = self.cutoff();

        let mut partitions = self.partitions.write();
        let partition = partitions.entry(key).or_default();
        partition.push_back(sample);

        let mut count_evicted = 0usize;
        while partition.len() > self.config.max_samples_per_pair {
            partition.pop_front();
            count_evicted += 1;
        }

        let age_evicted = Self::evict_expired(partition, cutoff);

        if count_evicted > 0 || age_evicted > 0 {
            debug!(
                count_evicted = count_evicted,
                age_evicted = age_evicted,
                remaining = partition.len(),
                "Evicted samples after insert"
            );
        }
    }

    /// Samples for `from -> to`, optionally bounded by inclusive timestamps.
    ///
    /// Returns at most `query_limit` samples in insertion order. When more
    /// match, the most recent ones are kept.
    pub fn query(
        &self,
        from: &str,
        to: &str,
        from_time: Option<i64>,
        to_time: Option<i64>,
    ) -> Vec<Sample> {
        let cutoff = self.cutoff();
        let key = PairKey::new(from, to);

        let partitions = self.partitions.read();
        let Some(partition) = partitions.get(&key) else {
            return Vec::new();
        };

        let mut matches: Vec<Sample> = partition
            .iter()
            .rev()
            .filter(|s| s.timestamp >= cutoff)
            .filter(|s| from_time.map_or(true, |t| s.timestamp >= t))
            .filter(|s| to_time.map_or(true, |t| s.timestamp <= t))
            .take(self.config.query_limit)
            .cloned()
            .collect();
        matches.reverse();

        debug!(pair = %key, returned = matches.len(), "Pair query answered");
        matches
    }

    /// The newest samples across every pair, newest first.
    ///
    /// Only the last `recent_per_pair` samples of each partition are
    /// considered. Partitions are visited in pair order and the sort is
    /// stable, so equal timestamps fall back to pair order, then insertion
    /// order.
    pub fn recent_across_all_pairs(&self, limit: usize) -> Vec<Sample> {
        let cutoff = self.cutoff();
        let per_pair = self.config.recent_per_pair;

        let partitions = self.partitions.read();
        let mut recent: Vec<Sample> = partitions
            .values()
            .flat_map(|partition| partition.iter().skip(partition.len().saturating_sub(per_pair)))
            .filter(|s| s.timestamp >= cutoff)
            .cloned()
            .collect();
        drop(partitions);

        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        recent
    }

    /// Age-evict every partition. Returns how many samples were removed.
    pub fn purge_expired(&self) -> usize {
        let cutoff = self.cutoff();
        let mut partitions = self.partitions.write();
        let removed: usize = partitions
            .values_mut()
            .map(|partition| Self::evict_expired(partition, cutoff))
            .sum();

        if removed > 0 {
            debug!(removed = removed, "Purged expired samples");
        }
        removed
    }

    /// Drop every partition
    pub fn clear(&self) {
        self.partitions.write().clear();
    }

    /// All pairs that have received at least one sample, in pair order
    pub fn pairs(&self) -> Vec<PairKey> {
        self.partitions.read().keys().cloned().collect()
    }

    /// Number of samples currently held for `from -> to`
    pub fn partition_len(&self, from: &str, to: &str) -> usize {
        self.partitions
            .read()
            .get(&PairKey::new(from, to))
            .map_or(0, VecDeque::len)
    }

    pub fn total_samples(&self) -> usize {
        self.partitions.read().values().map(VecDeque::len).sum()
    }

    fn cutoff(&self) -> i64 {
        self.clock.now_ms().saturating_sub(self.config.retention_ms())
    }

    // Assumes the front of the partition is its oldest sample.
    fn evict_expired(partition: &mut VecDeque<Sample>, cutoff: i64) -> usize {
        let mut evicted = 0;
        while partition.front().is_some_and(|s| s.timestamp < cutoff) {
            partition.pop_front();
            evicted += 1;
        }
        evicted
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::clock::ManualClock;
    use proptest::prelude::*;

    const NOW: i64 = 1_000_000_000;

    proptest! {
        #[test]
        fn test_count_bound_holds(inserts in prop::collection::vec((0usize..3, 0u32..1000), 0..300)) {
            let config = StoreConfig { max_samples_per_pair: 17, ..StoreConfig::default() };
            let store = SampleStore::with_config(Arc::new(ManualClock::new(NOW)), config)?;
            let ids = ["a", "b", "c"];

            for (i, (pair, rtt)) in inserts.iter().enumerate() {
                store.insert(Sample::new(ids[*pair], "x", NOW + i as i64, *rtt));
                for id in ids {
                    prop_assert!(store.partition_len(id, "x") <= 17);
                }
            }
        }

        #[test]
        fn test_age_bound_holds(offsets in prop::collection::vec(0i64..1_000, 1..100)) {
            let clock = Arc::new(ManualClock::new(NOW));
            let config = StoreConfig { retention: Duration::from_millis(5_000), ..StoreConfig::default() };
            let store = SampleStore::with_config(clock.clone(), config)?;

            for offset in offsets {
                let now = clock.advance(offset);
                store.insert(Sample::new("a", "b", now, 1));
                let cutoff = now - 5_000;
                prop_assert!(store.query("a", "b", None, None).iter().all(|s| s.timestamp >= cutoff));
                prop_assert_eq!(store.query("a", "b", None, None).len(), store.partition_len("a", "b"));
            }
        }

        #[test]
        fn test_bounded_query_is_ordered_suffix(
            count in 1usize..200,
            lo in 0i64..200,
            span in 0i64..200,
        ) {
            let config = StoreConfig { query_limit: 25, ..StoreConfig::default() };
            let store = SampleStore::with_config(Arc::new(ManualClock::new(NOW)), config)?;
            for i in 0..count {
                store.insert(Sample::new("a", "b", NOW + i as i64, i as u32));
            }

            let result = store.query("a", "b", Some(NOW + lo), Some(NOW + lo + span));
            let expected: Vec<u32> = (0..count as i64)
                .filter(|i| *i >= lo && *i <= lo + span)
                .map(|i| i as u32)
                .collect();
            let tail = &expected[expected.len().saturating_sub(25)..];

            let got: Vec<u32> = result.iter().map(|s| s.rtt_ms).collect();
            prop_assert_eq!(got.as_slice(), tail);
        }
    }
}
