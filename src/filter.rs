use crate::bits::{BitVector, Fill};
use crate::config::{FilterConfig, FilterConfigBuilder};
use crate::error::{BloomError, BloomResult};
use crate::hash::HashFamily;
use crate::params::{HashParameters, compute_size};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Answer of a membership query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// At least one bit is clear: the key was never inserted.
    Absent,
    /// Every bit is set: the key was probably inserted.
    PossiblyPresent,
}

impl Verdict {
    pub fn is_absent(self) -> bool {
        self == Verdict::Absent
    }
}

impl From<bool> for Verdict {
    fn from(may_contain: bool) -> Self {
        if may_contain {
            Verdict::PossiblyPresent
        } else {
            Verdict::Absent
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Absent => f.write_str("Not in the DB"),
            Verdict::PossiblyPresent => f.write_str("Probably in the DB"),
        }
    }
}

/// Renders the `<key>,<verdict>` line consumers of the guard expect.
pub fn format_verdict(key: &str, verdict: Verdict) -> String {
    format!("{key},{verdict}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    Empty,
    Populated,
}

/// Point-in-time view of a filter's occupancy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterStats {
    pub bit_count: usize,
    pub num_hashes: usize,
    pub insert_count: usize,
    pub set_bits: usize,
    pub fill_ratio: f64,
    /// `fill_ratio ^ k`, the chance that an absent key hits only set bits
    pub estimated_false_positive_rate: f64,
    pub memory_bytes: usize,
}

impl FilterStats {
    pub(crate) fn new(
        params: HashParameters,
        insert_count: usize,
        set_bits: usize,
        memory_bytes: usize,
    ) -> Self {
        let fill_ratio = set_bits as f64 / params.bit_vector_size as f64;
        Self {
            bit_count: params.bit_vector_size,
            num_hashes: params.num_hashes,
            insert_count,
            set_bits,
            fill_ratio,
            estimated_false_positive_rate: fill_ratio
                .powi(params.num_hashes as i32),
            memory_bytes,
        }
    }
}

/// Standard Bloom filter over an owned bit vector.
///
/// Keys are opaque byte strings. Once a key has been inserted,
/// [`Filter::may_contain`] reports it for the rest of the filter's life;
/// bits are never cleared.
pub struct Filter {
    config: FilterConfig,
    params: HashParameters,
    hashes: HashFamily,
    bits: BitVector,
    insert_count: usize,
}

impl Filter {
    pub fn new(config: FilterConfig) -> BloomResult<Self> {
        config.validate()?;

        let params = compute_size(config.capacity, config.false_positive_rate)?;
        let bits = BitVector::new(params.bit_vector_size, Fill::Cleared);

        debug!(
            capacity = config.capacity,
            false_positive_rate = config.false_positive_rate,
            bit_vector_size = params.bit_vector_size,
            num_hashes = params.num_hashes,
            "built bloom filter"
        );

        Ok(Self {
            hashes: HashFamily::new(config.hash_function),
            config,
            params,
            bits,
            insert_count: 0,
        })
    }

    /// Sizes a filter for `n` elements at false positive rate `p`.
    pub fn build(n: usize, p: f64) -> BloomResult<Self> {
        // size first so bad input reports InvalidParameter
        compute_size(n, p)?;
        let config = FilterConfigBuilder::default()
            .capacity(n)
            .false_positive_rate(p)
            .build()
            .map_err(|e| BloomError::InvalidConfig(e.to_string()))?;
        Self::new(config)
    }

    /// Sizes a filter for exactly the given keys and inserts all of them.
    pub fn from_keys<I, K>(keys: I, p: f64) -> BloomResult<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let keys: Vec<K> = keys.into_iter().collect();
        let mut filter = Self::build(keys.len(), p)?;
        filter.insert_all(&keys)?;
        Ok(filter)
    }

    pub fn insert(&mut self, key: &[u8]) -> BloomResult<()> {
        let (m, k) = (self.params.bit_vector_size, self.params.num_hashes);
        for index in self.hashes.indices(key, m, k) {
            self.bits.set(index)?;
        }
        self.insert_count += 1;
        Ok(())
    }

    /// `false` means the key is certainly absent; `true` means it is
    /// probably present.
    pub fn may_contain(&self, key: &[u8]) -> BloomResult<bool> {
        let (m, k) = (self.params.bit_vector_size, self.params.num_hashes);
        for index in self.hashes.indices(key, m, k) {
            if !self.bits.get(index)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn check(&self, key: &[u8]) -> BloomResult<Verdict> {
        self.may_contain(key).map(Verdict::from)
    }

    pub fn insert_all<K: AsRef<[u8]>>(
        &mut self,
        keys: &[K],
    ) -> BloomResult<()> {
        for key in keys {
            self.insert(key.as_ref())?;
        }
        debug!(count = keys.len(), total = self.insert_count, "inserted keys");
        Ok(())
    }

    pub fn check_all<K: AsRef<[u8]>>(
        &self,
        keys: &[K],
    ) -> BloomResult<Vec<Verdict>> {
        keys.iter().map(|key| self.check(key.as_ref())).collect()
    }

    pub fn state(&self) -> FilterState {
        if self.insert_count == 0 {
            FilterState::Empty
        } else {
            FilterState::Populated
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn params(&self) -> HashParameters {
        self.params
    }

    /// Number of insert calls, duplicates included.
    pub fn insert_count(&self) -> usize {
        self.insert_count
    }

    pub fn stats(&self) -> FilterStats {
        FilterStats::new(
            self.params,
            self.insert_count,
            self.bits.count_ones(),
            self.bits.memory_bytes(),
        )
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Filter {{ capacity: {}, false_positive_rate: {}, bit_vector_size: {}, num_hashes: {}, insert_count: {} }}",
            self.config.capacity,
            self.config.false_positive_rate,
            self.params.bit_vector_size,
            self.params.num_hashes,
            self.insert_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::fnv1a_seeded;

    #[test]
    fn test_build_uses_computed_params() {
        let filter = Filter::build(1_000, 0.01).unwrap();
        assert_eq!(
            filter.params(),
            HashParameters {
                bit_vector_size: 9_586,
                num_hashes: 7
            }
        );
        assert_eq!(filter.stats().set_bits, 0);
        assert_eq!(filter.stats().memory_bytes, 300 * 4);
    }

    #[test]
    fn test_build_rejects_invalid_parameters() {
        assert!(matches!(
            Filter::build(0, 0.01),
            Err(BloomError::InvalidParameter(_))
        ));
        assert!(matches!(
            Filter::build(10, 1.0),
            Err(BloomError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_state_transitions() {
        let mut filter = Filter::build(10, 0.01).unwrap();
        assert_eq!(filter.state(), FilterState::Empty);
        filter.insert(b"first").unwrap();
        assert_eq!(filter.state(), FilterState::Populated);
        filter.insert(b"second").unwrap();
        assert_eq!(filter.state(), FilterState::Populated);
    }

    #[test]
    fn test_empty_filter_contains_nothing() {
        let filter = Filter::build(100, 0.01).unwrap();
        for i in 0..100 {
            let key = format!("key_{i}");
            assert_eq!(filter.check(key.as_bytes()).unwrap(), Verdict::Absent);
        }
    }

    #[test]
    fn test_insert_sets_at_most_k_bits() {
        let mut filter = Filter::build(1_000, 0.01).unwrap();
        filter.insert(b"only").unwrap();
        let stats = filter.stats();
        assert!(stats.set_bits >= 1 && stats.set_bits <= 7);
    }

    #[test]
    fn test_custom_hash_function() {
        let config = FilterConfigBuilder::default()
            .capacity(500)
            .false_positive_rate(0.01)
            .hash_function(fnv1a_seeded)
            .build()
            .unwrap();
        let mut filter = Filter::new(config).unwrap();
        for i in 0..500 {
            filter.insert(format!("fnv_{i}").as_bytes()).unwrap();
        }
        for i in 0..500 {
            assert!(filter.may_contain(format!("fnv_{i}").as_bytes()).unwrap());
        }
    }

    #[test]
    fn test_verdict_text() {
        assert_eq!(
            format_verdict("a@x.com", Verdict::PossiblyPresent),
            "a@x.com,Probably in the DB"
        );
        assert_eq!(
            format_verdict("z@x.com", Verdict::Absent),
            "z@x.com,Not in the DB"
        );
    }

    #[test]
    fn test_stats_estimate_tracks_fill() {
        let mut filter = Filter::build(100, 0.01).unwrap();
        for i in 0..100 {
            filter.insert(format!("item_{i}").as_bytes()).unwrap();
        }
        let stats = filter.stats();
        assert_eq!(stats.insert_count, 100);
        // a filter filled to its capacity sits near half occupancy
        assert!(stats.fill_ratio > 0.3 && stats.fill_ratio < 0.7);
        assert!(stats.estimated_false_positive_rate < 0.05);
    }
}
