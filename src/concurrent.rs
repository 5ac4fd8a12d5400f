//! Bloom filter that can be shared between threads.
//!
//! Words are `AtomicU32`. Insertion sets bits with `fetch_or` and
//! `Release` ordering, so concurrent writers touching the same word never
//! lose each other's bits. Queries load with `Acquire` and need no lock:
//! bits are only ever set, so a query racing an insert sees either the old
//! or the new word and can at worst miss a bit that has not landed yet.
use crate::bits::WORD_BITS;
use crate::config::FilterConfig;
use crate::error::{BloomError, BloomResult};
use crate::filter::{FilterStats, Verdict};
use crate::hash::HashFamily;
use crate::params::{HashParameters, compute_size};
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use tracing::debug;

/// Fixed-size bit array with lock-free set/get through `&self`.
pub struct AtomicBitVector {
    words: Box<[AtomicU32]>,
    len: usize,
}

impl AtomicBitVector {
    pub fn new(bit_count: usize) -> Self {
        let words = (0..bit_count.div_ceil(WORD_BITS))
            .map(|_| AtomicU32::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            words,
            len: bit_count,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> BloomResult<bool> {
        let (word, mask) = self.locate(index)?;
        Ok(self.words[word].load(Ordering::Acquire) & mask != 0)
    }

    pub fn set(&self, index: usize) -> BloomResult<()> {
        let (word, mask) = self.locate(index)?;
        self.words[word].fetch_or(mask, Ordering::Release);
        Ok(())
    }

    pub fn count_ones(&self) -> usize {
        let full_words = self.len / WORD_BITS;
        let tail = self.len % WORD_BITS;
        let mut ones: usize = self.words[..full_words]
            .iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
            .sum();
        if tail > 0 {
            let mask = (1u32 << tail) - 1;
            ones += (self.words[full_words].load(Ordering::Relaxed) & mask)
                .count_ones() as usize;
        }
        ones
    }

    pub fn memory_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<AtomicU32>()
    }

    fn locate(&self, index: usize) -> BloomResult<(usize, u32)> {
        if index >= self.len {
            return Err(BloomError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok((index / WORD_BITS, 1u32 << (index % WORD_BITS)))
    }
}

/// Shared-access counterpart of [`crate::Filter`].
///
/// Wrap it in an `Arc` and call [`ConcurrentFilter::insert`] and
/// [`ConcurrentFilter::may_contain`] from any thread.
pub struct ConcurrentFilter {
    config: FilterConfig,
    params: HashParameters,
    hashes: HashFamily,
    bits: AtomicBitVector,
    insert_count: AtomicUsize,
}

impl ConcurrentFilter {
    pub fn new(config: FilterConfig) -> BloomResult<Self> {
        config.validate()?;

        let params = compute_size(config.capacity, config.false_positive_rate)?;

        debug!(
            capacity = config.capacity,
            false_positive_rate = config.false_positive_rate,
            bit_vector_size = params.bit_vector_size,
            num_hashes = params.num_hashes,
            "built concurrent bloom filter"
        );

        Ok(Self {
            hashes: HashFamily::new(config.hash_function),
            bits: AtomicBitVector::new(params.bit_vector_size),
            config,
            params,
            insert_count: AtomicUsize::new(0),
        })
    }

    pub fn insert(&self, key: &[u8]) -> BloomResult<()> {
        let (m, k) = (self.params.bit_vector_size, self.params.num_hashes);
        for index in self.hashes.indices(key, m, k) {
            self.bits.set(index)?;
        }
        self.insert_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

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

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn params(&self) -> HashParameters {
        self.params
    }

    pub fn insert_count(&self) -> usize {
        self.insert_count.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> FilterStats {
        FilterStats::new(
            self.params,
            self.insert_count(),
            self.bits.count_ones(),
            self.bits.memory_bytes(),
        )
    }
}

impl fmt::Debug for ConcurrentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConcurrentFilter {{ capacity: {}, false_positive_rate: {}, bit_vector_size: {}, num_hashes: {}, insert_count: {} }}",
            self.config.capacity,
            self.config.false_positive_rate,
            self.params.bit_vector_size,
            self.params.num_hashes,
            self.insert_count()
        )
    }
}
