//! Reproducible Bloom filter for cache-penetration protection.
//!
//! Before asking a slow backing store for a key, ask the filter. A negative
//! answer proves the key is absent and the lookup can be skipped; a positive
//! answer means the key is probably present.
//!
//! HowTo:
//!    * Sizing: for `n` expected keys and a target false positive rate `p`,
//!      the bit array holds `m = ceil(-n ln p / (ln 2)^2)` bits and each key
//!      sets `k = round(m / n * ln 2)` of them.
//!    * Hashing: the `k` indices come from one stable hash function called
//!      with seeds `0..k`, each result reduced modulo `m`. The default is
//!      MurmurHash3, so results are identical across runs and processes.
//!
//! Insertion:
//!     * Set the `k` bits of the key.
//! Query:
//!     * If any of the `k` bits is clear the key was never inserted.
//!     * If all are set the key is probably present.
//!
//! Obvious problems:
//!     * No deletion: bits are never cleared, so removed keys keep answering
//!       "probably present".
//!     * Fixed size: inserting far more than `n` keys drives the false
//!       positive rate well above `p`.
//!
//! ```
//! use bloomguard::{Filter, Verdict};
//!
//! let mut filter = Filter::build(3, 1e-7).unwrap();
//! for email in ["a@x.com", "b@x.com", "c@x.com"] {
//!     filter.insert(email.as_bytes()).unwrap();
//! }
//! assert_eq!(filter.check(b"a@x.com").unwrap(), Verdict::PossiblyPresent);
//! ```

pub mod bits;
pub mod common;
mod concurrent;
mod config;
mod error;
mod filter;
mod hash;
pub mod ingest;
mod params;

pub use bits::{BitVector, Fill};
pub use concurrent::{AtomicBitVector, ConcurrentFilter};
#[cfg(feature = "cli")]
pub use config::GuardConfig;
pub use config::{
    DEFAULT_FALSE_POSITIVE_RATE, FilterConfig, FilterConfigBuilder,
    FilterConfigBuilderError,
};
pub use error::{BloomError, BloomResult};
pub use filter::{Filter, FilterState, FilterStats, Verdict, format_verdict};
pub use hash::{
    HashFamily, HashFunction, default_hash_function, fnv1a_seeded,
    murmur3_seeded,
};
pub use params::{
    HashParameters, compute_size, optimal_bit_vector_size, optimal_num_hashes,
};
