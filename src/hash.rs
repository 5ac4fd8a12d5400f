use fnv::FnvHasher;
use murmur3::murmur3_x64_128;
use std::hash::Hasher;
use std::io::Cursor;

/// A type alias for the seeded hash function behind a [`HashFamily`].
///
/// **Parameters:**
///
/// - `key: &[u8]`
///   - A byte slice representing the item to be hashed.
/// - `seed: u32`
///   - Index of the hash function within the family, `0..k`.
///
/// **Returns:**
///
/// - `u64`
///   - The raw hash, reduced modulo the bit array length by the family.
///
/// Implementations must be stable: the same `(key, seed)` has to hash to
/// the same value in every process, on every run. Hashers seeded from
/// per-process randomness (such as `std::collections::hash_map::RandomState`)
/// are not suitable.
pub type HashFunction = fn(&[u8], u32) -> u64;

/// MurmurHash3 x64/128 with an explicit seed, low 64 bits.
pub fn murmur3_seeded(key: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(key);
    // reads from an in-memory cursor cannot fail
    murmur3_x64_128(&mut cursor, seed).map_or(0, |h| h as u64)
}

/// FNV-1a over the little-endian seed followed by the key.
pub fn fnv1a_seeded(key: &[u8], seed: u32) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(&seed.to_le_bytes());
    hasher.write(key);
    hasher.finish()
}

pub fn default_hash_function(key: &[u8], seed: u32) -> u64 {
    murmur3_seeded(key, seed)
}

/// Maps a key to `k` bit indices by applying one seeded hash function with
/// seeds `0..k` and reducing each result modulo `m`.
#[derive(Debug, Clone, Copy)]
pub struct HashFamily {
    hash_function: HashFunction,
}

impl Default for HashFamily {
    fn default() -> Self {
        Self::new(default_hash_function)
    }
}

impl HashFamily {
    pub fn new(hash_function: HashFunction) -> Self {
        Self { hash_function }
    }

    /// Lazily yields the `k` indices of `key` in `[0, m)`.
    ///
    /// # Panics
    ///
    /// Panics if `m` is zero.
    pub fn indices<'a>(
        &self,
        key: &'a [u8],
        m: usize,
        k: usize,
    ) -> impl Iterator<Item = usize> + use<'a> {
        assert!(m > 0, "bit array length must be > 0");
        let hash = self.hash_function;
        let m = m as u64;
        (0..k).map(move |seed| (hash(key, seed as u32) % m) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_indices_in_range() {
        let family = HashFamily::default();
        for m in [1, 2, 7, 101, 9_586] {
            for key in ["a@x.com", "b@x.com", "", "some longer key value"] {
                let indices: Vec<usize> =
                    family.indices(key.as_bytes(), m, 23).collect();
                assert_eq!(indices.len(), 23);
                assert!(indices.iter().all(|&i| i < m), "m={m}, key={key}");
            }
        }
    }

    #[test]
    fn test_indices_are_deterministic() {
        for hash_function in [murmur3_seeded as HashFunction, fnv1a_seeded] {
            let family = HashFamily::new(hash_function);
            let first: Vec<usize> =
                family.indices(b"user@example.com", 143_776, 10).collect();
            let second: Vec<usize> =
                family.indices(b"user@example.com", 143_776, 10).collect();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_seeds_give_distinct_hashes() {
        for hash_function in [murmur3_seeded as HashFunction, fnv1a_seeded] {
            let hashes: HashSet<u64> =
                (0..32).map(|seed| hash_function(b"key", seed)).collect();
            assert_eq!(hashes.len(), 32);
        }
    }

    #[test]
    fn test_keys_give_distinct_hashes() {
        let a = murmur3_seeded(b"a@x.com", 0);
        let b = murmur3_seeded(b"b@x.com", 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_hashes_yields_nothing() {
        let family = HashFamily::default();
        assert_eq!(family.indices(b"key", 10, 0).count(), 0);
    }

    #[test]
    fn test_indices_spread_over_array() {
        // 7000 draws over 9586 buckets cover roughly half of them
        let family = HashFamily::default();
        let m = 9_586;
        let touched: HashSet<usize> = (0..1_000)
            .flat_map(|i| {
                family
                    .indices(format!("key_{i}").as_bytes(), m, 7)
                    .collect::<Vec<_>>()
            })
            .collect();
        assert!(
            touched.len() > m / 3,
            "only {} buckets touched",
            touched.len()
        );
    }
}
