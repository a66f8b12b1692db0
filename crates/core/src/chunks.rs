//! Result chunk addressing.
//!
//! An upload's result linkage is split into a fixed number of chunks decided at write
//! time and recorded in the upload metadata. A result lives in the chunk selected by
//! [`result_chunk_index`]. The hash is part of the stored layout: changing it makes
//! every previously written upload unreadable.

use crate::config::StoreConfig;

/// `h = h * 31 + c` over the Unicode scalars of `id` with 64-bit wrapping arithmetic,
/// reduced modulo `num_chunks`.
pub fn result_chunk_index(id: &str, num_chunks: u32) -> u32 {
    (hash_key(id) % u64::from(num_chunks.max(1))) as u32
}

fn hash_key(id: &str) -> u64 {
    let mut hash: i64 = 0;
    for c in id.chars() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(i64::from(u32::from(c)));
    }
    hash.unsigned_abs()
}

/// Number of chunks for an upload with `num_results` results.
pub fn num_result_chunks(num_results: usize, config: &StoreConfig) -> u32 {
    let per_chunk = config.results_per_result_chunk.max(1);
    let max = config.max_result_chunks.max(1);
    (num_results / per_chunk).clamp(1, max as usize) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_pinned() {
        assert_eq!(hash_key(""), 0);
        assert_eq!(hash_key("a"), 97);
        assert_eq!(hash_key("ab"), 3105);
        assert_eq!(hash_key("abc"), 96354);
        assert_eq!(result_chunk_index("ab", 1000), 105);
        assert_eq!(result_chunk_index("abc", 7), (96354 % 7) as u32);
    }

    #[test]
    fn test_index_in_bounds() {
        for n in 1..50 {
            for i in 0..200 {
                let id = format!("result:{i}");
                assert!(result_chunk_index(&id, n) < n);
            }
        }
        assert_eq!(result_chunk_index("anything", 0), 0);
    }

    #[test]
    fn test_long_ids_wrap_without_panicking() {
        let id = "x".repeat(10_000);
        let first = result_chunk_index(&id, 31);
        assert_eq!(first, result_chunk_index(&id, 31));
    }

    #[test]
    fn test_num_result_chunks() {
        let config = StoreConfig {
            results_per_result_chunk: 10,
            max_result_chunks: 4,
            ..StoreConfig::default()
        };
        assert_eq!(num_result_chunks(0, &config), 1);
        assert_eq!(num_result_chunks(9, &config), 1);
        assert_eq!(num_result_chunks(25, &config), 2);
        assert_eq!(num_result_chunks(10_000, &config), 4);
    }
}
