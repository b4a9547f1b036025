//! Allocation and collection types shared across Astrelis crates.
//!
//! - Re-exports of hash collections using AHash
//! - [`SparseSet`](sparse_set::SparseSet), a generational slot arena

pub mod sparse_set;

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("key", "value");
        assert_eq!(map.get("key"), Some(&"value"));
    }
}
