//! Error cache implementation
//!
//! Holds one prediction error E_k = f(x_k) - y_k per training example together
//! with a validity flag. An entry becomes valid the first time its example is
//! visited, and only valid entries take part in the second-choice heuristic.

/// Single cached error
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct CacheEntry {
    valid: bool,
    error: f64,
}

/// Per-example error cache used by the SMO pair selection
#[derive(Debug, Clone)]
pub struct ErrorCache {
    entries: Vec<CacheEntry>,
}

impl ErrorCache {
    /// Create a cache for `n` examples with every entry invalid
    pub fn new(n: usize) -> Self {
        Self {
            entries: vec![CacheEntry::default(); n],
        }
    }

    /// Store an error for example `k` and mark it valid
    pub fn set(&mut self, k: usize, error: f64) {
        self.entries[k] = CacheEntry { valid: true, error };
    }

    /// Cached error for example `k`, if the entry is valid
    pub fn get(&self, k: usize) -> Option<f64> {
        let entry = self.entries[k];
        entry.valid.then_some(entry.error)
    }

    /// Indices of valid entries in ascending order
    pub fn valid_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(k, entry)| entry.valid.then_some(k))
            .collect()
    }

    pub fn n_valid(&self) -> usize {
        self.entries.iter().filter(|entry| entry.valid).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
