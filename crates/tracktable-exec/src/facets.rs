//! Facet option lists (distinct values per column), memoized per snapshot.
//!
//! Entries are keyed by the snapshot's content hash, so a mutation that
//! changes rows naturally misses the cache and an identical snapshot hits it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracktable_core::dataset::Dataset;
use tracktable_core::hash::Hash256;
use tracktable_core::schema::Field;

#[derive(Debug, Default)]
pub struct FacetCache {
    entries: Mutex<HashMap<(Hash256, Field), Arc<[String]>>>,
}

impl FacetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted distinct values of `field` in `dataset`.
    pub fn options(&self, dataset: &Dataset, field: Field) -> Arc<[String]> {
        let key = (dataset.content_hash(), field);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = entries.get(&key) {
            return Arc::clone(hit);
        }

        let values: Arc<[String]> = dataset.distinct_values(field).into();
        tracing::trace!(field = %field, values = values.len(), "facet computed");
        entries.insert(key, Arc::clone(&values));
        values
    }

    /// Genre options for the genre select.
    pub fn genres(&self, dataset: &Dataset) -> Arc<[String]> {
        self.options(dataset, Field::PlaylistGenre)
    }

    /// Drop entries belonging to any snapshot other than `keep`.
    pub fn retain_snapshot(&self, keep: Hash256) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(hash, _), _| *hash == keep);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
