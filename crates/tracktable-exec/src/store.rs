//! Snapshot store.
//!
//! Holds the current [`Dataset`] and swaps it wholesale on mutation. Readers
//! clone the snapshot (an `Arc` bump) and query it without holding the lock,
//! so an in-flight query keeps seeing the snapshot it started with.

use std::sync::{PoisonError, RwLock};

use tracktable_core::dataset::{Dataset, Mutation};
use tracktable_core::error::Result;

#[derive(Debug)]
pub struct DatasetStore {
    current: RwLock<Dataset>,
}

impl DatasetStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            current: RwLock::new(dataset),
        }
    }

    pub fn snapshot(&self) -> Dataset {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply a mutation and publish the resulting snapshot.
    pub fn apply(&self, mutation: &Mutation) -> Result<Dataset> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = guard.apply(mutation)?;
        *guard = next.clone();
        tracing::debug!(
            track_id = mutation.track_id(),
            rows = next.len(),
            hash = %next.content_hash(),
            "snapshot swapped"
        );
        Ok(next)
    }

    pub fn replace(&self, dataset: Dataset) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = dataset;
    }
}
