//! Simulated track service.
//!
//! Wraps the pure pipeline the way the table's data hook sees it: every call
//! waits out an artificial latency and may fail with [`ServiceError::Unavailable`].
//! `fetch_with_retry` retries only that transient failure, a bounded number of
//! times with a fixed delay. Query errors are returned immediately.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use tracktable_core::config::TableConfig;
use tracktable_core::dataset::{Dataset, Mutation, TrackPatch};
use tracktable_core::query::{Query, QueryResult};
use tracktable_core::schema::Field;
use tracktable_core::types::Track;

use crate::facets::FacetCache;
use crate::failpoints::FailureInjector;
use crate::runtime::{run_query, ExecError};
use crate::store::DatasetStore;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service unavailable")]
    Unavailable,
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error(transparent)]
    Core(#[from] tracktable_core::Error),
}

impl ServiceError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Unavailable)
    }
}

#[derive(Debug)]
pub struct TrackService {
    store: Arc<DatasetStore>,
    facets: FacetCache,
    injector: FailureInjector,
    latency: Duration,
    retry_attempts: usize,
    retry_delay: Duration,
}

impl TrackService {
    pub fn new(dataset: Dataset, config: &TableConfig) -> Self {
        Self::with_store(Arc::new(DatasetStore::new(dataset)), config)
    }

    pub fn with_store(store: Arc<DatasetStore>, config: &TableConfig) -> Self {
        Self {
            store,
            facets: FacetCache::new(),
            injector: FailureInjector::new(config.failure_rate, config.seed),
            latency: Duration::from_millis(config.latency_ms),
            retry_attempts: config.retry_attempts,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    async fn round_trip(&self, op: &'static str) -> Result<(), ServiceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.injector.should_fail() {
            tracing::warn!(op, "simulated service failure");
            return Err(ServiceError::Unavailable);
        }
        Ok(())
    }

    /// One attempt: latency, maybe a failure, then the query on the current snapshot.
    pub async fn fetch(&self, query: &Query) -> Result<QueryResult, ServiceError> {
        self.round_trip("fetch").await?;
        let snapshot = self.store.snapshot();
        Ok(run_query(snapshot.tracks(), query)?)
    }

    pub async fn fetch_with_retry(&self, query: &Query) -> Result<QueryResult, ServiceError> {
        let mut attempt = 0;
        loop {
            match self.fetch(query).await {
                Err(e) if e.is_transient() && attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::debug!(attempt, max = self.retry_attempts, "retrying fetch");
                    tokio::time::sleep(self.retry_delay).await;
                }
                other => return other,
            }
        }
    }

    /// Patch every row with `track_id` and return the first updated row.
    pub async fn update(&self, track_id: &str, patch: TrackPatch) -> Result<Track, ServiceError> {
        self.round_trip("update").await?;
        let next = self.store.apply(&Mutation::Update {
            track_id: track_id.to_string(),
            patch,
        })?;
        self.facets.retain_snapshot(next.content_hash());
        next.get(track_id)
            .cloned()
            .ok_or_else(|| tracktable_core::Error::NotFound(track_id.to_string()).into())
    }

    pub async fn delete(&self, track_id: &str) -> Result<(), ServiceError> {
        self.round_trip("delete").await?;
        let next = self.store.apply(&Mutation::Delete {
            track_id: track_id.to_string(),
        })?;
        self.facets.retain_snapshot(next.content_hash());
        Ok(())
    }

    /// Distinct values for a select filter, from the current snapshot.
    pub fn facet_options(&self, field: Field) -> Arc<[String]> {
        self.facets.options(&self.store.snapshot(), field)
    }
}
