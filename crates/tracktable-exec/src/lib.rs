#![forbid(unsafe_code)]
//! tracktable-exec: the query pipeline and everything that owns state around it.
//!
//! - `runtime`: `run_query`, the pure filter → sort → paginate pipeline.
//! - `store`: atomically swapped dataset snapshots.
//! - `facets`: option lists memoized per snapshot content hash.
//! - `state`: table query state with page resets.
//! - `service` (feature `service`): async wrapper that simulates network
//!   latency and transient failures, with bounded retries.

pub mod facets;
#[cfg(feature = "service")]
pub mod failpoints;
pub mod runtime;
#[cfg(feature = "service")]
pub mod service;
pub mod state;
pub mod store;

pub use facets::FacetCache;
pub use runtime::{run_query, ExecError};
#[cfg(feature = "service")]
pub use service::{ServiceError, TrackService};
pub use state::QueryState;
pub use store::DatasetStore;
