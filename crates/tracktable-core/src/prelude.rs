//! Convenient re-exports for downstream crates.

pub use crate::config::TableConfig;
pub use crate::dataset::{Dataset, Mutation, TrackPatch};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::query::{Bound, FilterValue, Query, QueryResult, SortKey};
pub use crate::schema::{Field, FieldKind};
pub use crate::types::{Cell, Track};
