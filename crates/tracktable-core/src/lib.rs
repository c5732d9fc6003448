#![forbid(unsafe_code)]
//! tracktable-core: track records, the typed field registry, query values,
//! immutable dataset snapshots, configuration, and content hashing.
//!
//! Pure data only. No I/O, no async, no logging; those live in `tracktable-io`
//! and `tracktable-exec`.

pub mod config;
pub mod dataset;
pub mod error;
pub mod hash;
pub mod prelude;
pub mod query;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
