#![forbid(unsafe_code)]
//! tracktable-io: reading datasets and requests, writing exports.
//!
//! - `readers::dataset`: JSON array or NDJSON track files → `Dataset`.
//! - `readers::request`: JSON/YAML request and config documents.
//! - `writers::csv`: the table's CSV export (header first, column exclusion,
//!   selected rows).
//! - `writers::jsonl`: one JSON object per track, for scripting.

pub mod error;
pub mod readers;
pub mod writers;

pub use error::{Error, Result};
