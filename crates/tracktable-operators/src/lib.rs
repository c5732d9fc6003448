#![forbid(unsafe_code)]
//! tracktable-operators: the pieces of the query pipeline.
//!
//! Design intent:
//! - Pure and synchronous. Every function here is a transform over borrowed
//!   rows; nothing holds state between calls.
//! - Leaf first: `normalize` feeds `predicate`, which feeds `filter`; `sort`
//!   and `paginate` are independent of both.

pub mod error;
pub mod filter;
pub mod normalize;
pub mod paginate;
pub mod predicate;
pub mod sort;

pub use error::OpError;
pub use filter::{filter_rows, RowFilter};
pub use normalize::to_epoch_millis;
pub use paginate::{paginate, Page};
pub use predicate::{build_predicate, Predicate};
pub use sort::{compare_rows, sort_rows};
