//! Runtime: the query pipeline.
//!
//! `run_query` is filter → sort → paginate over the *whole* dataset. Sorting
//! and filtering never see just a page, and `total_count` is measured after
//! filtering and before pagination. No state is kept between calls.

use thiserror::Error;

use tracktable_core::query::{Query, QueryResult};
use tracktable_core::types::Track;
use tracktable_operators::{paginate, sort_rows, OpError, RowFilter};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("operator: {0}")]
    Operator(#[from] OpError),
}

/// A zero page size is rejected by the paginator as `OpError::InvalidArgument`.
pub fn run_query(tracks: &[Track], query: &Query) -> Result<QueryResult, ExecError> {
    let span = tracing::debug_span!(
        "run_query",
        page_index = query.page_index,
        page_size = query.page_size,
        sort_keys = query.sorting.len(),
        filters = query.filters.len(),
    );
    let _enter = span.enter();

    let filter = RowFilter::new(&query.filters, query.effective_search());
    let matched = filter.apply(tracks);
    let sorted = sort_rows(matched, &query.sorting);
    let page = paginate(&sorted, query.page_index, query.page_size)?;

    tracing::debug!(
        total = page.total_count,
        pages = page.page_count,
        returned = page.rows.len(),
        "query complete"
    );

    Ok(QueryResult {
        data: page.rows.iter().map(|t| (*t).clone()).collect(),
        page_count: page.page_count,
        total_count: page.total_count,
    })
}
