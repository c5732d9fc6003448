//! Paginator: slice a filtered, sorted run into one page.

use crate::error::OpError;

/// One page plus the counts needed to render pagination controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub rows: &'a [T],
    pub page_count: usize,
    pub total_count: usize,
}

/// `[page_index * page_size, page_index * page_size + page_size)`, clamped.
///
/// A page past the end is empty, not an error. `page_size == 0` is rejected.
pub fn paginate<T>(
    rows: &[T],
    page_index: usize,
    page_size: usize,
) -> Result<Page<'_, T>, OpError> {
    if page_size == 0 {
        return Err(OpError::InvalidArgument("page size must be > 0".into()));
    }

    let total_count = rows.len();
    let start = page_index.saturating_mul(page_size).min(total_count);
    let end = start.saturating_add(page_size).min(total_count);

    Ok(Page {
        rows: &rows[start..end],
        page_count: total_count.div_ceil(page_size),
        total_count,
    })
}
