//! Table query state.
//!
//! Mirrors what the table UI tracks between requests. Changing filters or the
//! search term resets the page index to 0 because the old index no longer
//! refers to the same rows.

use tracktable_core::query::{FilterValue, Query, SortKey};
use tracktable_core::schema::Field;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    query: Query,
}

impl QueryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: Query::new(0, page_size),
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn set_page(&mut self, page_index: usize) {
        self.query.page_index = page_index;
    }

    /// Changing the page size starts again from the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.query.page_size = page_size;
        self.query.page_index = 0;
    }

    pub fn set_sorting(&mut self, sorting: Vec<SortKey>) {
        self.query.sorting = sorting;
    }

    /// Multi-sort header click: unsorted → ascending → descending → unsorted.
    /// A newly sorted column is appended after the existing keys.
    pub fn toggle_sort(&mut self, field: Field) {
        let sorting = &mut self.query.sorting;
        match sorting.iter().position(|k| k.field == field) {
            None => sorting.push(SortKey::asc(field)),
            Some(i) if !sorting[i].descending => sorting[i].descending = true,
            Some(i) => {
                sorting.remove(i);
            }
        }
    }

    /// Set or clear (`None`) one column filter.
    pub fn set_filter(&mut self, field: Field, value: Option<FilterValue>) {
        match value {
            Some(v) => {
                self.query.filters.insert(field, v);
            }
            None => {
                self.query.filters.remove(&field);
            }
        }
        self.query.page_index = 0;
    }

    pub fn clear_filters(&mut self) {
        self.query.filters.clear();
        self.query.page_index = 0;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.query.search_term = if term.is_empty() { None } else { Some(term) };
        self.query.page_index = 0;
    }
}
