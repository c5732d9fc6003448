//! Row filter: global search, then every column predicate.
//!
//! Search is a case-insensitive *prefix* match over `track_name`,
//! `track_artist` and `track_album_name` only. Column predicates are ANDed.

use std::collections::BTreeMap;

use tracktable_core::query::FilterValue;
use tracktable_core::schema::Field;
use tracktable_core::types::Track;

use crate::predicate::{build_predicate, Predicate};

/// Compiled search term plus column predicates.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    search: Option<String>,
    predicates: Vec<Predicate>,
}

impl RowFilter {
    pub fn new(filters: &BTreeMap<Field, FilterValue>, search_term: Option<&str>) -> Self {
        let search = search_term
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let predicates = filters
            .iter()
            .map(|(field, value)| build_predicate(*field, value))
            .filter(|p| !p.is_noop())
            .collect();

        Self { search, predicates }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.predicates.is_empty()
    }

    pub fn matches_search(&self, track: &Track) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        Field::SEARCHABLE
            .iter()
            .any(|f| track.get(*f).to_text().to_lowercase().starts_with(term.as_str()))
    }

    pub fn matches_filters(&self, track: &Track) -> bool {
        self.predicates.iter().all(|p| p.matches(track))
    }

    pub fn matches(&self, track: &Track) -> bool {
        self.matches_search(track) && self.matches_filters(track)
    }

    /// Apply to a full dataset, keeping input order.
    pub fn apply<'a>(&self, tracks: &'a [Track]) -> Vec<&'a Track> {
        if self.is_empty() {
            return tracks.iter().collect();
        }

        let searched: Vec<&Track> = tracks.iter().filter(|t| self.matches_search(t)).collect();
        tracing::trace!(rows = tracks.len(), matched = searched.len(), "search applied");

        let filtered: Vec<&Track> = searched
            .into_iter()
            .filter(|t| self.matches_filters(t))
            .collect();
        tracing::trace!(
            predicates = self.predicates.len(),
            matched = filtered.len(),
            "column filters applied"
        );

        filtered
    }
}

pub fn filter_rows<'a>(
    tracks: &'a [Track],
    filters: &BTreeMap<Field, FilterValue>,
    search_term: Option<&str>,
) -> Vec<&'a Track> {
    RowFilter::new(filters, search_term).apply(tracks)
}
