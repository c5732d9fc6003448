//! Row sorter: ordered multi-key comparison, stable.
//!
//! Keys are evaluated in order; the first key whose values differ decides,
//! `descending` flips it, and rows equal on every key keep their input order.
//! Numeric columns stored as text (the audio features) are compared as
//! numbers so "0.5" sorts above "0.05".

use std::cmp::Ordering;

use tracktable_core::query::SortKey;
use tracktable_core::schema::{Field, FieldKind};
use tracktable_core::types::{cell_cmp, Cell, Track};

fn sort_cell(track: &Track, field: Field) -> Cell<'_> {
    let cell = track.get(field);
    match (field.kind(), cell) {
        (FieldKind::Numeric, Cell::Text(_)) => Cell::Num(cell.as_f64()),
        _ => cell,
    }
}

pub fn compare_rows(a: &Track, b: &Track, sorting: &[SortKey]) -> Ordering {
    for key in sorting {
        let ord = cell_cmp(&sort_cell(a, key.field), &sort_cell(b, key.field));
        if ord != Ordering::Equal {
            return if key.descending { ord.reverse() } else { ord };
        }
    }
    Ordering::Equal
}

/// Return the rows in sorted order. Empty `sorting` is the identity.
pub fn sort_rows<'a>(mut rows: Vec<&'a Track>, sorting: &[SortKey]) -> Vec<&'a Track> {
    if sorting.is_empty() {
        return rows;
    }
    // `sort_by` is stable.
    rows.sort_by(|a, b| compare_rows(a, b, sorting));
    rows
}
