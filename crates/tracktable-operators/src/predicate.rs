//! Predicate builder: one column + one filter value → a row test.
//!
//! Dispatch order for a [`FilterValue`]:
//! 1. `Range` on `duration_ms` with numeric bounds: bounds are minutes.
//! 2. `Range` elsewhere: bounds and cell go through the normalizer. A cell
//!    that does not normalize never matches; if no bound normalizes the
//!    filter is ignored; a single bad bound leaves that side open.
//! 3. `MultiSelect`: the cell's string form equals one of the choices.
//! 4. `Substring`: case-insensitive containment in the cell's string form.
//! 5. `ExactNumber`: the cell read as a number equals the value; blank text
//!    reads as 0.

use tracktable_core::query::{Bound, FilterValue};
use tracktable_core::schema::Field;
use tracktable_core::types::{Cell, Track};

use crate::normalize::{bound_to_millis, to_epoch_millis};

const MILLIS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, PartialEq)]
enum Test {
    Always,
    Exact(f64),
    Contains(String),
    OneOf(Vec<String>),
    Minutes { min: f64, max: f64 },
    Millis { min: f64, max: f64 },
}

/// A compiled filter for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    field: Field,
    test: Test,
}

impl Predicate {
    pub fn field(&self) -> Field {
        self.field
    }

    /// True when the filter was ignored and every row passes.
    pub fn is_noop(&self) -> bool {
        self.test == Test::Always
    }

    pub fn matches(&self, track: &Track) -> bool {
        let cell = track.get(self.field);
        match &self.test {
            Test::Always => true,
            Test::Exact(n) => exact_number(cell) == *n,
            Test::Contains(needle) => cell.to_text().to_lowercase().contains(needle.as_str()),
            Test::OneOf(choices) => {
                let text = cell.to_text();
                choices.iter().any(|c| c.as_str() == text)
            }
            Test::Minutes { min, max } => {
                let minutes = cell.as_f64() / MILLIS_PER_MINUTE;
                *min <= minutes && minutes <= *max
            }
            Test::Millis { min, max } => {
                let at = to_epoch_millis(cell);
                !at.is_nan() && *min <= at && at <= *max
            }
        }
    }
}

pub fn build_predicate(field: Field, value: &FilterValue) -> Predicate {
    let test = match value {
        FilterValue::Range { min, max }
            if field == Field::DurationMs && numeric_bounds(min, max) =>
        {
            Test::Minutes {
                min: number_or(min, f64::NEG_INFINITY),
                max: number_or(max, f64::INFINITY),
            }
        }
        FilterValue::Range { min, max } => {
            let lo = min.as_ref().map(bound_to_millis).unwrap_or(f64::NAN);
            let hi = max.as_ref().map(bound_to_millis).unwrap_or(f64::NAN);
            if lo.is_nan() && hi.is_nan() {
                Test::Always
            } else {
                Test::Millis {
                    min: if lo.is_nan() { f64::NEG_INFINITY } else { lo },
                    max: if hi.is_nan() { f64::INFINITY } else { hi },
                }
            }
        }
        FilterValue::MultiSelect(choices) => {
            Test::OneOf(choices.iter().map(|c| c.to_text()).collect())
        }
        FilterValue::Substring(s) if s.is_empty() => Test::Always,
        FilterValue::Substring(s) => Test::Contains(s.to_lowercase()),
        FilterValue::ExactNumber(n) => Test::Exact(*n),
    };

    Predicate { field, test }
}

/// Numeric reading for exact matches: blank text counts as zero.
fn exact_number(cell: Cell<'_>) -> f64 {
    match cell {
        Cell::Text(s) if s.trim().is_empty() => 0.0,
        other => other.as_f64(),
    }
}

fn numeric_bounds(min: &Option<Bound>, max: &Option<Bound>) -> bool {
    [min, max]
        .iter()
        .all(|b| matches!(b, None | Some(Bound::Number(_))))
}

fn number_or(bound: &Option<Bound>, default: f64) -> f64 {
    match bound {
        Some(Bound::Number(n)) if !n.is_nan() => *n,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracktable_core::query::Choice;

    fn track() -> Track {
        Track {
            track_id: "t1".into(),
            track_name: "Love Story".into(),
            track_artist: "Taylor Swift".into(),
            track_popularity: 71,
            track_album_id: "al1".into(),
            track_album_name: "Fearless".into(),
            track_album_release_date: Some("2008-11-11".into()),
            playlist_name: "Country Hits".into(),
            playlist_id: "pl1".into(),
            playlist_genre: "pop".into(),
            playlist_subgenre: "post-teen pop".into(),
            danceability: 0.617,
            energy: 0.741,
            key: 2,
            loudness: -3.9,
            mode: 1,
            speechiness: "0.0305".into(),
            acousticness: "0.131".into(),
            instrumentalness: "0".into(),
            liveness: "0.0789".into(),
            valence: 0.307,
            tempo: 118.984,
            duration_ms: 180_000,
        }
    }

    fn check(field: Field, value: FilterValue) -> bool {
        build_predicate(field, &value).matches(&track())
    }

    #[test]
    fn duration_bounds_are_minutes() {
        assert!(check(Field::DurationMs, FilterValue::number_range(2.0, 4.0)));
        assert!(!check(Field::DurationMs, FilterValue::number_range(0.0, 1.0)));
        assert!(check(Field::DurationMs, FilterValue::number_range(3.0, 3.0)));
    }

    #[test]
    fn duration_missing_bound_is_open() {
        let at_least_two = FilterValue::range(Some(Bound::Number(2.0)), None);
        let at_most_two = FilterValue::range(None, Some(Bound::Number(2.0)));
        assert!(check(Field::DurationMs, at_least_two));
        assert!(!check(Field::DurationMs, at_most_two));
    }

    #[test]
    fn date_range_includes_bounds() {
        assert!(check(
            Field::TrackAlbumReleaseDate,
            FilterValue::date_range("2008-01-01", "2008-12-31")
        ));
        assert!(check(
            Field::TrackAlbumReleaseDate,
            FilterValue::date_range("2008-11-11", "2008-11-11")
        ));
        assert!(!check(
            Field::TrackAlbumReleaseDate,
            FilterValue::date_range("2009-01-01", "2010-01-01")
        ));
    }

    #[test]
    fn both_bad_bounds_fail_open() {
        let p = build_predicate(Field::Danceability, &FilterValue::date_range("junk", "junk"));
        assert!(p.is_noop());
        assert!(p.matches(&track()));
    }

    #[test]
    fn one_bad_bound_is_unbounded() {
        assert!(check(
            Field::TrackAlbumReleaseDate,
            FilterValue::date_range("junk", "2010-01-01")
        ));
        assert!(!check(
            Field::TrackAlbumReleaseDate,
            FilterValue::date_range("2009-01-01", "junk")
        ));
    }

    #[test]
    fn rows_that_do_not_normalize_fail_closed() {
        let mut t = track();
        t.track_album_release_date = None;
        let p = build_predicate(
            Field::TrackAlbumReleaseDate,
            &FilterValue::date_range("1900-01-01", "2100-01-01"),
        );
        assert!(!p.matches(&t));

        t.track_album_release_date = Some("someday".into());
        assert!(!p.matches(&t));
    }

    #[test]
    fn numeric_ranges_on_other_fields_use_scaled_values() {
        assert!(check(Field::Danceability, FilterValue::number_range(0.5, 0.7)));
        assert!(!check(Field::Danceability, FilterValue::number_range(0.7, 0.9)));
        assert!(check(Field::Loudness, FilterValue::number_range(-5.0, -3.0)));
        assert!(check(Field::Acousticness, FilterValue::number_range(0.1, 0.2)));
    }

    #[test]
    fn multi_select_compares_string_forms() {
        assert!(check(Field::PlaylistGenre, FilterValue::one_of(["rap", "pop"])));
        assert!(!check(Field::PlaylistGenre, FilterValue::one_of(["rock"])));
        assert!(!check(Field::PlaylistGenre, FilterValue::one_of(["Pop"])));
        assert!(check(
            Field::Key,
            FilterValue::MultiSelect(vec![Choice::Number(2.0), Choice::Text("7".into())])
        ));
        assert!(check(
            Field::Instrumentalness,
            FilterValue::MultiSelect(vec![Choice::Number(0.0)])
        ));
    }

    #[test]
    fn substring_is_case_insensitive_containment() {
        assert!(check(Field::TrackName, FilterValue::Substring("STORY".into())));
        assert!(check(Field::TrackArtist, FilterValue::Substring("swift".into())));
        assert!(!check(Field::TrackName, FilterValue::Substring("hate".into())));
        assert!(check(Field::Tempo, FilterValue::Substring("118.9".into())));
    }

    #[test]
    fn exact_number_reads_the_cell_as_a_number() {
        assert!(check(Field::Key, FilterValue::ExactNumber(2.0)));
        assert!(!check(Field::Key, FilterValue::ExactNumber(3.0)));
        assert!(check(Field::Instrumentalness, FilterValue::ExactNumber(0.0)));
        assert!(!check(Field::TrackName, FilterValue::ExactNumber(0.0)));
    }

    #[test]
    fn exact_number_treats_blank_text_as_zero() {
        let mut t = track();
        t.track_artist = String::new();
        t.instrumentalness = "  ".into();
        let zero = FilterValue::ExactNumber(0.0);
        assert!(build_predicate(Field::TrackArtist, &zero).matches(&t));
        assert!(build_predicate(Field::Instrumentalness, &zero).matches(&t));
        let one = FilterValue::ExactNumber(1.0);
        assert!(!build_predicate(Field::Instrumentalness, &one).matches(&t));

        t.instrumentalness = " 0 ".into();
        assert!(build_predicate(Field::Instrumentalness, &zero).matches(&t));

        // Missing values are not numbers.
        t.track_album_release_date = None;
        assert!(!build_predicate(Field::TrackAlbumReleaseDate, &zero).matches(&t));
    }
}
