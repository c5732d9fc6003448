//! Track records and borrowed cell values.
//!
//! A [`Track`] is one row of the dataset. Columns are read through
//! [`Track::get`], which returns a [`Cell`] borrowing from the record so the
//! filter and sort paths never clone strings.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::Field;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub track_id: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub track_name: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub track_artist: String,
    pub track_popularity: i64,
    pub track_album_id: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub track_album_name: String,
    #[serde(default)]
    pub track_album_release_date: Option<String>,
    pub playlist_name: String,
    pub playlist_id: String,
    pub playlist_genre: String,
    pub playlist_subgenre: String,
    pub danceability: f64,
    pub energy: f64,
    pub key: i64,
    pub loudness: f64,
    pub mode: i64,
    // Audio features that arrive as numeric-looking text.
    #[serde(deserialize_with = "numeric_text")]
    pub speechiness: String,
    #[serde(deserialize_with = "numeric_text")]
    pub acousticness: String,
    #[serde(deserialize_with = "numeric_text")]
    pub instrumentalness: String,
    #[serde(deserialize_with = "numeric_text")]
    pub liveness: String,
    pub valence: f64,
    pub tempo: f64,
    pub duration_ms: i64,
}

impl Track {
    /// Read one column.
    pub fn get(&self, field: Field) -> Cell<'_> {
        use Field::*;
        match field {
            TrackId => Cell::Text(&self.track_id),
            TrackName => Cell::Text(&self.track_name),
            TrackArtist => Cell::Text(&self.track_artist),
            TrackPopularity => Cell::Num(self.track_popularity as f64),
            TrackAlbumId => Cell::Text(&self.track_album_id),
            TrackAlbumName => Cell::Text(&self.track_album_name),
            TrackAlbumReleaseDate => match &self.track_album_release_date {
                Some(date) => Cell::Text(date),
                None => Cell::Null,
            },
            PlaylistName => Cell::Text(&self.playlist_name),
            PlaylistId => Cell::Text(&self.playlist_id),
            PlaylistGenre => Cell::Text(&self.playlist_genre),
            PlaylistSubgenre => Cell::Text(&self.playlist_subgenre),
            Danceability => Cell::Num(self.danceability),
            Energy => Cell::Num(self.energy),
            Key => Cell::Num(self.key as f64),
            Loudness => Cell::Num(self.loudness),
            Mode => Cell::Num(self.mode as f64),
            Speechiness => Cell::Text(&self.speechiness),
            Acousticness => Cell::Text(&self.acousticness),
            Instrumentalness => Cell::Text(&self.instrumentalness),
            Liveness => Cell::Text(&self.liveness),
            Valence => Cell::Num(self.valence),
            Tempo => Cell::Num(self.tempo),
            DurationMs => Cell::Num(self.duration_ms as f64),
        }
    }
}

/// A borrowed column value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Null,
    Num(f64),
    Text(&'a str),
}

impl<'a> Cell<'a> {
    /// Numeric reading of the cell; text is parsed, anything unreadable is NaN.
    pub fn as_f64(&self) -> f64 {
        match self {
            Cell::Null => f64::NAN,
            Cell::Num(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        }
    }

    /// String form of the cell, as shown in the table and the CSV export.
    pub fn to_text(&self) -> Cow<'a, str> {
        match *self {
            Cell::Null => Cow::Borrowed(""),
            Cell::Num(n) => Cow::Owned(format_number(n)),
            Cell::Text(s) => Cow::Borrowed(s),
        }
    }
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Render a number the way the table shows it: integers without a fraction,
/// exponent form below 1e-6 and from 1e21 up (`1e-7`, `1e+21`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // Collapse -0 to 0.
        "0".to_string()
    } else if n.abs() < 1e-6 || n.abs() >= 1e21 {
        let s = format!("{:e}", n);
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        }
    } else {
        n.to_string()
    }
}

/// Native ordering of two cells: numbers numerically, text lexicographically.
///
/// NaN sorts after every number and Null before everything so the order stays
/// total. Mixed kinds order by kind.
pub fn cell_cmp(a: &Cell<'_>, b: &Cell<'_>) -> Ordering {
    match (a, b) {
        (Cell::Null, Cell::Null) => Ordering::Equal,
        (Cell::Num(x), Cell::Num(y)) => {
            if x.is_nan() && y.is_nan() {
                Ordering::Equal
            } else if x.is_nan() {
                Ordering::Greater
            } else if y.is_nan() {
                Ordering::Less
            } else {
                x.partial_cmp(y).unwrap_or(Ordering::Equal)
            }
        }
        (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
        _ => cell_kind_order(a).cmp(&cell_kind_order(b)),
    }
}

fn cell_kind_order(c: &Cell<'_>) -> u8 {
    match c {
        Cell::Null => 0,
        Cell::Num(_) => 1,
        Cell::Text(_) => 2,
    }
}

fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumericText {
    Num(serde_json::Number),
    Text(String),
}

fn numeric_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumericText::deserialize(deserializer)? {
        NumericText::Num(n) => n.to_string(),
        NumericText::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "track_id": "6f807x0ima9a1j3VPbc7VN",
        "track_name": "I Don't Care (with Justin Bieber) - Loud Luxury Remix",
        "track_artist": "Ed Sheeran",
        "track_popularity": 66,
        "track_album_id": "2oCs0DGTsRO98Gh5ZSl2Cx",
        "track_album_name": "I Don't Care (with Justin Bieber) [Loud Luxury Remix]",
        "track_album_release_date": "2019-06-14",
        "playlist_name": "Pop Remix",
        "playlist_id": "37i9dQZF1DXcZDD7cfEKhW",
        "playlist_genre": "pop",
        "playlist_subgenre": "dance pop",
        "danceability": 0.748,
        "energy": 0.916,
        "key": 6,
        "loudness": -2.634,
        "mode": 1,
        "speechiness": "0.0583",
        "acousticness": 0.102,
        "instrumentalness": "0",
        "liveness": "0.0653",
        "valence": 0.518,
        "tempo": 122.036,
        "duration_ms": 194754
    }"#;

    #[test]
    fn numeric_text_fields_accept_numbers_and_strings() {
        let track: Track = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(track.speechiness, "0.0583");
        assert_eq!(track.acousticness, "0.102");
        assert_eq!(track.get(Field::Acousticness).as_f64(), 0.102);
    }

    #[test]
    fn null_text_and_missing_dates_are_tolerated() {
        let json = SAMPLE
            .replace("\"Ed Sheeran\"", "null")
            .replace("\"track_album_release_date\": \"2019-06-14\",", "");
        let track: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(track.track_artist, "");
        assert_eq!(track.get(Field::TrackAlbumReleaseDate), Cell::Null);
    }

    #[test]
    fn numbers_render_without_trailing_fraction() {
        assert_eq!(Cell::Num(3.0).to_text(), "3");
        assert_eq!(Cell::Num(0.5).to_text(), "0.5");
        assert_eq!(Cell::Num(-2.634).to_text(), "-2.634");
        assert_eq!(Cell::Num(-0.0).to_text(), "0");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-2.5e-8), "-2.5e-8");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e300), "1.5e+300");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn cell_ordering_is_total() {
        assert_eq!(cell_cmp(&Cell::Num(1.0), &Cell::Num(2.0)), Ordering::Less);
        assert_eq!(cell_cmp(&Cell::Num(f64::NAN), &Cell::Num(2.0)), Ordering::Greater);
        assert_eq!(cell_cmp(&Cell::Text("b"), &Cell::Text("a")), Ordering::Greater);
        assert_eq!(cell_cmp(&Cell::Null, &Cell::Text("a")), Ordering::Less);
    }
}
