//! Typed field registry for the track table.
//!
//! Every column a request may name is a [`Field`]. Each field carries its wire
//! name and the comparison kind used when filters or sorts are applied to it.
//! Names are resolved once, at the request boundary; an unknown name is an
//! error rather than a silently empty column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How a column's values compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Small closed vocabularies and identifiers (genre, playlist id).
    Categorical,
    /// Free text (track name, artist, album).
    Text,
    /// Numbers, including the audio features stored as numeric-looking text.
    Numeric,
    /// Calendar dates, year-only or full ISO.
    Date,
}

impl FieldKind {
    /// Kinds whose values have a meaningful order for range filters.
    pub fn is_ordinal(self) -> bool {
        matches!(self, FieldKind::Numeric | FieldKind::Date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TrackId,
    TrackName,
    TrackArtist,
    TrackPopularity,
    TrackAlbumId,
    TrackAlbumName,
    TrackAlbumReleaseDate,
    PlaylistName,
    PlaylistId,
    PlaylistGenre,
    PlaylistSubgenre,
    Danceability,
    Energy,
    Key,
    Loudness,
    Mode,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
    Tempo,
    DurationMs,
}

impl Field {
    /// All fields in record (and export) order.
    pub const ALL: [Field; 23] = [
        Field::TrackId,
        Field::TrackName,
        Field::TrackArtist,
        Field::TrackPopularity,
        Field::TrackAlbumId,
        Field::TrackAlbumName,
        Field::TrackAlbumReleaseDate,
        Field::PlaylistName,
        Field::PlaylistId,
        Field::PlaylistGenre,
        Field::PlaylistSubgenre,
        Field::Danceability,
        Field::Energy,
        Field::Key,
        Field::Loudness,
        Field::Mode,
        Field::Speechiness,
        Field::Acousticness,
        Field::Instrumentalness,
        Field::Liveness,
        Field::Valence,
        Field::Tempo,
        Field::DurationMs,
    ];

    /// Columns the global search box looks at.
    pub const SEARCHABLE: [Field; 3] =
        [Field::TrackName, Field::TrackArtist, Field::TrackAlbumName];

    pub fn name(self) -> &'static str {
        match self {
            Field::TrackId => "track_id",
            Field::TrackName => "track_name",
            Field::TrackArtist => "track_artist",
            Field::TrackPopularity => "track_popularity",
            Field::TrackAlbumId => "track_album_id",
            Field::TrackAlbumName => "track_album_name",
            Field::TrackAlbumReleaseDate => "track_album_release_date",
            Field::PlaylistName => "playlist_name",
            Field::PlaylistId => "playlist_id",
            Field::PlaylistGenre => "playlist_genre",
            Field::PlaylistSubgenre => "playlist_subgenre",
            Field::Danceability => "danceability",
            Field::Energy => "energy",
            Field::Key => "key",
            Field::Loudness => "loudness",
            Field::Mode => "mode",
            Field::Speechiness => "speechiness",
            Field::Acousticness => "acousticness",
            Field::Instrumentalness => "instrumentalness",
            Field::Liveness => "liveness",
            Field::Valence => "valence",
            Field::Tempo => "tempo",
            Field::DurationMs => "duration_ms",
        }
    }

    pub fn kind(self) -> FieldKind {
        use Field::*;
        match self {
            TrackId | TrackAlbumId | PlaylistName | PlaylistId | PlaylistGenre
            | PlaylistSubgenre => FieldKind::Categorical,
            TrackName | TrackArtist | TrackAlbumName => FieldKind::Text,
            TrackAlbumReleaseDate => FieldKind::Date,
            TrackPopularity | Danceability | Energy | Key | Loudness | Mode | Speechiness
            | Acousticness | Instrumentalness | Liveness | Valence | Tempo | DurationMs => {
                FieldKind::Numeric
            }
        }
    }

    /// Resolve a wire name, rejecting anything outside the registry.
    pub fn from_name(name: &str) -> Result<Self> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name() == name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Field::from_name(s.trim())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
