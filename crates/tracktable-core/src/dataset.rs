//! Immutable dataset snapshots.
//!
//! Rows live behind an `Arc<[Track]>`; cloning a [`Dataset`] is cheap and a
//! query never observes a partially mutated collection. Mutations are pure:
//! [`Dataset::apply`] returns a new snapshot and leaves `self` untouched. The
//! owner swaps its reference to publish the change.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::{hash_tracks, Hash256};
use crate::schema::Field;
use crate::types::Track;

macro_rules! track_patch {
    ($($field:ident: $ty:ty),* $(,)?) => {
        /// Partial update of a track. `None` leaves the column unchanged.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct TrackPatch {
            $(pub $field: Option<$ty>,)*
        }

        impl TrackPatch {
            pub fn apply_to(&self, track: &mut Track) {
                $(
                    if let Some(v) = &self.$field {
                        track.$field = v.clone().into();
                    }
                )*
            }

            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }
    };
}

track_patch! {
    track_name: String,
    track_artist: String,
    track_popularity: i64,
    track_album_id: String,
    track_album_name: String,
    track_album_release_date: String,
    playlist_name: String,
    playlist_id: String,
    playlist_genre: String,
    playlist_subgenre: String,
    danceability: f64,
    energy: f64,
    key: i64,
    loudness: f64,
    mode: i64,
    speechiness: String,
    acousticness: String,
    instrumentalness: String,
    liveness: String,
    valence: f64,
    tempo: f64,
    duration_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    Update { track_id: String, patch: TrackPatch },
    Delete { track_id: String },
}

impl Mutation {
    pub fn track_id(&self) -> &str {
        match self {
            Mutation::Update { track_id, .. } | Mutation::Delete { track_id } => track_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    tracks: Arc<[Track]>,
    content_hash: Hash256,
}

impl Dataset {
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        let content_hash = hash_tracks(&tracks)?;
        Ok(Self {
            tracks: tracks.into(),
            content_hash,
        })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn content_hash(&self) -> Hash256 {
        self.content_hash
    }

    /// First row with the given id.
    pub fn get(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.track_id == track_id)
    }

    /// Produce the snapshot that results from applying `mutation`.
    ///
    /// Playlist exports repeat a track once per playlist, so every row sharing
    /// the id is affected. An id with no rows is `NotFound`.
    pub fn apply(&self, mutation: &Mutation) -> Result<Dataset> {
        let id = mutation.track_id();
        if !self.tracks.iter().any(|t| t.track_id == id) {
            return Err(Error::NotFound(id.to_string()));
        }

        let tracks: Vec<Track> = match mutation {
            Mutation::Update { patch, .. } => self
                .tracks
                .iter()
                .map(|t| {
                    let mut t = t.clone();
                    if t.track_id == id {
                        patch.apply_to(&mut t);
                    }
                    t
                })
                .collect(),
            Mutation::Delete { .. } => self
                .tracks
                .iter()
                .filter(|t| t.track_id != id)
                .cloned()
                .collect(),
        };

        Dataset::new(tracks)
    }

    /// Sorted distinct non-empty values of one column.
    pub fn distinct_values(&self, field: Field) -> Vec<String> {
        self.tracks
            .iter()
            .map(|t| t.get(field).to_text().into_owned())
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
