//! Deterministic track fixtures shared by the integration tests.
#![allow(dead_code)]

use std::path::PathBuf;

use tracktable_core::dataset::Dataset;
use tracktable_core::types::Track;

pub const GENRES: [&str; 6] = ["pop", "rap", "rock", "latin", "r&b", "edm"];

const WORDS: [&str; 10] = [
    "Love", "Night", "Fire", "Dream", "Summer", "Lonely", "Golden", "Wild", "Blue", "Echo",
];

/// Row `i` of the synthetic table. Release dates are distinct and not in
/// index order, so sorting by date does real work.
pub fn track(i: usize) -> Track {
    let slot = (i * 7) % 30 + (i / 30) * 30;
    Track {
        track_id: format!("t{:03}", i),
        track_name: format!("{} Song {}", WORDS[i % WORDS.len()], i),
        track_artist: format!("Artist {}", i % 5),
        track_popularity: ((i * 37) % 100) as i64,
        track_album_id: format!("al{:02}", i % 8),
        track_album_name: format!("{} Album", WORDS[(i + 3) % WORDS.len()]),
        track_album_release_date: Some(format!(
            "{}-{:02}-15",
            1990 + slot,
            slot % 12 + 1
        )),
        playlist_name: format!("{} Mix", GENRES[i % GENRES.len()]),
        playlist_id: format!("pl{}", i % GENRES.len()),
        playlist_genre: GENRES[i % GENRES.len()].to_string(),
        playlist_subgenre: format!("{} sub", GENRES[i % GENRES.len()]),
        danceability: (i % 10) as f64 / 10.0,
        energy: ((i * 3) % 10) as f64 / 10.0,
        key: (i % 12) as i64,
        loudness: -((i % 20) as f64),
        mode: (i % 2) as i64,
        speechiness: format!("0.{:02}", (i * 11) % 100),
        acousticness: format!("0.{}", i % 10),
        instrumentalness: "0".to_string(),
        liveness: format!("0.{:03}", (i * 13) % 1000),
        valence: ((i * 7) % 10) as f64 / 10.0,
        tempo: 90.0 + (i % 60) as f64,
        // 2:00 up to 6:00, one minute steps
        duration_ms: (120_000 + (i % 5) * 60_000) as i64,
    }
}

pub fn tracks(n: usize) -> Vec<Track> {
    (0..n).map(track).collect()
}

pub fn dataset(n: usize) -> Dataset {
    Dataset::new(tracks(n)).expect("fixture dataset hashes")
}

pub fn ids(rows: &[Track]) -> Vec<&str> {
    rows.iter().map(|t| t.track_id.as_str()).collect()
}

/// Write `rows` as a JSON array into `dir` and return the file path.
pub fn write_json_array(dir: &tempfile::TempDir, name: &str, rows: &[Track]) -> PathBuf {
    let path = dir.path().join(name);
    let file = std::fs::File::create(&path).expect("create fixture file");
    serde_json::to_writer(file, rows).expect("write fixture file");
    path
}
