//! Track file readers.
//!
//! Accepts a JSON array of track objects (the shape of the bundled songs file)
//! or NDJSON with one track per line. Blank NDJSON lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracktable_core::dataset::Dataset;
use tracktable_core::types::Track;

use super::DocFormat;
use crate::error::{Error, Result};

pub fn read_json_array<R: Read>(reader: R) -> Result<Vec<Track>> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn read_json_lines<R: Read>(reader: R) -> Result<Vec<Track>> {
    let mut tracks = Vec::new();
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let track = serde_json::from_str(&line).map_err(|source| Error::Line {
            line: idx + 1,
            source,
        })?;
        tracks.push(track);
    }
    Ok(tracks)
}

/// Load a track file into a snapshot, picking the syntax from the extension.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let tracks = match DocFormat::from_path(path) {
        DocFormat::JsonLines => read_json_lines(file)?,
        DocFormat::Json | DocFormat::Yaml => read_json_array(BufReader::new(file))?,
    };
    let dataset = Dataset::new(tracks)?;
    tracing::debug!(
        path = %path.display(),
        rows = dataset.len(),
        hash = %dataset.content_hash(),
        "dataset loaded"
    );
    Ok(dataset)
}
