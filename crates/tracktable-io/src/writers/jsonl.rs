//! Streaming NDJSON writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};

use tracktable_core::schema::Field;
use tracktable_core::types::{Cell, Track};

use crate::error::Result;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    // projection; `None` writes whole tracks
    columns: Option<Vec<Field>>,
}

impl JsonlWriter<File> {
    pub fn to_path<P: AsRef<Path>>(path: P, columns: Option<Vec<Field>>) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f, columns))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W, columns: Option<Vec<Field>>) -> Self {
        Self {
            writer: BufWriter::new(writer),
            columns,
        }
    }

    /// Write one JSON object per track.
    pub fn write_tracks<'a, I>(&mut self, tracks: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Track>,
    {
        let mut n = 0;
        for track in tracks {
            let line = match &self.columns {
                None => serde_json::to_string(track)?,
                Some(cols) => serde_json::to_string(&project(track, cols))?,
            };
            writeln!(self.writer, "{}", line)?;
            n += 1;
        }
        self.writer.flush()?;
        Ok(n)
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

fn project(track: &Track, columns: &[Field]) -> Map<String, Value> {
    let mut obj = Map::new();
    for field in columns {
        obj.insert(field.name().to_string(), cell_to_json(track.get(*field)));
    }
    obj
}

fn cell_to_json(cell: Cell<'_>) -> Value {
    match cell {
        Cell::Null => Value::Null,
        // non-finite numbers have no JSON form
        Cell::Num(n) => serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number),
        Cell::Text(s) => Value::String(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Track {
        Track {
            track_id: "t1".into(),
            track_name: "Song".into(),
            track_popularity: 7,
            ..Track::default()
        }
    }

    #[test]
    fn projected_lines_hold_only_those_columns() {
        let mut w = JsonlWriter::to_writer(
            Vec::new(),
            Some(vec![Field::TrackName, Field::TrackId, Field::TrackAlbumReleaseDate]),
        );
        assert_eq!(w.write_tracks([&sample(), &sample()]).unwrap(), 2);
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let v: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(v.as_object().unwrap().len(), 3);
        assert_eq!(v["track_name"], "Song");
        assert_eq!(v["track_id"], "t1");
        assert!(v["track_album_release_date"].is_null());
    }

    #[test]
    fn whole_tracks_read_back() {
        let mut w = JsonlWriter::to_writer(Vec::new(), None);
        w.write_tracks([&sample()]).unwrap();
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        let back: Track = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(back, sample());
    }
}
