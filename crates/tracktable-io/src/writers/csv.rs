//! CSV export of table rows.
//!
//! The header row comes first, then one row per exported track. Columns follow
//! the field registry order minus the excluded ones. When a selection is given
//! only the selected tracks are written, otherwise every row passed in.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use tracktable_core::schema::Field;
use tracktable_core::types::Track;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub exclude: Vec<Field>,
    /// Selected `track_id`s. Empty means "no selection".
    pub selected: Vec<String>,
}

impl ExportOptions {
    pub fn columns(&self) -> Vec<Field> {
        export_columns(&self.exclude)
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    fn keeps(&self, track: &Track) -> bool {
        !self.has_selection() || self.selected.iter().any(|id| *id == track.track_id)
    }
}

pub fn export_columns(exclude: &[Field]) -> Vec<Field> {
    Field::ALL
        .iter()
        .copied()
        .filter(|f| !exclude.contains(f))
        .collect()
}

pub struct CsvWriter<W: Write> {
    writer: csv::Writer<W>,
    columns: Vec<Field>,
    header_written: bool,
}

impl CsvWriter<File> {
    pub fn to_path<P: AsRef<Path>>(path: P, columns: Vec<Field>) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f, columns))
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn to_writer(writer: W, columns: Vec<Field>) -> Self {
        let writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);
        Self {
            writer,
            columns,
            header_written: false,
        }
    }

    pub fn columns(&self) -> &[Field] {
        &self.columns
    }

    fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            self.writer
                .write_record(self.columns.iter().map(|f| f.name()))?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Write rows, emitting the header on the first call.
    pub fn write_tracks<'a, I>(&mut self, tracks: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Track>,
    {
        self.write_header()?;
        let mut n = 0;
        for track in tracks {
            let record: Vec<_> = self
                .columns
                .iter()
                .map(|f| track.get(*f).to_text())
                .collect();
            self.writer
                .write_record(record.iter().map(|c| c.as_bytes()))?;
            n += 1;
        }
        Ok(n)
    }

    /// Flush and hand back the inner writer. An export of zero rows still
    /// carries its header.
    pub fn finish(mut self) -> Result<W> {
        self.write_header()?;
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

/// Export `rows` to `writer` and return the number of data rows written.
pub fn export_csv<W: Write>(rows: &[Track], options: &ExportOptions, writer: W) -> Result<usize> {
    let mut out = CsvWriter::to_writer(writer, options.columns());
    let n = out.write_tracks(rows.iter().filter(|t| options.keeps(t)))?;
    out.finish()?;
    tracing::debug!(rows = n, selected = options.has_selection(), "csv export");
    Ok(n)
}
