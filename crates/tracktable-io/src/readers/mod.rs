//! Readers for track files and request/config documents.

pub mod dataset;
pub mod request;

use std::path::Path;

/// Document syntax, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Json,
    Yaml,
    JsonLines,
}

impl DocFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocFormat::Yaml,
            Some("jsonl") | Some("ndjson") => DocFormat::JsonLines,
            _ => DocFormat::Json,
        }
    }
}
