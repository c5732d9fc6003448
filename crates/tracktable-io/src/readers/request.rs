//! Request and config documents (JSON or YAML).
//!
//! Example request:
//! ```yaml
//! pageIndex: 0
//! pageSize: 10
//! sorting:
//!   - { id: track_album_release_date, desc: false }
//! filters:
//!   playlist_genre: [pop, rap]
//!   duration_ms: [2, 4]
//! searchTerm: lov
//! ```

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use tracktable_core::config::TableConfig;
use tracktable_core::query::{Query, QueryRequest};

use super::DocFormat;
use crate::error::Result;

fn parse_doc<T: DeserializeOwned>(text: &str, format: DocFormat) -> Result<T> {
    Ok(match format {
        DocFormat::Yaml => serde_yaml::from_str(text)?,
        DocFormat::Json | DocFormat::JsonLines => serde_json::from_str(text)?,
    })
}

/// Parse a request in the table's wire shape without resolving it.
pub fn parse_request(text: &str, format: DocFormat) -> Result<QueryRequest> {
    parse_doc(text, format)
}

pub fn read_request<P: AsRef<Path>>(path: P) -> Result<QueryRequest> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    parse_request(&text, DocFormat::from_path(path))
}

/// Parse a wire request and resolve it into a typed query.
pub fn parse_query(text: &str, format: DocFormat) -> Result<Query> {
    Ok(parse_request(text, format)?.into_query()?)
}

pub fn read_query<P: AsRef<Path>>(path: P) -> Result<Query> {
    Ok(read_request(path)?.into_query()?)
}

/// Parse a config document on top of `base`. Keys the document leaves out
/// keep their value from `base`.
pub fn parse_config(text: &str, format: DocFormat, base: &TableConfig) -> Result<TableConfig> {
    if text.trim().is_empty() {
        base.validate()?;
        return Ok(base.clone());
    }
    let overlay: Value = parse_doc(text, format)?;
    let mut merged = serde_json::to_value(base)?;
    match (&mut merged, overlay) {
        (Value::Object(dst), Value::Object(src)) => dst.extend(src),
        (_, Value::Null) => {}
        (_, other) => {
            return Err(tracktable_core::Error::Config(format!(
                "config must be a mapping, got {other}"
            ))
            .into())
        }
    }
    let cfg: TableConfig = serde_json::from_value(merged)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn read_config<P: AsRef<Path>>(path: P, base: &TableConfig) -> Result<TableConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    parse_config(&text, DocFormat::from_path(path), base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tracktable_core::query::{Bound, FilterValue, SortKey};
    use tracktable_core::schema::Field;

    const YAML: &str = r#"
pageIndex: 1
pageSize: 10
sorting:
  - { id: track_album_release_date, desc: false }
  - { id: track_popularity, desc: true }
filters:
  playlist_genre: [pop, rap]
  duration_ms: [2, 4]
  track_name: null
searchTerm: lov
"#;

    #[test]
    fn yaml_requests_resolve() {
        let query = parse_query(YAML, DocFormat::Yaml).unwrap();
        assert_eq!(query.page_index, 1);
        assert_eq!(
            query.sorting,
            vec![
                SortKey::asc(Field::TrackAlbumReleaseDate),
                SortKey::desc(Field::TrackPopularity)
            ]
        );
        assert_eq!(
            query.filters.get(&Field::PlaylistGenre),
            Some(&FilterValue::one_of(["pop", "rap"]))
        );
        assert_eq!(
            query.filters.get(&Field::DurationMs),
            Some(&FilterValue::Range {
                min: Some(Bound::Number(2.0)),
                max: Some(Bound::Number(4.0)),
            })
        );
        assert!(!query.filters.contains_key(&Field::TrackName));
        assert_eq!(query.search_term.as_deref(), Some("lov"));
    }

    #[test]
    fn json_requests_use_defaults() {
        let query = parse_query("{}", DocFormat::Json).unwrap();
        assert_eq!(query.page_index, 0);
        assert_eq!(query.page_size, 25);
        assert!(query.sorting.is_empty());
    }

    #[test]
    fn unknown_columns_are_errors() {
        let err = parse_query(r#"{"filters": {"bpm": 120}}"#, DocFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            Error::Core(tracktable_core::Error::UnknownField(_))
        ));
    }

    #[test]
    fn config_documents_merge_over_base() {
        let base = TableConfig {
            retry_attempts: 5,
            ..TableConfig::default()
        };
        let cfg =
            parse_config("latency_ms: 0\nfailure_rate: 0.25\n", DocFormat::Yaml, &base).unwrap();
        assert_eq!(cfg.latency_ms, 0);
        assert_eq!(cfg.failure_rate, 0.25);
        assert_eq!(cfg.retry_attempts, 5);

        let same = parse_config("", DocFormat::Yaml, &base).unwrap();
        assert_eq!(same, base);
    }

    #[test]
    fn bad_config_documents_are_rejected() {
        let base = TableConfig::default();
        assert!(parse_config("failure_rate: 3\n", DocFormat::Yaml, &base).is_err());
        assert!(parse_config("[1, 2]", DocFormat::Json, &base).is_err());
    }
}
