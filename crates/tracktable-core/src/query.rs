//! Query values.
//!
//! [`QueryRequest`] is the loosely-typed wire shape the table sends
//! (`pageIndex`, `pageSize`, `sorting`, `filters`, `searchTerm`). It is turned
//! into a typed [`Query`] exactly once, by [`QueryRequest::into_query`]: field
//! names are resolved against the registry and every filter value is classified
//! into a [`FilterValue`] variant. Values that carry no constraint (null, empty
//! arrays, empty strings, booleans, unknown shapes) are dropped there.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::schema::Field;
use crate::types::{format_number, Track};

pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: Field,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: Field) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn desc(field: Field) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

/// One end of a range filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    Number(f64),
    /// Date-like text, normalized when the predicate is built.
    Text(String),
}

/// One accepted value of a multi-select filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Choice {
    Text(String),
    Number(f64),
}

impl Choice {
    /// String form used for membership tests.
    pub fn to_text(&self) -> String {
        match self {
            Choice::Text(s) => s.clone(),
            Choice::Number(n) => format_number(*n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    ExactNumber(f64),
    Substring(String),
    MultiSelect(Vec<Choice>),
    Range {
        min: Option<Bound>,
        max: Option<Bound>,
    },
}

impl FilterValue {
    pub fn range(min: Option<Bound>, max: Option<Bound>) -> Self {
        FilterValue::Range { min, max }
    }

    pub fn number_range(min: f64, max: f64) -> Self {
        FilterValue::Range {
            min: Some(Bound::Number(min)),
            max: Some(Bound::Number(max)),
        }
    }

    pub fn date_range(min: impl Into<String>, max: impl Into<String>) -> Self {
        FilterValue::Range {
            min: Some(Bound::Text(min.into())),
            max: Some(Bound::Text(max.into())),
        }
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::MultiSelect(values.into_iter().map(|s| Choice::Text(s.into())).collect())
    }

    /// Classify a raw wire value for `field`. `None` means "no constraint".
    ///
    /// A two-element array is a range when the field is ordinal or when both
    /// elements are numbers (or null); any other array is a multi-select.
    pub fn from_wire(field: Field, raw: &Value) -> Option<Self> {
        match raw {
            Value::Null | Value::Bool(_) => None,
            Value::Number(n) => n.as_f64().map(FilterValue::ExactNumber),
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(FilterValue::Substring(s.clone())),
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) if items.len() == 2 && is_range_pair(field, items) => {
                Some(FilterValue::Range {
                    min: wire_bound(&items[0]),
                    max: wire_bound(&items[1]),
                })
            }
            Value::Array(items) => {
                let choices: Vec<Choice> = items
                    .iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(Choice::Text(s.clone())),
                        Value::Number(n) => n.as_f64().map(Choice::Number),
                        _ => None,
                    })
                    .collect();
                if choices.is_empty() {
                    None
                } else {
                    Some(FilterValue::MultiSelect(choices))
                }
            }
            Value::Object(map) if map.contains_key("min") || map.contains_key("max") => {
                Some(FilterValue::Range {
                    min: map.get("min").and_then(wire_bound),
                    max: map.get("max").and_then(wire_bound),
                })
            }
            Value::Object(_) => None,
        }
    }
}

fn is_range_pair(field: Field, items: &[Value]) -> bool {
    field.kind().is_ordinal()
        || items
            .iter()
            .all(|v| matches!(v, Value::Number(_) | Value::Null))
}

fn wire_bound(v: &Value) -> Option<Bound> {
    match v {
        Value::Number(n) => n.as_f64().map(Bound::Number),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(Bound::Text(s.clone())),
        _ => None,
    }
}

/// A typed table query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub page_index: usize,
    pub page_size: usize,
    pub sorting: Vec<SortKey>,
    pub filters: BTreeMap<Field, FilterValue>,
    pub search_term: Option<String>,
}

impl Default for Query {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

impl Query {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size,
            sorting: Vec::new(),
            filters: BTreeMap::new(),
            search_term: None,
        }
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sorting.push(key);
        self
    }

    pub fn filter(mut self, field: Field, value: FilterValue) -> Self {
        self.filters.insert(field, value);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// The search term, trimmed, if it is not blank.
    pub fn effective_search(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Sort entry in the wire shape (`{ "id": "...", "desc": true }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    pub id: String,
    #[serde(default)]
    pub desc: bool,
}

/// Loosely-typed request as sent by the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub page_index: i64,
    #[serde(default = "default_wire_page_size")]
    pub page_size: i64,
    #[serde(default)]
    pub sorting: Vec<SortRequest>,
    #[serde(default)]
    pub filters: BTreeMap<String, Value>,
    #[serde(default)]
    pub search_term: Option<String>,
}

fn default_wire_page_size() -> i64 {
    DEFAULT_PAGE_SIZE as i64
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: default_wire_page_size(),
            sorting: Vec::new(),
            filters: BTreeMap::new(),
            search_term: None,
        }
    }
}

impl QueryRequest {
    /// Resolve names and classify filter values.
    ///
    /// Fails on unknown field names, a column sorted twice, a negative page
    /// index, or a page size that is not positive.
    pub fn into_query(self) -> Result<Query> {
        if self.page_index < 0 {
            return Err(Error::InvalidArgument(format!(
                "pageIndex must be >= 0, got {}",
                self.page_index
            )));
        }
        if self.page_size <= 0 {
            return Err(Error::InvalidArgument(format!(
                "pageSize must be > 0, got {}",
                self.page_size
            )));
        }

        let sorting = self
            .sorting
            .iter()
            .map(|s| {
                Ok(SortKey {
                    field: Field::from_name(&s.id)?,
                    descending: s.desc,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        for (i, key) in sorting.iter().enumerate() {
            if sorting[..i].iter().any(|k| k.field == key.field) {
                return Err(Error::Request(format!(
                    "column {} appears twice in sorting",
                    key.field
                )));
            }
        }

        let mut filters = BTreeMap::new();
        for (name, raw) in &self.filters {
            let field = Field::from_name(name)?;
            if let Some(value) = FilterValue::from_wire(field, raw) {
                filters.insert(field, value);
            }
        }

        Ok(Query {
            page_index: self.page_index as usize,
            page_size: self.page_size as usize,
            sorting,
            filters,
            search_term: self.search_term,
        })
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub data: Vec<Track>,
    pub page_count: usize,
    pub total_count: usize,
}
