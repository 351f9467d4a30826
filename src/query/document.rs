//! Structured query documents
//!
//! A [`QueryDocument`] is the key/value form of a [`Query`], used to persist
//! or transport a query as JSON:
//!
//! ```text
//! {
//!   "datasource": "hosts",
//!   "columns": ["name", "state"],
//!   "filters": ["state = 1"],
//!   "stats": [],
//!   "sorts": [],
//!   "groupby": [],
//!   "column_headers": true,
//!   "limit": 5,
//!   "output_format": null
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::query::ast::{Clause, Query};
use crate::query::error::{QueryError, QueryResult};

/// Serializable snapshot of a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDocument {
    pub datasource: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub columns: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub filters: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub stats: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub sorts: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub groupby: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub column_headers: bool,
    pub limit: Option<u64>,
    pub output_format: Option<String>,
}

impl QueryDocument {
    /// Read a document from an untyped JSON value.
    ///
    /// Missing and `null` keys take their defaults and unknown keys are
    /// ignored. A present key with the wrong type is a
    /// [`QueryError::TypeValidation`].
    pub fn from_value(value: &Value) -> QueryResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| QueryError::type_mismatch("document", value, "object"))?;

        Ok(Self {
            datasource: optional_string(map, "datasource")?,
            columns: string_list(map, Clause::Columns)?,
            filters: string_list(map, Clause::Filters)?,
            stats: string_list(map, Clause::Stats)?,
            sorts: string_list(map, Clause::Sorts)?,
            groupby: string_list(map, Clause::GroupBy)?,
            column_headers: match present(map, "column_headers") {
                None => false,
                Some(v) => v
                    .as_bool()
                    .ok_or_else(|| QueryError::type_mismatch("column_headers", v, "bool"))?,
            },
            limit: match present(map, "limit") {
                None => None,
                Some(v) => Some(v.as_u64().ok_or_else(|| {
                    QueryError::type_mismatch("limit", v, "non-negative integer")
                })?),
            },
            output_format: optional_string(map, "output_format")?,
        })
    }

    /// Parse a document from JSON text
    pub fn from_json(content: &str) -> QueryResult<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(&value)
    }
}

/// Deserialize `null` as the field's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A key's value, treating `null` as absent
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn optional_string(map: &Map<String, Value>, key: &'static str) -> QueryResult<Option<String>> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(QueryError::type_mismatch(key, other, "string")),
    }
}

fn string_list(map: &Map<String, Value>, clause: Clause) -> QueryResult<Vec<String>> {
    let key = clause.key();
    match present(map, key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(QueryError::type_mismatch(key, other, "string")),
            })
            .collect(),
        Some(other) => Err(QueryError::type_mismatch(key, other, "array of strings")),
    }
}

impl From<QueryDocument> for Query {
    fn from(doc: QueryDocument) -> Self {
        Query {
            datasource: doc.datasource,
            columns: doc.columns,
            filters: doc.filters,
            stats: doc.stats,
            sorts: doc.sorts,
            group_by: doc.groupby,
            column_headers: doc.column_headers,
            limit: doc.limit,
            output_format: doc.output_format,
        }
    }
}

impl From<&Query> for QueryDocument {
    fn from(query: &Query) -> Self {
        QueryDocument {
            datasource: query.datasource.clone(),
            columns: query.columns.clone(),
            filters: query.filters.clone(),
            stats: query.stats.clone(),
            sorts: query.sorts.clone(),
            groupby: query.group_by.clone(),
            column_headers: query.column_headers,
            limit: query.limit,
            output_format: query.output_format.clone(),
        }
    }
}

impl Query {
    /// Project the query into a structured document
    pub fn to_document(&self) -> QueryDocument {
        QueryDocument::from(self)
    }

    /// Serialize the query document as compact JSON
    pub fn to_json(&self) -> QueryResult<String> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    /// Serialize the query document as indented JSON
    pub fn to_json_pretty(&self) -> QueryResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Replace every field with the contents of `doc`
    pub fn load_document(&mut self, doc: QueryDocument) -> &mut Self {
        tracing::debug!(
            datasource = ?doc.datasource,
            columns = doc.columns.len(),
            filters = doc.filters.len(),
            "Loading query document"
        );
        *self = Query::from(doc);
        self
    }

    /// Replace every field from an untyped document.
    ///
    /// On error the query is left unchanged.
    pub fn load_value(&mut self, value: &Value) -> QueryResult<&mut Self> {
        let doc = QueryDocument::from_value(value)?;
        Ok(self.load_document(doc))
    }

    /// Replace every field from a JSON document.
    ///
    /// On error the query is left unchanged.
    pub fn load_json(&mut self, content: &str) -> QueryResult<&mut Self> {
        let doc = QueryDocument::from_json(content)?;
        Ok(self.load_document(doc))
    }

    /// Build a query from a JSON document
    pub fn from_json(content: &str) -> QueryResult<Self> {
        QueryDocument::from_json(content).map(Query::from)
    }
}
