//! Query model and builder
//!
//! A [`Query`] accumulates the clauses of a LiveStatus `GET` request. Clause
//! values (filter expressions, stat expressions, sort directives) are opaque
//! strings in the target engine's syntax and are never interpreted here.
//!
//! # Example
//!
//! ```text
//! Query::get("hosts")
//!     .add_columns(["name", "state"])
//!     .add_filters(["state = 1"])
//!     .set_column_headers(true)
//! ```

use serde_json::Value;

use crate::query::error::{QueryError, QueryResult};

/// A LiveStatus query under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub(super) datasource: Option<String>,
    pub(super) columns: Vec<String>,
    pub(super) filters: Vec<String>,
    pub(super) stats: Vec<String>,
    pub(super) sorts: Vec<String>,
    pub(super) group_by: Vec<String>,
    pub(super) column_headers: bool,
    pub(super) limit: Option<u64>,
    pub(super) output_format: Option<String>,
}

/// The list-valued clauses of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    /// Requested output columns
    Columns,
    /// Row selection predicates
    Filters,
    /// Aggregate expressions
    Stats,
    /// Sort directives
    Sorts,
    /// Grouping columns
    GroupBy,
}

impl Clause {
    /// All clauses in rendering order
    pub const ALL: [Clause; 5] = [
        Self::Columns,
        Self::Filters,
        Self::Stats,
        Self::Sorts,
        Self::GroupBy,
    ];

    /// Key of this clause in the structured document
    pub fn key(&self) -> &'static str {
        match self {
            Self::Columns => "columns",
            Self::Filters => "filters",
            Self::Stats => "stats",
            Self::Sorts => "sorts",
            Self::GroupBy => "groupby",
        }
    }
}

impl Query {
    /// Create an empty query with no datasource
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a query against a datasource such as `hosts` or `services`
    pub fn get(datasource: impl Into<String>) -> Self {
        Self::new().datasource(datasource)
    }

    /// Set the datasource
    pub fn datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = Some(datasource.into());
        self
    }

    /// Append values to a clause, preserving order
    pub fn add<I, S>(mut self, clause: Clause, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clause_mut(clause)
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Append output columns
    pub fn add_columns<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(Clause::Columns, names)
    }

    /// Append filter expressions
    pub fn add_filters<I, S>(self, expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(Clause::Filters, expressions)
    }

    /// Append stat expressions
    pub fn add_stats<I, S>(self, expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(Clause::Stats, expressions)
    }

    /// Append sort directives
    pub fn add_sorts<I, S>(self, directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(Clause::Sorts, directives)
    }

    /// Append grouping columns
    pub fn add_group_by<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(Clause::GroupBy, names)
    }

    /// Request (or suppress) the header row in the response
    pub fn set_column_headers(mut self, on: bool) -> Self {
        self.column_headers = on;
        self
    }

    /// Cap the number of result rows
    pub fn set_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the response encoding, e.g. `json` or `csv`
    pub fn set_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    /// Append untyped values to a clause.
    ///
    /// Every value must be a JSON string. If any value is not, nothing is
    /// appended and a [`QueryError::TypeValidation`] is returned.
    pub fn try_add(&mut self, clause: Clause, values: &[Value]) -> QueryResult<&mut Self> {
        let strings = values
            .iter()
            .map(|value| match value {
                Value::String(s) => Ok(s.clone()),
                other => Err(QueryError::type_mismatch(clause.key(), other, "string")),
            })
            .collect::<QueryResult<Vec<_>>>()
            .map_err(rejected)?;

        self.clause_mut(clause).extend(strings);
        Ok(self)
    }

    /// Set the column header flag from an untyped value (must be a bool)
    pub fn try_set_column_headers(&mut self, value: &Value) -> QueryResult<&mut Self> {
        let on = value
            .as_bool()
            .ok_or_else(|| rejected(QueryError::type_mismatch("column_headers", value, "bool")))?;
        self.column_headers = on;
        Ok(self)
    }

    /// Set the limit from an untyped value (must be a non-negative integer)
    pub fn try_set_limit(&mut self, value: &Value) -> QueryResult<&mut Self> {
        let limit = value.as_u64().ok_or_else(|| {
            rejected(QueryError::type_mismatch("limit", value, "non-negative integer"))
        })?;
        self.limit = Some(limit);
        Ok(self)
    }

    /// Set the output format from an untyped value (must be a string)
    pub fn try_set_output_format(&mut self, value: &Value) -> QueryResult<&mut Self> {
        let format = value
            .as_str()
            .ok_or_else(|| rejected(QueryError::type_mismatch("output_format", value, "string")))?;
        self.output_format = Some(format.to_string());
        Ok(self)
    }

    /// Get the datasource, if set
    pub fn datasource_name(&self) -> Option<&str> {
        self.datasource.as_deref()
    }

    /// Get the values of a clause
    pub fn clause(&self, clause: Clause) -> &[String] {
        match clause {
            Clause::Columns => &self.columns,
            Clause::Filters => &self.filters,
            Clause::Stats => &self.stats,
            Clause::Sorts => &self.sorts,
            Clause::GroupBy => &self.group_by,
        }
    }

    /// Output columns, in insertion order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Filter expressions, in insertion order
    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// Stat expressions, in insertion order
    pub fn stats(&self) -> &[String] {
        &self.stats
    }

    /// Sort directives, in insertion order
    pub fn sorts(&self) -> &[String] {
        &self.sorts
    }

    /// Grouping columns, in insertion order
    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    /// Whether a header row is requested
    pub fn column_headers(&self) -> bool {
        self.column_headers
    }

    /// Row limit, if set
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Response encoding, if set
    pub fn output_format(&self) -> Option<&str> {
        self.output_format.as_deref()
    }

    fn clause_mut(&mut self, clause: Clause) -> &mut Vec<String> {
        match clause {
            Clause::Columns => &mut self.columns,
            Clause::Filters => &mut self.filters,
            Clause::Stats => &mut self.stats,
            Clause::Sorts => &mut self.sorts,
            Clause::GroupBy => &mut self.group_by,
        }
    }
}

fn rejected(err: QueryError) -> QueryError {
    tracing::debug!(error = %err, "Rejected query mutation");
    err
}
