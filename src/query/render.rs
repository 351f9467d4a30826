//! LiveStatus text rendering
//!
//! Produces the request block sent to a LiveStatus socket:
//!
//! ```text
//! GET <datasource>
//! [Columns: <name> <name> ...]
//! [Filter: <expr>]*
//! [Stats: <expr>]*
//! [Sort: <directive>]*
//! [GroupBy: <name> <name> ...]
//! [Limit: <n>]
//! ColumnHeaders: On|Off
//! [OutputFormat: <format>]
//! ```

use serde::Deserialize;

use crate::query::ast::Query;

/// Header used for the grouping columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupByLabel {
    /// `GroupBy: a b`
    #[default]
    GroupBy,
    /// `Columns: a b`, for engines that group Stats on the column list
    Columns,
}

impl GroupByLabel {
    /// The header name without the colon
    pub fn header(&self) -> &'static str {
        match self {
            Self::GroupBy => "GroupBy",
            Self::Columns => "Columns",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "groupby" | "group_by" | "group-by" => Some(Self::GroupBy),
            "columns" => Some(Self::Columns),
            _ => None,
        }
    }
}

/// Options controlling text rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RenderOptions {
    /// Header for the grouping columns
    #[serde(default)]
    pub group_by_label: GroupByLabel,

    /// Emit a `Limit:` header when a limit is set
    #[serde(default)]
    pub emit_limit: bool,
}

impl RenderOptions {
    pub fn group_by_label(mut self, label: GroupByLabel) -> Self {
        self.group_by_label = label;
        self
    }

    pub fn emit_limit(mut self, emit: bool) -> Self {
        self.emit_limit = emit;
        self
    }
}

/// A query paired with the options it renders with
#[derive(Debug, Clone, Copy)]
pub struct Rendered<'a> {
    query: &'a Query,
    options: &'a RenderOptions,
}

impl std::fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let query = self.query;

        writeln!(f, "GET {}", query.datasource.as_deref().unwrap_or(""))?;

        if !query.columns.is_empty() {
            writeln!(f, "Columns: {}", query.columns.join(" "))?;
        }
        for filter in &query.filters {
            writeln!(f, "Filter: {}", filter)?;
        }
        for stat in &query.stats {
            writeln!(f, "Stats: {}", stat)?;
        }
        for sort in &query.sorts {
            writeln!(f, "Sort: {}", sort)?;
        }
        if !query.group_by.is_empty() {
            writeln!(
                f,
                "{}: {}",
                self.options.group_by_label.header(),
                query.group_by.join(" ")
            )?;
        }
        if self.options.emit_limit {
            if let Some(limit) = query.limit {
                writeln!(f, "Limit: {}", limit)?;
            }
        }

        let headers = if query.column_headers { "On" } else { "Off" };
        writeln!(f, "ColumnHeaders: {}", headers)?;

        if let Some(format) = &query.output_format {
            writeln!(f, "OutputFormat: {}", format)?;
        }

        Ok(())
    }
}

impl Query {
    /// Render the query with default options
    pub fn render(&self) -> String {
        self.render_with(&RenderOptions::default())
    }

    /// Render the query as a LiveStatus request block
    pub fn render_with(&self, options: &RenderOptions) -> String {
        let out = self.display_with(options).to_string();

        tracing::trace!(
            datasource = ?self.datasource,
            lines = out.lines().count(),
            "Rendered query"
        );

        out
    }

    /// Borrow the query as a [`Display`](std::fmt::Display) value using `options`
    pub fn display_with<'a>(&'a self, options: &'a RenderOptions) -> Rendered<'a> {
        Rendered {
            query: self,
            options,
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.display_with(&RenderOptions::default()), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_query() -> Query {
        Query::get("foo")
            .add_columns(["foo", "bar"])
            .add_filters(["hey", "ya"])
            .add_stats(["ploum", "abcd"])
            .add_sorts(["lklk", "klkl"])
            .add_group_by(["qwe", "rty"])
            .set_column_headers(true)
            .set_limit(42)
            .set_output_format("json")
    }

    #[test]
    fn test_render_hosts_scenario() {
        let query = Query::get("hosts")
            .add_columns(["name", "state"])
            .add_filters(["state = 1"])
            .set_column_headers(true)
            .set_limit(5);

        assert_eq!(
            query.render(),
            "GET hosts\nColumns: name state\nFilter: state = 1\nColumnHeaders: On\n"
        );
    }

    #[test]
    fn test_render_without_filters_has_no_filter_lines() {
        let query = Query::get("services").add_columns(["description"]);
        let text = query.render();

        assert!(!text.contains("Filter:"));
        assert_eq!(text, "GET services\nColumns: description\nColumnHeaders: Off\n");
    }

    #[test]
    fn test_render_empty_query() {
        assert_eq!(Query::new().render(), "GET \nColumnHeaders: Off\n");
    }

    #[test]
    fn test_render_column_headers_off_is_explicit() {
        let on = Query::get("hosts").set_column_headers(true).render();
        let off = Query::get("hosts").set_column_headers(false).render();

        assert!(on.contains("ColumnHeaders: On\n"));
        assert!(off.contains("ColumnHeaders: Off\n"));
    }

    #[test]
    fn test_render_full_query_line_order() {
        // Grouping renders under the `GroupBy:` header by default.
        assert_eq!(
            full_query().render(),
            "GET foo\n\
             Columns: foo bar\n\
             Filter: hey\n\
             Filter: ya\n\
             Stats: ploum\n\
             Stats: abcd\n\
             Sort: lklk\n\
             Sort: klkl\n\
             GroupBy: qwe rty\n\
             ColumnHeaders: On\n\
             OutputFormat: json\n"
        );
    }

    #[test]
    fn test_render_group_by_as_columns() {
        let options = RenderOptions::default().group_by_label(GroupByLabel::Columns);
        let text = Query::get("services")
            .add_stats(["state = 0", "state = 2"])
            .add_group_by(["host_name"])
            .render_with(&options);

        assert_eq!(
            text,
            "GET services\nStats: state = 0\nStats: state = 2\nColumns: host_name\nColumnHeaders: Off\n"
        );
    }

    #[test]
    fn test_render_limit_only_when_enabled() {
        let query = Query::get("log").set_limit(100);

        assert!(!query.render().contains("Limit:"));

        let options = RenderOptions::default().emit_limit(true);
        assert_eq!(
            query.render_with(&options),
            "GET log\nLimit: 100\nColumnHeaders: Off\n"
        );

        // No limit set, nothing to emit
        assert!(!Query::get("log").render_with(&options).contains("Limit:"));
    }

    #[test]
    fn test_render_is_pure() {
        let query = full_query();
        assert_eq!(query.render(), query.render());
        assert_eq!(query.to_string(), query.render());
    }

    #[test]
    fn test_group_by_label_from_str() {
        assert_eq!(GroupByLabel::from_str("GroupBy"), Some(GroupByLabel::GroupBy));
        assert_eq!(GroupByLabel::from_str("group-by"), Some(GroupByLabel::GroupBy));
        assert_eq!(GroupByLabel::from_str("columns"), Some(GroupByLabel::Columns));
        assert_eq!(GroupByLabel::from_str("rows"), None);
    }

    #[test]
    fn test_display_with_streams_into_formatter() {
        use std::fmt::Write;

        let query = Query::get("hosts").add_group_by(["name"]).set_limit(3);
        let options = RenderOptions::default()
            .group_by_label(GroupByLabel::Columns)
            .emit_limit(true);

        let mut out = String::from("# request\n");
        write!(out, "{}", query.display_with(&options)).unwrap();

        assert_eq!(
            out,
            "# request\nGET hosts\nColumns: name\nLimit: 3\nColumnHeaders: Off\n"
        );
        assert_eq!(query.display_with(&options).to_string(), query.render_with(&options));
    }
}
