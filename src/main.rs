//! livequery CLI
//!
//! Command-line interface for building LiveStatus queries:
//! - Render protocol text
//! - Export JSON query documents
//! - Generate a config file

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use livequery::{generate_default_config, Config, GroupByLabel, LoggingConfig, Query, RenderOptions};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "livequery")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build LiveStatus queries")]
#[command(long_about = "livequery assembles LiveStatus GET requests.\nRender them as protocol text or export them as JSON documents.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Header for grouping columns (groupby, columns)
    #[arg(long, global = true, value_parser = parse_group_by_label)]
    pub group_by_label: Option<GroupByLabel>,

    /// Emit a `Limit:` header when a limit is set
    #[arg(long, global = true)]
    pub emit_limit: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the query as LiveStatus protocol text
    Render {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Print the query as a JSON document
    Export {
        #[command(flatten)]
        query: QueryArgs,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Clauses and options of the query being built
#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Datasource (hosts, services, log, ...)
    pub datasource: Option<String>,

    /// Output column (repeatable)
    #[arg(short = 'c', long = "column")]
    pub columns: Vec<String>,

    /// Filter expression, e.g. "state = 1" (repeatable)
    #[arg(short = 'f', long = "filter")]
    pub filters: Vec<String>,

    /// Stats expression (repeatable)
    #[arg(short = 's', long = "stats")]
    pub stats: Vec<String>,

    /// Sort directive, e.g. "name asc" (repeatable)
    #[arg(long = "sort")]
    pub sorts: Vec<String>,

    /// Grouping column (repeatable)
    #[arg(short = 'g', long = "group-by")]
    pub group_by: Vec<String>,

    /// Request a header row (true, false)
    #[arg(long)]
    pub column_headers: Option<bool>,

    /// Maximum number of rows
    #[arg(short = 'l', long)]
    pub limit: Option<u64>,

    /// Response encoding (json, csv, python, ...)
    #[arg(short = 'o', long)]
    pub output_format: Option<String>,

    /// Start from a JSON query document ("-" reads stdin)
    #[arg(long)]
    pub from: Option<PathBuf>,
}

impl QueryArgs {
    /// Build the query, loading `--from` first and applying options on top
    pub fn build(self) -> anyhow::Result<Query> {
        let mut query = match &self.from {
            Some(path) => {
                let content = read_source(path)?;
                Query::from_json(&content)
                    .with_context(|| format!("Invalid query document {}", path.display()))?
            }
            None => Query::new(),
        };

        if let Some(datasource) = self.datasource {
            query = query.datasource(datasource);
        }

        query = query
            .add_columns(self.columns)
            .add_filters(self.filters)
            .add_stats(self.stats)
            .add_sorts(self.sorts)
            .add_group_by(self.group_by);

        if let Some(on) = self.column_headers {
            query = query.set_column_headers(on);
        }
        if let Some(limit) = self.limit {
            query = query.set_limit(limit);
        }
        if let Some(format) = self.output_format {
            query = query.set_output_format(format);
        }

        Ok(query)
    }
}

fn parse_group_by_label(s: &str) -> Result<GroupByLabel, String> {
    GroupByLabel::from_str(s).ok_or_else(|| format!("unknown label '{}' (expected groupby or columns)", s))
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read query document from stdin")?;
        Ok(content)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("livequery={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the query, logs go to stderr
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Load the configuration, install logging and resolve render options
fn setup(cli_config: Option<&Path>, group_by_label: Option<GroupByLabel>, emit_limit: bool) -> anyhow::Result<RenderOptions> {
    let config = match cli_config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default().context("Invalid configuration")?,
    };
    init_logging(&config.logging);

    let mut options = config.render;
    if let Some(label) = group_by_label {
        options.group_by_label = label;
    }
    if emit_limit {
        options.emit_limit = true;
    }
    tracing::debug!(?options, "Render options");

    Ok(options)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { query } => {
            let options = setup(cli.config.as_deref(), cli.group_by_label, cli.emit_limit)?;
            let query = query.build()?;
            print!("{}", query.render_with(&options));
        }

        Commands::Export { query, pretty } => {
            setup(cli.config.as_deref(), cli.group_by_label, cli.emit_limit)?;
            let query = query.build()?;
            let json = if pretty {
                query.to_json_pretty()?
            } else {
                query.to_json()?
            };
            println!("{}", json);
        }

        // Works even when the current config file is broken
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_args_build_query() {
        let cli = Cli::try_parse_from([
            "livequery",
            "render",
            "hosts",
            "-c",
            "name",
            "--column",
            "state",
            "-f",
            "state = 1",
            "--column-headers",
            "true",
            "-l",
            "5",
        ])
        .unwrap();

        let Commands::Render { query } = cli.command else {
            panic!("expected render command");
        };
        let query = query.build().unwrap();

        assert_eq!(
            query.render(),
            "GET hosts\nColumns: name state\nFilter: state = 1\nColumnHeaders: On\n"
        );
        assert_eq!(query.limit(), Some(5));
    }

    #[test]
    fn test_global_render_flags() {
        let cli = Cli::try_parse_from([
            "livequery",
            "export",
            "services",
            "--group-by-label",
            "columns",
            "--emit-limit",
            "--pretty",
        ])
        .unwrap();

        assert_eq!(cli.group_by_label, Some(GroupByLabel::Columns));
        assert!(cli.emit_limit);
        assert!(matches!(cli.command, Commands::Export { pretty: true, .. }));
    }

    #[test]
    fn test_invalid_group_by_label_rejected() {
        let result = Cli::try_parse_from(["livequery", "render", "--group-by-label", "rows"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_from_document_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.json");
        std::fs::write(
            &path,
            r#"{"datasource": "services", "columns": ["host_name"], "column_headers": true}"#,
        )
        .unwrap();

        let args = QueryArgs {
            columns: vec!["description".to_string()],
            output_format: Some("json".to_string()),
            from: Some(path),
            ..Default::default()
        };
        let query = args.build().unwrap();

        assert_eq!(query.datasource_name(), Some("services"));
        assert_eq!(query.columns(), ["host_name", "description"]);
        assert!(query.column_headers());
        assert_eq!(query.output_format(), Some("json"));
    }

    #[test]
    fn test_build_from_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.json");
        std::fs::write(&path, r#"{"limit": "ten"}"#).unwrap();

        let args = QueryArgs {
            from: Some(path),
            ..Default::default()
        };
        assert!(args.build().is_err());
    }

    #[test]
    fn test_setup_reports_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livequery.toml");
        std::fs::write(&path, "[render]\ngroup_by_label = \"GroupBy:\"\n").unwrap();

        let err = setup(Some(&path), None, false).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
