//! # livequery
//!
//! A builder for LiveStatus queries. Assemble a request from a datasource,
//! columns, filters, stats, sorts and grouping columns, then render it as
//! protocol text or export it as a JSON document.
//!
//! The crate only produces the outgoing request. Sending it to a LiveStatus
//! socket and parsing the response are left to the caller.
//!
//! ## Modules
//!
//! - [`query`]: Query builder, text renderer and structured documents
//! - [`config`]: Render and logging configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use livequery::{Query, RenderOptions, GroupByLabel};
//!
//! let query = Query::get("services")
//!     .add_columns(["host_name", "description"])
//!     .add_filters(["state = 2"])
//!     .add_sorts(["host_name asc"])
//!     .set_output_format("json");
//!
//! let text = query.render();
//! assert!(text.starts_with("GET services\n"));
//!
//! // Stats grouped under the `Columns:` header
//! let stats = Query::get("services")
//!     .add_stats(["state = 0", "state = 2"])
//!     .add_group_by(["host_name"]);
//! let options = RenderOptions::default().group_by_label(GroupByLabel::Columns);
//! assert!(stats.render_with(&options).contains("Columns: host_name\n"));
//! ```

pub mod config;
pub mod query;

// Re-export top-level types for convenience
pub use query::{
    Clause, GroupByLabel, Query, QueryDocument, QueryError, QueryResult, RenderOptions,
};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};
