//! LiveStatus query builder
//!
//! Assembles LiveStatus `GET` requests:
//!
//! - **AST**: the [`Query`] builder and its clauses
//! - **Render**: the protocol text block
//! - **Document**: the structured (JSON) form and loading from it
//!
//! # Examples
//!
//! ## Building and rendering
//!
//! ```rust
//! use livequery::query::Query;
//!
//! let query = Query::get("hosts")
//!     .add_columns(["name", "state"])
//!     .add_filters(["state = 1"])
//!     .set_column_headers(true);
//!
//! assert_eq!(
//!     query.render(),
//!     "GET hosts\nColumns: name state\nFilter: state = 1\nColumnHeaders: On\n"
//! );
//! ```
//!
//! ## Persisting as JSON
//!
//! ```rust
//! use livequery::query::Query;
//!
//! let query = Query::get("services").add_stats(["state = 0", "state = 2"]);
//! let json = query.to_json()?;
//! assert_eq!(Query::from_json(&json)?, query);
//! # Ok::<(), livequery::query::QueryError>(())
//! ```

mod ast;
mod document;
mod error;
mod render;

pub use ast::{Clause, Query};
pub use document::QueryDocument;
pub use error::{QueryError, QueryResult};
pub use render::{GroupByLabel, RenderOptions, Rendered};
