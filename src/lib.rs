//! # stargen
//!
//! Compiles ad-hoc aggregate reports over a star schema into SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            Schema document (TOML / JSON)                 │
//! │   (database, tables, foreign keys, star members)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [loader]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Model (Rust Types)                      │
//! │   Database ─ Table ─ ForeignKey      Star ─ Dimension    │
//! │                                           ─ Metric       │
//! │                                           ─ Measure      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [binding: names → members]
//! ┌─────────────────────────────────────────────────────────┐
//! │     ReportGenerator (selection bound to one Star)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql::generator]
//! ┌─────────────────────────────────────────────────────────┐
//! │        select / from / join / group by text              │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod binding;
pub mod config;
pub mod loader;
pub mod model;
pub mod report;
pub mod sql;

#[cfg(feature = "server")]
pub mod web;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::binding::{bind_report, describe_star, BindingOptions, ReportRequest};
    pub use crate::loader::{load_schema, Schema, SchemaSource};
    pub use crate::model::{
        AggregateFunction, Database, Dimension, ForeignKey, Measure, Metric, Star, StarId, Table,
    };
    pub use crate::report::{ReportError, ReportGenerator};
    pub use crate::sql::SqlGenerator;
}

pub use model::{Database, Dimension, Measure, Metric, Star, Table};
pub use report::ReportGenerator;
pub use sql::SqlGenerator;
