//! Star-schema metadata model.
//!
//! The physical side ([`Database`], [`Table`], [`ForeignKey`]) describes what
//! exists in the warehouse. The report side ([`Star`], [`Dimension`],
//! [`Metric`], [`Measure`]) names the columns a caller may group by or
//! aggregate.

pub mod database;
pub mod dimension;
pub mod measure;
pub mod star;
pub mod table;

pub use database::{Database, ModelError, ModelResult};
pub use dimension::Dimension;
pub use measure::{AggregateFunction, Measure, Metric};
pub use star::{Star, StarId};
pub use table::{ForeignKey, Table, TableKey};
