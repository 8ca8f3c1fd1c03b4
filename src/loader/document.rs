//! Serde shape of a schema document.
//!
//! ```toml
//! database = "StarDB"
//!
//! [[tables]]
//! name = "FactSales"
//! foreign_keys = [
//!     { column = "StoreId", target = "DimStore" },
//! ]
//!
//! [[tables]]
//! name = "DimStore"
//! primary_key = "id"
//!
//! [star]
//! fact = "FactSales"
//!
//! [[star.dimensions]]
//! name = "Store Name"
//! table = "DimStore"
//! column = "StoreName"
//!
//! [[star.measures]]
//! name = "Products Sold"
//! function = "sum"
//! table = "FactSales"
//! column = "Quantity"
//! ```

use serde::{Deserialize, Serialize};

use crate::model::AggregateFunction;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SchemaDocument {
    pub database: String,
    #[serde(default)]
    pub tables: Vec<TableDef>,
    pub star: StarDef,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TableDef {
    pub name: String,
    #[serde(default)]
    pub primary_key: Option<String>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ForeignKeyDef {
    /// Column on the declaring table.
    pub column: String,
    /// Name of the referenced table.
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StarDef {
    pub fact: String,
    #[serde(default)]
    pub dimensions: Vec<DimensionDef>,
    #[serde(default)]
    pub metrics: Vec<MetricDef>,
    #[serde(default)]
    pub measures: Vec<MeasureDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DimensionDef {
    pub name: String,
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricDef {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MeasureDef {
    pub name: String,
    pub function: AggregateFunction,
    pub table: String,
    pub column: String,
}
