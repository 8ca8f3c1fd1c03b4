//! Schema loaders for different file formats.
//!
//! Currently supports:
//! - **TOML** (.toml)
//! - **JSON** (.json)
//!
//! Both describe the same [`SchemaDocument`]. Loading attaches every table to
//! the database first, then declares foreign keys, then assembles the star,
//! so every table handle the star holds already carries its keys.
//!
//! # Example
//!
//! ```rust,ignore
//! use stargen::loader::load_schema;
//! use std::path::Path;
//!
//! let schema = load_schema(Path::new("models/sales.toml"))?;
//! let star = &schema.star;
//! ```

pub mod document;
pub mod source;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::model::{Database, Dimension, Measure, Metric, ModelError, Star, Table};

pub use document::SchemaDocument;
pub use source::SchemaSource;

/// Errors that can occur when loading a schema.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Unsupported file extension
    #[error("Unsupported file extension: {extension}. Supported: .toml, .json")]
    UnsupportedExtension { extension: String },

    /// IO error reading file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reference to a table the document does not declare
    #[error("Unknown table '{table}' referenced by {context}")]
    UnknownTable { table: String, context: String },

    /// Two entries of the same kind share a name
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },
}

impl From<ModelError> for LoadError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownTable(table) => LoadError::UnknownTable {
                table,
                context: "a foreign key".to_string(),
            },
        }
    }
}

/// Result type for schema loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Document formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "toml" => Ok(Format::Toml),
            "json" => Ok(Format::Json),
            _ => Err(LoadError::UnsupportedExtension {
                extension: extension.to_string(),
            }),
        }
    }
}

/// A loaded star together with the database its tables live in.
#[derive(Debug, Clone)]
pub struct Schema {
    pub database: Database,
    pub star: Star,
}

/// Load a schema from a file path, choosing the parser by extension.
pub fn load_schema(path: &Path) -> LoadResult<Schema> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let schema = load_schema_from_str(&content, format)?;

    info!(
        path = %path.display(),
        tables = schema.database.tables().len(),
        dimensions = schema.star.dimensions().len(),
        measures = schema.star.measures().len(),
        "loaded schema"
    );
    Ok(schema)
}

/// Load a schema from a string (useful for testing).
pub fn load_schema_from_str(content: &str, format: Format) -> LoadResult<Schema> {
    let document: SchemaDocument = match format {
        Format::Toml => toml::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    };
    build_schema(document)
}

/// Build the model graph described by `document`.
pub fn build_schema(document: SchemaDocument) -> LoadResult<Schema> {
    let mut database = Database::new(&document.database);

    let mut seen = HashSet::new();
    for def in &document.tables {
        if !seen.insert(def.name.as_str()) {
            return Err(LoadError::DuplicateName {
                kind: "table",
                name: def.name.clone(),
            });
        }

        let mut table = Table::new(&def.name);
        if let Some(primary_key) = &def.primary_key {
            table = table.with_primary_key(primary_key);
        }
        database.add_table(table);
    }

    for def in &document.tables {
        for key in &def.foreign_keys {
            database.add_foreign_key(&def.name, &key.column, &key.target)?;
        }
    }

    let star_def = &document.star;
    let fact = lookup(&database, &star_def.fact, "star fact")?;
    let mut star = Star::new(&fact);

    for def in &star_def.dimensions {
        if star.dimension(&def.name).is_some() {
            return Err(LoadError::DuplicateName {
                kind: "dimension",
                name: def.name.clone(),
            });
        }
        let table = lookup(&database, &def.table, &format!("dimension '{}'", def.name))?;
        star.add_dimension(Dimension::new(&def.name, &table, &def.column));
    }

    for def in &star_def.metrics {
        let table = lookup(&database, &def.table, "a metric")?;
        star.add_metric(Metric::new(&table, &def.column));
    }

    for def in &star_def.measures {
        if star.measure(&def.name).is_some() {
            return Err(LoadError::DuplicateName {
                kind: "measure",
                name: def.name.clone(),
            });
        }
        let table = lookup(&database, &def.table, &format!("measure '{}'", def.name))?;
        let metric = Metric::new(&table, &def.column);
        star.add_measure(Measure::new(&def.name, metric, def.function.clone()));
    }

    Ok(Schema { database, star })
}

fn lookup(database: &Database, name: &str, context: &str) -> LoadResult<Arc<Table>> {
    database
        .table(name)
        .cloned()
        .ok_or_else(|| LoadError::UnknownTable {
            table: name.to_string(),
            context: context.to_string(),
        })
}
