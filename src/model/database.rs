// src/model/database.rs
use std::sync::Arc;

use tracing::debug;

use super::table::Table;

/// Errors raised while editing a [`Database`].
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Table not found: {0}")]
    UnknownTable(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// A named group of tables.
///
/// Tables are handed out as shared `Arc<Table>` handles. Declare every
/// foreign key before handing handles to a star: a key added later is only
/// visible through handles fetched afterwards.
#[derive(Debug, Clone, Default)]
pub struct Database {
    name: String,
    tables: Vec<Arc<Table>>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tables(&self) -> &[Arc<Table>] {
        &self.tables
    }

    /// Attach `table` to this database.
    ///
    /// Returns the stored handle; when a structurally equal table is
    /// already present, that one is returned and `table` is dropped.
    pub fn add_table(&mut self, mut table: Table) -> Arc<Table> {
        table.attach(Some(&self.name));

        if let Some(existing) = self.tables.iter().find(|t| t.is_same(&table)) {
            return Arc::clone(existing);
        }

        let table = Arc::new(table);
        self.tables.push(Arc::clone(&table));
        table
    }

    /// First table with the given name.
    pub fn table(&self, name: &str) -> Option<&Arc<Table>> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Detach the table structurally equal to `table`, returning it with
    /// its owner cleared.
    pub fn remove_table(&mut self, table: &Table) -> Option<Table> {
        let index = self.tables.iter().position(|t| t.is_same(table))?;
        let mut removed = Arc::unwrap_or_clone(self.tables.remove(index));
        removed.attach(None);
        Some(removed)
    }

    /// Replace every table, re-attaching each one to this database.
    pub fn set_tables(&mut self, tables: Vec<Table>) {
        self.tables.clear();
        for table in tables {
            self.add_table(table);
        }
    }

    /// Declare `source.column -> target.primary_key` between two attached
    /// tables, resolved by name.
    pub fn add_foreign_key(&mut self, source: &str, column: &str, target: &str) -> ModelResult<()> {
        let target = self
            .table(target)
            .cloned()
            .ok_or_else(|| ModelError::UnknownTable(target.to_string()))?;

        let source = self
            .tables
            .iter_mut()
            .find(|t| t.name() == source)
            .ok_or_else(|| ModelError::UnknownTable(source.to_string()))?;

        if Arc::strong_count(source) > 1 {
            debug!(
                table = source.name(),
                column,
                "foreign key added to a shared table; existing handles keep the old copy"
            );
        }
        Arc::make_mut(source).add_foreign_key(column, &target);
        Ok(())
    }
}
