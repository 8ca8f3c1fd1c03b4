// src/model/dimension.rs
use std::sync::Arc;

use super::star::StarId;
use super::table::Table;

/// A named grouping column (report label over `table.column`).
#[derive(Debug, Clone)]
pub struct Dimension {
    name: String,
    table: Arc<Table>,
    column: String,
    /// Owning star, set when the star adopts this dimension.
    star: Option<StarId>,
}

impl Dimension {
    pub fn new(name: impl Into<String>, table: &Arc<Table>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: Arc::clone(table),
            column: column.into(),
            star: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn star(&self) -> Option<StarId> {
        self.star
    }

    pub(crate) fn set_star(&mut self, star: StarId) {
        self.star = Some(star);
    }
}

/// Name, table identity and column; the owner is not part of it.
impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.column == other.column && self.table.is_same(&other.table)
    }
}
