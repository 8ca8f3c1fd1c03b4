//! SQL compiler for star queries.
//!
//! [`SqlGenerator`] collects select items and the tables they come from,
//! then renders one statement:
//!
//! ```text
//! select
//!     DimStore.StoreName as "Store Name",
//!     sum(FactSales.Quantity) as "Products Sold"
//! from FactSales
//! join DimStore on DimStore.id = FactSales.StoreId
//! group by
//!     DimStore.StoreName
//! ```
//!
//! The first table registered is the FROM table. Joins are derived only
//! from foreign keys declared on that table; a table reachable solely
//! through another non-root table gets no join.

use crate::model::{AggregateFunction, Table};

use super::ident::{maybe_quote, quote_identifier};

/// Errors that can occur while rendering SQL.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    #[error("No tables registered; add the fact table before generating SQL")]
    NoTables,

    #[error("Table {0} is joined but has no primary key")]
    MissingPrimaryKey(String),
}

pub type GenerateResult<T> = Result<T, GenerateError>;

/// A SELECT list item: a column, optionally aggregated, optionally aliased.
#[derive(Debug, Clone)]
struct SelectItem<'a> {
    table: &'a Table,
    column: String,
    alias: Option<String>,
    function: Option<AggregateFunction>,
}

impl SelectItem<'_> {
    fn is_aggregate(&self) -> bool {
        self.function.is_some()
    }

    fn is_same(&self, other: &SelectItem<'_>) -> bool {
        self.table.is_same(other.table)
            && self.column == other.column
            && self.alias == other.alias
            && self.function == other.function
    }

    /// `table.column`, the form GROUP BY always uses.
    fn column_sql(&self, case_sensitive: bool) -> String {
        format!(
            "{}.{}",
            maybe_quote(self.table.name(), case_sensitive),
            maybe_quote(&self.column, case_sensitive)
        )
    }

    fn select_sql(&self, case_sensitive: bool) -> String {
        let column = self.column_sql(case_sensitive);
        let mut sql = match &self.function {
            Some(function) => format!("{}({})", function, column),
            None => column,
        };

        // Aliases are report labels and are quoted regardless of case mode.
        if let Some(alias) = &self.alias {
            sql.push_str(" as ");
            sql.push_str(&quote_identifier(alias));
        }
        sql
    }
}

/// Accumulates columns, aggregates and tables, then renders SQL.
#[derive(Debug, Clone, Default)]
pub struct SqlGenerator<'a> {
    selects: Vec<SelectItem<'a>>,
    tables: Vec<&'a Table>,
    case_sensitive: bool,
    force_group_by: bool,
}

impl<'a> SqlGenerator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Quote table and column names with `"`.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    pub fn is_force_group_by(&self) -> bool {
        self.force_group_by
    }

    /// Emit GROUP BY over plain columns even when nothing is aggregated.
    pub fn set_force_group_by(&mut self, force_group_by: bool) {
        self.force_group_by = force_group_by;
    }

    /// The FROM table: the first table ever registered.
    pub fn root(&self) -> Option<&'a Table> {
        self.tables.first().copied()
    }

    pub fn tables(&self) -> &[&'a Table] {
        &self.tables
    }

    /// Register `table`. Structurally equal tables are registered once.
    pub fn add_table(&mut self, table: &'a Table) {
        if !self.tables.iter().any(|t| t.is_same(table)) {
            self.tables.push(table);
        }
    }

    pub fn add_select(&mut self, column: impl Into<String>, table: &'a Table) {
        self.push(SelectItem {
            table,
            column: column.into(),
            alias: None,
            function: None,
        });
    }

    pub fn add_select_as(
        &mut self,
        column: impl Into<String>,
        table: &'a Table,
        alias: impl Into<String>,
    ) {
        self.push(SelectItem {
            table,
            column: column.into(),
            alias: Some(alias.into()),
            function: None,
        });
    }

    pub fn add_aggregate(
        &mut self,
        function: impl Into<AggregateFunction>,
        column: impl Into<String>,
        table: &'a Table,
    ) {
        self.push(SelectItem {
            table,
            column: column.into(),
            alias: None,
            function: Some(function.into()),
        });
    }

    pub fn add_aggregate_as(
        &mut self,
        function: impl Into<AggregateFunction>,
        column: impl Into<String>,
        table: &'a Table,
        alias: impl Into<String>,
    ) {
        self.push(SelectItem {
            table,
            column: column.into(),
            alias: Some(alias.into()),
            function: Some(function.into()),
        });
    }

    fn push(&mut self, item: SelectItem<'a>) {
        let table = item.table;
        if !self.selects.iter().any(|s| s.is_same(&item)) {
            self.selects.push(item);
        }
        self.add_table(table);
    }

    /// Render the statement.
    pub fn sql(&self) -> GenerateResult<String> {
        let root = self.root().ok_or(GenerateError::NoTables)?;

        let select = self
            .selects
            .iter()
            .map(|item| format!("    {}", item.select_sql(self.case_sensitive)))
            .collect::<Vec<_>>()
            .join(",\n");

        let mut sql = String::from("select\n");
        sql.push_str(&select);
        sql.push_str("\nfrom ");
        sql.push_str(&maybe_quote(root.name(), self.case_sensitive));
        sql.push_str(&self.joins(root)?);
        sql.push_str(&self.group_by());
        Ok(sql)
    }

    fn joins(&self, root: &Table) -> GenerateResult<String> {
        let q = |ident: &str| maybe_quote(ident, self.case_sensitive).into_owned();
        let mut sql = String::new();

        for table in self.tables.iter().skip(1) {
            for key in root.references(table) {
                let primary_key = table
                    .primary_key()
                    .ok_or_else(|| GenerateError::MissingPrimaryKey(table.name().to_string()))?;

                sql.push_str(&format!(
                    "\njoin {target} on {target}.{pk} = {root}.{column}",
                    target = q(table.name()),
                    pk = q(primary_key),
                    root = q(root.name()),
                    column = q(key.source_column()),
                ));
            }
        }

        Ok(sql)
    }

    fn group_by(&self) -> String {
        let plain: Vec<String> = self
            .selects
            .iter()
            .filter(|item| !item.is_aggregate())
            .map(|item| format!("    {}", item.column_sql(self.case_sensitive)))
            .collect();
        let aggregated = self.selects.iter().any(SelectItem::is_aggregate);

        if plain.is_empty() || !(aggregated || self.force_group_by) {
            return String::new();
        }

        format!("\ngroup by\n{}", plain.join(",\n"))
    }
}
