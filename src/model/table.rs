// src/model/table.rs
//! Physical tables and the foreign keys between them.

/// Structural identity of a table.
///
/// Two tables are the same table when they belong to the same database (or
/// both to none), share a name, and share a primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub database: Option<String>,
    pub name: String,
    pub primary_key: Option<String>,
}

/// A directed edge `source.source_column -> target.primary_key`.
///
/// Both ends live in the same database, so the target is held by name and
/// primary key and takes its owner from the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    source: TableKey,
    source_column: String,
    target_name: String,
    target_primary_key: Option<String>,
}

impl ForeignKey {
    pub fn source(&self) -> &TableKey {
        &self.source
    }

    /// Column on the source table holding the reference.
    pub fn source_column(&self) -> &str {
        &self.source_column
    }

    pub fn target(&self) -> TableKey {
        TableKey {
            database: self.source.database.clone(),
            name: self.target_name.clone(),
            primary_key: self.target_primary_key.clone(),
        }
    }

    /// Whether `table` is the table this key points at.
    pub fn targets(&self, table: &Table) -> bool {
        table.database == self.source.database
            && table.name == self.target_name
            && table.primary_key == self.target_primary_key
    }
}

/// A physical table.
#[derive(Debug, Clone)]
pub struct Table {
    /// Name of the owning database, set on attachment.
    database: Option<String>,
    name: String,
    primary_key: Option<String>,
    foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            database: None,
            name: name.into(),
            primary_key: None,
            foreign_keys: Vec::new(),
        }
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn key(&self) -> TableKey {
        TableKey {
            database: self.database.clone(),
            name: self.name.clone(),
            primary_key: self.primary_key.clone(),
        }
    }

    /// Whether this table's structural identity equals `key`.
    pub fn has_key(&self, key: &TableKey) -> bool {
        self.database == key.database && self.name == key.name && self.primary_key == key.primary_key
    }

    /// Whether both tables share the same structural identity.
    pub fn is_same(&self, other: &Table) -> bool {
        self.database == other.database
            && self.name == other.name
            && self.primary_key == other.primary_key
    }

    /// Declare `self.column -> target.primary_key`.
    ///
    /// Declaring the same `(column, target)` pair twice is a no-op.
    /// The target is matched by name and primary key within this table's
    /// database, so keys may be declared before or after attachment.
    pub fn add_foreign_key(&mut self, column: impl Into<String>, target: &Table) {
        let key = ForeignKey {
            source: self.key(),
            source_column: column.into(),
            target_name: target.name.clone(),
            target_primary_key: target.primary_key.clone(),
        };

        if !self.foreign_keys.contains(&key) {
            self.foreign_keys.push(key);
        }
    }

    /// Foreign keys on this table that point at `target`.
    pub fn references<'t>(&'t self, target: &'t Table) -> impl Iterator<Item = &'t ForeignKey> {
        self.foreign_keys
            .iter()
            .filter(move |key| key.targets(target))
    }

    /// Move the table under `database`, re-keying the source side of its
    /// foreign keys.
    pub(crate) fn attach(&mut self, database: Option<&str>) {
        self.database = database.map(str::to_string);
        let source = self.key();
        for key in &mut self.foreign_keys {
            key.source = source.clone();
        }
    }
}
