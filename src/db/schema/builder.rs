//! In-process schema model that entity configurations register against.
//!
//! Each entity is described by an [`EntityConfiguration`], which fills an
//! [`EntityBuilder`] with its table name, columns and indexes. The resulting
//! [`SchemaModel`] renders PostgreSQL DDL.

use std::collections::BTreeMap;
use std::fmt;

/// Declarative mapping of one in-memory entity onto a table.
pub trait EntityConfiguration {
    /// In-memory type name; used as the table name unless `table_name` overrides it
    const ENTITY: &'static str;

    fn configure(builder: &mut EntityBuilder);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Serial,
    Integer,
    Text,
    Timestamptz,
    /// `NUMERIC` with optional (precision, scale)
    Numeric(Option<(u8, u8)>),
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Serial => f.write_str("SERIAL"),
            ColumnType::Integer => f.write_str("INTEGER"),
            ColumnType::Text => f.write_str("TEXT"),
            ColumnType::Timestamptz => f.write_str("TIMESTAMPTZ"),
            ColumnType::Numeric(None) => f.write_str("NUMERIC"),
            ColumnType::Numeric(Some((precision, scale))) => {
                write!(f, "NUMERIC({precision}, {scale})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnType,
    pub required: bool,
    pub primary_key: bool,
    pub default_sql: Option<String>,
}

impl ColumnDef {
    fn new(name: &str, ty: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            required: true,
            primary_key: false,
            default_sql: None,
        }
    }

    /// Fixes total digits and digits after the decimal point. Turns the column
    /// into a `NUMERIC` whatever type it was declared with.
    pub fn has_precision(&mut self, precision: u8, scale: u8) -> &mut Self {
        self.ty = ColumnType::Numeric(Some((precision, scale)));
        self
    }

    pub fn is_required(&mut self, required: bool) -> &mut Self {
        self.required = required;
        self
    }

    pub fn has_default_sql(&mut self, expr: &str) -> &mut Self {
        self.default_sql = Some(expr.to_string());
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.ty);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if self.required {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default_sql {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexDef {
    pub fn is_unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    /// Index name as PostgreSQL stores it; unquoted identifiers fold to lowercase
    pub fn name(&self, table: &str) -> String {
        format!("ix_{}_{}", table, self.columns.join("_")).to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub entity: String,
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub indexes: Vec<IndexDef>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("    {}", c.to_sql()))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("CREATE TABLE IF NOT EXISTS {} (\n{}\n);", self.name, columns)
    }

    pub fn create_index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE {}INDEX IF NOT EXISTS {} ON {} ({});",
                    if index.unique { "UNIQUE " } else { "" },
                    index.name(&self.name),
                    self.name,
                    index.columns.join(", "),
                )
            })
            .collect()
    }
}

/// Collects the declarations of a single entity. Every method is idempotent:
/// repeating a declaration leaves the builder unchanged.
#[derive(Debug)]
pub struct EntityBuilder {
    table: TableSchema,
}

impl EntityBuilder {
    pub fn new(entity: &str) -> Self {
        Self {
            table: TableSchema {
                entity: entity.to_string(),
                name: entity.to_string(),
                columns: Vec::new(),
                indexes: Vec::new(),
            },
        }
    }

    pub fn table_name(&mut self, name: &str) -> &mut Self {
        self.table.name = name.to_string();
        self
    }

    pub fn has_key(&mut self, column: &str) -> &mut ColumnDef {
        let col = self.property(column, ColumnType::Serial);
        col.ty = ColumnType::Serial;
        col.primary_key = true;
        col
    }

    /// Returns the column named `column`, declaring it with `ty` on first use.
    pub fn property(&mut self, column: &str, ty: ColumnType) -> &mut ColumnDef {
        let pos = match self.table.columns.iter().position(|c| c.name == column) {
            Some(pos) => pos,
            None => {
                self.table.columns.push(ColumnDef::new(column, ty));
                self.table.columns.len() - 1
            }
        };
        &mut self.table.columns[pos]
    }

    pub fn has_index(&mut self, columns: &[&str]) -> &mut IndexDef {
        let pos = match self
            .table
            .indexes
            .iter()
            .position(|i| i.columns.iter().map(String::as_str).eq(columns.iter().copied()))
        {
            Some(pos) => pos,
            None => {
                self.table.indexes.push(IndexDef {
                    columns: columns.iter().map(|c| c.to_string()).collect(),
                    unique: false,
                });
                self.table.indexes.len() - 1
            }
        };
        &mut self.table.indexes[pos]
    }

    pub fn build(self) -> TableSchema {
        self.table
    }
}

/// All tables known to the application, keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaModel {
    tables: BTreeMap<String, TableSchema>,
}

impl SchemaModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `C`. Re-applying a configuration replaces its previous table,
    /// so applying the same one twice leaves the model unchanged.
    pub fn apply<C: EntityConfiguration>(&mut self) -> &mut Self {
        let mut builder = EntityBuilder::new(C::ENTITY);
        C::configure(&mut builder);
        let table = builder.build();

        self.tables.retain(|_, t| t.entity != table.entity);
        self.tables.insert(table.name.clone(), table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn table_for_entity(&self, entity: &str) -> Option<&TableSchema> {
        self.tables.values().find(|t| t.entity == entity)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    /// DDL for every table followed by its indexes, ordered by table name
    pub fn ddl_statements(&self) -> Vec<String> {
        let mut statements = Vec::new();
        for table in self.tables.values() {
            statements.push(table.create_table_sql());
            statements.extend(table.create_index_sql());
        }
        statements
    }
}
