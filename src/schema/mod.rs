//! Schema introspection
//!
//! A [`SchemaReader`] answers two questions per named connection: which
//! tables exist, and what columns a table has in native column order.
//! Results are never cached; every call goes back to the database.

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(feature = "mysql")]
pub use mysql::MysqlSchemaReader;

use crate::error::SchemaError;

/// Role a column plays in an index, as reported by `DESCRIBE`'s `Key` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyRole {
    Primary,
    Unique,
    Multiple,
    #[default]
    None,
}

impl KeyRole {
    pub fn from_describe(key: &str) -> Self {
        match key.trim() {
            "PRI" => KeyRole::Primary,
            "UNI" => KeyRole::Unique,
            "MUL" => KeyRole::Multiple,
            _ => KeyRole::None,
        }
    }
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: String,
    pub nullable: bool,
    pub key: KeyRole,
}

impl ColumnDescriptor {
    /// Plain column with no key role
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: String::new(),
            nullable: true,
            key: KeyRole::None,
        }
    }

    /// Column flagged as (part of) the primary key
    pub fn primary(name: impl Into<String>) -> Self {
        Self {
            nullable: false,
            key: KeyRole::Primary,
            ..Self::new(name)
        }
    }

    pub fn with_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.key == KeyRole::Primary
    }
}

/// Read-only access to table and column metadata for named connections
pub trait SchemaReader {
    /// List the tables of `connection`
    fn list_tables(&mut self, connection: &str) -> Result<Vec<String>, SchemaError>;

    /// Describe the columns of `table` on `connection`, in native column order
    fn describe_columns(
        &mut self,
        connection: &str,
        table: &str,
    ) -> Result<Vec<ColumnDescriptor>, SchemaError>;
}
