//! Column classification
//!
//! Derives the three facts the templates need from a table's column list:
//! primary key, audit timestamps, and the mass-assignable column list.

use crate::schema::ColumnDescriptor;

/// Audit columns managed by the framework rather than by callers
pub const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// First primary-key column in native order. Composite keys keep only
    /// their first column.
    pub primary_key: Option<String>,
    /// True if either `created_at` or `updated_at` exists
    pub has_timestamps: bool,
    /// Every column except the timestamp columns, in native order
    pub fillable_columns: Vec<String>,
}

impl Classification {
    /// Primary key name, or `""` when the table has none
    pub fn primary_key_name(&self) -> &str {
        self.primary_key.as_deref().unwrap_or("")
    }
}

pub fn is_timestamp_column(name: &str) -> bool {
    TIMESTAMP_COLUMNS.contains(&name)
}

/// Classify a table's columns in a single pass
pub fn classify(columns: &[ColumnDescriptor]) -> Classification {
    let mut classification = Classification::default();

    for column in columns {
        if column.is_primary_key() && classification.primary_key.is_none() {
            classification.primary_key = Some(column.name.clone());
        }

        if is_timestamp_column(&column.name) {
            classification.has_timestamps = true;
        } else {
            classification.fillable_columns.push(column.name.clone());
        }
    }

    classification
}
