//! MySQL schema introspection over Diesel connection pools.

use diesel::mysql::MysqlConnection;
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::sql_types::Text;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::time::Duration;

use super::{ColumnDescriptor, KeyRole, SchemaReader};
use crate::config::{ConnectionConfig, PoolSettings};
use crate::error::SchemaError;

pub type Pool = r2d2::Pool<ConnectionManager<MysqlConnection>>;
pub type PooledConnection = r2d2::PooledConnection<ConnectionManager<MysqlConnection>>;

/// Same rows as `SHOW TABLES`, under a column name Diesel can bind by name
const LIST_TABLES_SQL: &str = "SELECT TABLE_NAME AS table_name \
     FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = DATABASE() \
     ORDER BY TABLE_NAME";

#[derive(QueryableByName)]
struct TableRow {
    #[diesel(sql_type = Text)]
    table_name: String,
}

/// The `DESCRIBE <table>` columns we care about
#[derive(QueryableByName)]
struct DescribeRow {
    #[diesel(sql_type = Text, column_name = Field)]
    field: String,
    #[diesel(sql_type = Text, column_name = Type)]
    column_type: String,
    #[diesel(sql_type = Text, column_name = Null)]
    null: String,
    #[diesel(sql_type = Text, column_name = Key)]
    key: String,
}

impl From<DescribeRow> for ColumnDescriptor {
    fn from(row: DescribeRow) -> Self {
        ColumnDescriptor {
            name: row.field,
            column_type: row.column_type,
            nullable: row.null.eq_ignore_ascii_case("YES"),
            key: KeyRole::from_describe(&row.key),
        }
    }
}

/// Reads schema metadata from the configured MySQL connections.
///
/// One pool per connection name is built lazily on first use and kept for
/// the lifetime of the reader.
pub struct MysqlSchemaReader {
    connections: IndexMap<String, ConnectionConfig>,
    settings: PoolSettings,
    pools: HashMap<String, Pool>,
}

impl MysqlSchemaReader {
    pub fn new(connections: IndexMap<String, ConnectionConfig>, settings: PoolSettings) -> Self {
        Self {
            connections,
            settings,
            pools: HashMap::new(),
        }
    }

    fn build_pool(&self, name: &str) -> Result<Pool, SchemaError> {
        let config = self
            .connections
            .get(name)
            .ok_or_else(|| SchemaError::connection(name, "connection is not configured"))?;
        let database_url = config.resolve_url(name)?;
        if self.settings.connection_timeout_secs == 0 {
            return Err(SchemaError::connection(name, "connection timeout must be positive"));
        }

        tracing::debug!("Opening pool for connection '{}'", name);
        let manager = ConnectionManager::<MysqlConnection>::new(database_url);

        r2d2::Pool::builder()
            .max_size(self.settings.max_connections.max(1))
            .connection_timeout(Duration::from_secs(self.settings.connection_timeout_secs))
            .build(manager)
            .map_err(|e| SchemaError::connection(name, e))
    }

    fn get_connection(&mut self, name: &str) -> Result<PooledConnection, SchemaError> {
        if !self.pools.contains_key(name) {
            let pool = self.build_pool(name)?;
            self.pools.insert(name.to_string(), pool);
        }

        let pool = self
            .pools
            .get(name)
            .ok_or_else(|| SchemaError::connection(name, "connection pool missing"))?;
        pool.get().map_err(|e| SchemaError::connection(name, e))
    }
}

impl SchemaReader for MysqlSchemaReader {
    fn list_tables(&mut self, connection: &str) -> Result<Vec<String>, SchemaError> {
        let mut conn = self.get_connection(connection)?;
        tracing::debug!("{} [{}]", LIST_TABLES_SQL, connection);

        let rows: Vec<TableRow> = diesel::sql_query(LIST_TABLES_SQL)
            .load(&mut conn)
            .map_err(|e| SchemaError::connection(connection, e))?;

        Ok(rows.into_iter().map(|row| row.table_name).collect())
    }

    fn describe_columns(
        &mut self,
        connection: &str,
        table: &str,
    ) -> Result<Vec<ColumnDescriptor>, SchemaError> {
        let mut conn = self.get_connection(connection)?;
        let query = format!("DESCRIBE {}", quote_identifier(table));
        tracing::debug!("{} [{}]", query, connection);

        let rows: Vec<DescribeRow> = diesel::sql_query(query)
            .load(&mut conn)
            .map_err(|e| SchemaError::connection(connection, e))?;

        Ok(rows.into_iter().map(ColumnDescriptor::from).collect())
    }
}

/// Backtick-quote a MySQL identifier
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("orders"), "`orders`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_describe_row_conversion() {
        let column = ColumnDescriptor::from(DescribeRow {
            field: "id".to_string(),
            column_type: "int unsigned".to_string(),
            null: "NO".to_string(),
            key: "PRI".to_string(),
        });
        assert!(column.is_primary_key());
        assert!(!column.nullable);
        assert_eq!(column.column_type, "int unsigned");
    }

    #[test]
    fn test_zero_timeout_is_reported_not_panicked() {
        let mut connections = IndexMap::new();
        connections.insert("main".to_string(), ConnectionConfig::from_url("mysql://localhost/shop"));
        let settings = PoolSettings { max_connections: 1, connection_timeout_secs: 0 };
        let mut reader = MysqlSchemaReader::new(connections, settings);

        let err = reader.list_tables("main").unwrap_err();
        assert_eq!(err.to_string(), "connection 'main': connection timeout must be positive");
    }

    #[test]
    fn test_unknown_connection_fails_without_network() {
        let mut reader = MysqlSchemaReader::new(IndexMap::new(), PoolSettings::default());
        let err = reader.list_tables("legacy").unwrap_err();
        assert_eq!(err.to_string(), "connection 'legacy': connection is not configured");
    }
}
