//! Error types for schema introspection and generation runs.

use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to a database connection.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Connection unknown, unreachable, or an introspection query was rejected
    #[error("connection '{connection}': {message}")]
    Connection { connection: String, message: String },
}

impl SchemaError {
    pub fn connection(connection: impl Into<String>, message: impl ToString) -> Self {
        SchemaError::Connection {
            connection: connection.into(),
            message: message.to_string(),
        }
    }
}

/// Error type for a generation run
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GeneratorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }
}
