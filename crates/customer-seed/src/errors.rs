use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Connection error: timed out after {}s", .0.as_secs())]
    ConnectTimeout(Duration),

    #[error("Schema error: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("Schema error: table {table} is incompatible: {detail}")]
    SchemaMismatch { table: String, detail: String },

    #[error("Insert error: {0}")]
    Insert(#[source] sqlx::Error),
}

impl SeedError {
    /// Returns true for failures that happen before any database I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SeedError::Configuration(_))
    }

    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            SeedError::Connection(_) | SeedError::ConnectTimeout(_)
        )
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, SeedError::Schema(_) | SeedError::SchemaMismatch { .. })
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, SeedError::Insert(_))
    }

    /// Returns true when an insert failed on a unique or primary key constraint.
    pub fn is_duplicate_key(&self) -> bool {
        match self {
            SeedError::Insert(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}
