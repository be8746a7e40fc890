use thiserror::Error;

use crate::database::statement::StatementError;

/// Failures from the data access layer. Missing rows are not errors here.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    Connect(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Statement(#[from] StatementError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Connection-stage failures, as opposed to statement failures.
    pub fn is_connect(&self) -> bool {
        matches!(self, DatabaseError::Connect(_))
    }
}
