//! Error types for the database client

use meetslot_common::services::ServiceError;
use meetslot_common::{HttpStatusCode, MeetslotError};
use thiserror::Error;

/// Name reported in service errors raised by the booking store.
pub const SERVICE_NAME: &str = "database";

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// No row with the given id
    #[error("Booking {0} not found")]
    NotFound(i64),

    /// A stored value could not be turned back into a model
    #[error("Stored value could not be decoded: {0}")]
    DecodeError(String),
}

impl DbError {
    /// Classifies a failed statement, keeping unique violations apart.
    pub(crate) fn from_query(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            DbError::UniqueViolation(err.to_string())
        } else {
            DbError::QueryError(err.to_string())
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.is_unique_violation()
                || db.message().contains("UNIQUE constraint failed")
                || db.message().contains("duplicate key")
        }
        _ => false,
    }
}

impl HttpStatusCode for DbError {
    fn status_code(&self) -> u16 {
        match self {
            DbError::UniqueViolation(_) => 409,
            DbError::NotFound(_) => 404,
            _ => 500,
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::UniqueViolation(_) => ServiceError::conflict(SERVICE_NAME, err),
            DbError::NotFound(_) => ServiceError::rejected(SERVICE_NAME, err),
            _ => ServiceError::unavailable(SERVICE_NAME, err),
        }
    }
}

impl From<DbError> for MeetslotError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConfigError(message) | DbError::UrlError(message) => {
                MeetslotError::ConfigError(message)
            }
            DbError::UniqueViolation(message) => MeetslotError::ConflictError(message),
            other => MeetslotError::DatabaseError(other.to_string()),
        }
    }
}
