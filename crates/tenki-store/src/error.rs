//! Store-specific error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A forecast upsert referenced an area that was never seeded.
    /// This is a programming/seeding bug, not a recoverable condition.
    #[error("Unknown area: {0}")]
    UnknownArea(String),

    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

impl StoreError {
    /// Map a rusqlite error from a forecast write, turning a foreign
    /// key violation into `UnknownArea` for the offending code.
    pub(crate) fn from_write(err: rusqlite::Error, area_code: &str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(ffi, _)
                if ffi.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::UnknownArea(area_code.to_string())
            }
            _ => StoreError::Query(err),
        }
    }
}
