use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

/// Store-level failures, classified once from the driver's error codes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no matching row")]
    NotFound,

    #[error("foreign key constraint failed")]
    ForeignKeyViolation,

    #[error("unique constraint failed: {0}")]
    UniqueViolation(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("sqlite error: {0}")]
    Driver(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
                match e.extended_code {
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreError::ForeignKeyViolation,
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        StoreError::UniqueViolation(msg.clone().unwrap_or_default())
                    }
                    _ => StoreError::Driver(err.to_string()),
                }
            }
            rusqlite::Error::SqliteFailure(e, _)
                if matches!(
                    e.code,
                    ErrorCode::DatabaseBusy
                        | ErrorCode::DatabaseLocked
                        | ErrorCode::CannotOpen
                        | ErrorCode::SystemIoFailure
                ) =>
            {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Driver(err.to_string()),
        }
    }
}
