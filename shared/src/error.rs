//! Error types for the appointment intake Lambda.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while booking an appointment.
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration missing or unparsable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Body missing, not JSON, or failing validation
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Database unreachable or credentials rejected
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Insert or commit failed
    #[error("Storage error: {0}")]
    Storage(#[source] sqlx::Error),

    /// A database operation did not finish in time
    #[error("Timed out while {0}")]
    Timeout(&'static str),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MalformedInput(_) => 400,
            Error::Storage(e) if is_constraint_violation(e) => 409,
            Error::Connection(_) => 503,
            Error::Timeout("connecting") => 503,
            _ => 500,
        }
    }

    /// Stable identifier for the error kind, returned to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "configuration_error",
            Error::MalformedInput(_) => "malformed_input",
            Error::Connection(_) => "connection_error",
            Error::Timeout("connecting") => "connection_error",
            Error::Storage(_) | Error::Timeout(_) => "storage_error",
        }
    }

    /// Message safe to return to the caller.
    ///
    /// Client errors carry their detail; server-side failures stay generic
    /// and are only logged in full.
    pub fn public_message(&self) -> String {
        match self.status_code() {
            400 => self.to_string(),
            409 => "Appointment conflicts with an existing record".to_string(),
            503 => "Appointment service is temporarily unavailable".to_string(),
            _ => "Failed to book appointment".to_string(),
        }
    }
}

fn is_constraint_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => !matches!(db.kind(), ErrorKind::Other),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::DatabaseError;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct MySqlFailure(ErrorKind);

    impl fmt::Display for MySqlFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Duplicate entry 'Jane Doe-2024-05-01' for key 'appointments.uniq'")
        }
    }

    impl StdError for MySqlFailure {}

    impl DatabaseError for MySqlFailure {
        fn message(&self) -> &str {
            "Duplicate entry 'Jane Doe-2024-05-01' for key 'appointments.uniq'"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23000"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn storage_error(kind: ErrorKind) -> Error {
        Error::Storage(sqlx::Error::Database(Box::new(MySqlFailure(kind))))
    }

    #[test]
    fn test_constraint_violation_is_conflict() {
        let err = storage_error(ErrorKind::UniqueViolation);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.kind(), "storage_error");
        assert_eq!(
            err.public_message(),
            "Appointment conflicts with an existing record"
        );
        assert!(!err.public_message().contains("Duplicate entry"));
    }

    #[test]
    fn test_other_database_error_is_server_error() {
        let err = storage_error(ErrorKind::Other);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.kind(), "storage_error");
        assert_eq!(err.public_message(), "Failed to book appointment");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::MalformedInput("bad".into()).status_code(), 400);
        assert_eq!(Error::Config("DB_HOST not set".into()).status_code(), 500);
        assert_eq!(Error::Connection(sqlx::Error::PoolTimedOut).status_code(), 503);
        assert_eq!(Error::Storage(sqlx::Error::RowNotFound).status_code(), 500);
        assert_eq!(Error::Timeout("connecting").status_code(), 503);
        assert_eq!(Error::Timeout("inserting").status_code(), 500);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Error::Config("x".into()).kind(), "configuration_error");
        assert_eq!(Error::MalformedInput("x".into()).kind(), "malformed_input");
        assert_eq!(Error::Timeout("connecting").kind(), "connection_error");
        assert_eq!(Error::Timeout("inserting").kind(), "storage_error");
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = Error::Config("DB_PASSWORD not set".into());
        assert_eq!(err.public_message(), "Failed to book appointment");

        let err = Error::MalformedInput("missing field `date`".into());
        assert!(err.public_message().contains("missing field `date`"));
    }
}
