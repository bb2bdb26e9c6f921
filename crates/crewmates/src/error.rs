//! Error types for crewmates.
//!
//! This module defines all error types used throughout the crewmates crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors collected from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    /// Look up the message reported for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

/// The main error type for crewmates operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed outside of a store operation.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A store operation failed.
    #[error("failed to {operation}")]
    Store {
        /// The operation that failed, e.g. "fetch crewmates".
        operation: &'static str,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// No crewmate exists with the given id.
    #[error("crewmate not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    // === Validation Errors ===
    /// Form input failed validation.
    #[error("invalid crewmate: {0}")]
    Validation(FieldErrors),

    /// An import entry failed validation; the whole batch is rejected.
    #[error("invalid crewmate at index {index}: {message}")]
    ImportEntry {
        /// Index of the first offending entry.
        index: usize,
        /// Description of the problem.
        message: String,
    },

    /// An import file does not have the expected shape.
    #[error("invalid import file: {message}")]
    ImportFormat {
        /// Description of the problem.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to serialize configuration for saving.
    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for crewmates operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a store operation error.
    #[must_use]
    pub fn store(operation: &'static str, source: rusqlite::Error) -> Self {
        Self::Store { operation, source }
    }

    /// Create a not-found error for the given id.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an import error for the entry at `index`.
    #[must_use]
    pub fn import_entry(index: usize, message: impl Into<String>) -> Self {
        Self::ImportEntry {
            index,
            message: message.into(),
        }
    }

    /// Create an import error about the batch as a whole.
    #[must_use]
    pub fn import_batch(message: impl Into<String>) -> Self {
        Self::ImportFormat {
            message: message.into(),
        }
    }

    /// Check if this error indicates a missing crewmate.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was raised before any store call was attempted.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::ImportEntry { .. } | Self::ImportFormat { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("abc");
        assert_eq!(err.to_string(), "crewmate not found: abc");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_store_error_is_generic() {
        let err = Error::store("fetch crewmates", rusqlite::Error::InvalidQuery);
        assert_eq!(err.to_string(), "failed to fetch crewmates");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_import_entry_display() {
        let err = Error::import_entry(3, "Missing or invalid name");
        assert_eq!(
            err.to_string(),
            "invalid crewmate at index 3: Missing or invalid name"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_import_batch_display() {
        let err = Error::import_batch("Expected an array of crewmates");
        assert_eq!(
            err.to_string(),
            "invalid import file: Expected an array of crewmates"
        );
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let errors = FieldErrors(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("speed", "Speed must be between 0 and 100"),
        ]);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("color"), None);

        let err = Error::Validation(errors);
        let msg = err.to_string();
        assert!(msg.contains("name: Name is required"));
        assert!(msg.contains("speed: Speed must be between 0 and 100"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "language must not be empty".to_string(),
        };
        assert!(err.to_string().contains("language"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_database_open_error_display() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err = Error::DatabaseOpen {
                path: PathBuf::from("/nonexistent/path/db.sqlite"),
                source: sqlite_err,
            };
            assert!(err.to_string().contains("/nonexistent/path/db.sqlite"));
        }
    }
}
