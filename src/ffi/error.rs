use crate::errors::ExportError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for FFI boundary
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Success (no error)
    Success = 0,

    // General errors (1-99)
    Unknown = 1,
    InvalidArgument = 2,
    NullPointer = 3,
    InvalidUtf8 = 4,
    InternalError = 6,

    // Export errors (500-599)
    InvalidDestination = 500,
    SerializationFailure = 501,
    PartialWriteFailure = 502,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, *self as i32)
    }
}

/// Error type for FFI boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FFIError {
    /// Error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (JSON string)
    pub details: Option<String>,
}

impl fmt::Display for FFIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "{}: {} ({})", self.code, self.message, details)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for FFIError {}

impl FFIError {
    pub fn new(code: ErrorCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: &str, details: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            details: Some(details.to_string()),
        }
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn null_pointer(name: &str) -> Self {
        Self::new(ErrorCode::NullPointer, &format!("{} must not be null", name))
    }

    // Helper for internal errors
    pub fn internal(message: String) -> Self {
        Self::new(ErrorCode::InternalError, &message)
    }
}

impl From<ExportError> for FFIError {
    fn from(err: ExportError) -> Self {
        let message = err.to_string();
        match err {
            ExportError::InvalidDestination { path, .. } => Self::with_details(
                ErrorCode::InvalidDestination,
                &message,
                &serde_json::json!({ "path": path }).to_string(),
            ),
            ExportError::SerializationFailure(_) => {
                Self::new(ErrorCode::SerializationFailure, &message)
            }
            ExportError::PartialWriteFailure(_) => {
                Self::new(ErrorCode::PartialWriteFailure, &message)
            }
        }
    }
}

/// Result type for FFI functions
pub type FFIResult<T> = Result<T, FFIError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_destination_carries_path() {
        let err: FFIError = ExportError::InvalidDestination {
            path: "/readonly/out.csv".to_string(),
            message: "Permission denied".to_string(),
        }
        .into();

        assert_eq!(err.code, ErrorCode::InvalidDestination);
        assert_eq!(err.message, "Cannot write to /readonly/out.csv: Permission denied");
        assert_eq!(err.details.as_deref(), Some(r#"{"path":"/readonly/out.csv"}"#));
    }

    #[test]
    fn test_partial_write_code() {
        let err: FFIError = ExportError::from(zip::result::ZipError::FileNotFound).into();
        assert_eq!(err.code, ErrorCode::PartialWriteFailure);
        assert!(err.details.is_none());
    }

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::PartialWriteFailure as i32, 502);
        assert_eq!(ErrorCode::NullPointer.to_string(), "NullPointer (3)");
    }
}
