use serde::Serialize;
use thiserror::Error;

/// Export errors
///
/// None of these are retried by the core; the caller decides whether to
/// re-prompt for a different destination.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum ExportError {
    /// Destination could not be created, written or replaced
    #[error("Cannot write to {path}: {message}")]
    InvalidDestination { path: String, message: String },

    /// Row data could not be encoded
    #[error("Serialization error: {0}")]
    SerializationFailure(String),

    /// A part of a multi-part package (xlsx) could not be written
    #[error("Partial write failure: {0}")]
    PartialWriteFailure(String),
}

impl ExportError {
    pub fn invalid_destination(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        ExportError::InvalidDestination {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub fn serialization(err: impl std::fmt::Display) -> Self {
        ExportError::SerializationFailure(err.to_string())
    }

    pub fn partial_write(err: impl std::fmt::Display) -> Self {
        ExportError::PartialWriteFailure(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::SerializationFailure(err.to_string())
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::PartialWriteFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_invalid_destination_message() {
        let err = ExportError::invalid_destination(Path::new("/locked/out.csv"), "permission denied");
        assert_eq!(err.to_string(), "Cannot write to /locked/out.csv: permission denied");
    }

    #[test]
    fn test_serializes_with_variant_tag() {
        let err = ExportError::serialization("NaN in X");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["SerializationFailure"], "NaN in X");
    }

    #[test]
    fn test_zip_error_is_partial_write() {
        let err: ExportError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, ExportError::PartialWriteFailure(_)));
        assert!(err.to_string().starts_with("Partial write failure: "));
    }
}
