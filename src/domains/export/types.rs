use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name suggested before the user picks a destination
pub const DEFAULT_FILE_NAME: &str = "RevitAllElements.csv";

/// Export formats supported by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    /// Get file extension for this format
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }

    /// Format implied by a path's extension; anything unknown is CSV
    pub fn from_extension(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => ExportFormat::Json,
            Some("xlsx") => ExportFormat::Excel,
            _ => ExportFormat::Csv,
        }
    }

    /// Replace the extension of `path` with this format's extension
    pub fn ensure_extension(&self, path: &Path) -> PathBuf {
        if path.file_name().is_none() {
            return path.to_path_buf();
        }
        path.with_extension(self.file_extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
            ExportFormat::Excel => "Excel",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "excel" | "xlsx" => Ok(Self::Excel),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// What the caller wants exported and where
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub destination_path: PathBuf,
    /// `None` exports every row; uncategorized rows pass any selection
    #[serde(default)]
    pub selected_categories: Option<Vec<String>>,
}

/// Export metadata for completed exports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub format: ExportFormat,
    pub destination: PathBuf,
    pub rows_written: usize,
    pub bytes_written: usize,
    pub duration_ms: u64,
    pub exported_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_round_trip() {
        for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Excel] {
            let path = PathBuf::from(format!("out.{}", format.file_extension()));
            assert_eq!(ExportFormat::from_extension(&path), format);
        }
    }

    #[test]
    fn test_unknown_extension_is_csv() {
        assert_eq!(ExportFormat::from_extension(Path::new("out.txt")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_extension(Path::new("out")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_extension(Path::new("OUT.XLSX")), ExportFormat::Excel);
    }

    #[test]
    fn test_ensure_extension() {
        let path = Path::new("/home/me/Desktop/RevitAllElements.csv");
        assert_eq!(
            ExportFormat::Excel.ensure_extension(path),
            PathBuf::from("/home/me/Desktop/RevitAllElements.xlsx")
        );
        assert_eq!(
            ExportFormat::Json.ensure_extension(Path::new("export")),
            PathBuf::from("export.json")
        );
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("Excel".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert!("parquet".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{"format":"excel","destinationPath":"/tmp/a.xlsx"}"#;
        let request: ExportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.format, ExportFormat::Excel);
        assert!(request.selected_categories.is_none());
    }
}
