use serde::{Deserialize, Serialize};
use std::env;

/// Rows between two progress reports of the row-by-row writers
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

const PROGRESS_INTERVAL_VAR: &str = "ELEMENT_EXPORT_PROGRESS_INTERVAL";
const LINE_ENDING_VAR: &str = "ELEMENT_EXPORT_LINE_ENDING";

/// Record terminator used by the delimited-text writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineEnding {
    #[default]
    Platform,
    Lf,
    CrLf,
}

impl LineEnding {
    /// Record terminator for `csv::WriterBuilder`
    pub fn terminator(&self) -> csv::Terminator {
        match self {
            LineEnding::Platform if cfg!(windows) => csv::Terminator::CRLF,
            LineEnding::Platform | LineEnding::Lf => csv::Terminator::Any(b'\n'),
            LineEnding::CrLf => csv::Terminator::CRLF,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "platform" => Some(LineEnding::Platform),
            "lf" => Some(LineEnding::Lf),
            "crlf" => Some(LineEnding::CrLf),
            _ => None,
        }
    }
}

/// Writer settings shared by every export format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub progress_interval: usize,
    pub line_ending: LineEnding,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            line_ending: LineEnding::Platform,
        }
    }
}

impl ExportConfig {
    /// Load overrides from `ELEMENT_EXPORT_PROGRESS_INTERVAL` and
    /// `ELEMENT_EXPORT_LINE_ENDING`. Unparseable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(PROGRESS_INTERVAL_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(interval) if interval > 0 => config.progress_interval = interval,
                _ => log::warn!(
                    "Ignoring {}={:?}, expected a positive integer",
                    PROGRESS_INTERVAL_VAR,
                    raw
                ),
            }
        }

        if let Some(raw) = lookup(LINE_ENDING_VAR) {
            match LineEnding::parse(&raw) {
                Some(ending) => config.line_ending = ending,
                None => log::warn!(
                    "Ignoring {}={:?}, expected platform, lf or crlf",
                    LINE_ENDING_VAR,
                    raw
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = ExportConfig::from_lookup(|_| None);
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.progress_interval, 100);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = ExportConfig::from_lookup(lookup_from(&[
            ("ELEMENT_EXPORT_PROGRESS_INTERVAL", "250"),
            ("ELEMENT_EXPORT_LINE_ENDING", "CRLF"),
        ]));
        assert_eq!(config.progress_interval, 250);
        assert_eq!(config.line_ending, LineEnding::CrLf);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ExportConfig::from_lookup(lookup_from(&[
            ("ELEMENT_EXPORT_PROGRESS_INTERVAL", "0"),
            ("ELEMENT_EXPORT_LINE_ENDING", "semicolon"),
        ]));
        assert_eq!(config, ExportConfig::default());
    }

    #[test]
    fn test_line_ending_terminators() {
        assert_eq!(LineEnding::Lf.terminator(), csv::Terminator::Any(b'\n'));
        assert_eq!(LineEnding::CrLf.terminator(), csv::Terminator::CRLF);
        if cfg!(windows) {
            assert_eq!(LineEnding::Platform.terminator(), csv::Terminator::CRLF);
        } else {
            assert_eq!(LineEnding::Platform.terminator(), csv::Terminator::Any(b'\n'));
        }
    }
}
