use crate::domains::element::{ElementExportRow, EXPORT_HEADERS};

/// Trait for types that can be exported to CSV
pub trait CsvRecord {
    /// Get CSV headers for this type
    fn headers() -> Vec<&'static str>;

    /// Convert to CSV row; quoting is left to the csv writer
    fn to_csv(&self) -> Vec<String>;
}

/// Quote a field when it contains a comma, a double quote, CR or LF.
/// Inner quotes are doubled. Empty stays empty. Matches the quoting
/// `csv::Writer` applies with its default `QuoteStyle::Necessary`.
pub fn escape_csv(input: &str) -> String {
    if input.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", input.replace('"', "\"\""))
    } else {
        input.to_string()
    }
}

/// Fixed-point with 4 fractional digits, empty when absent
pub fn format_coordinate(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_default()
}

impl CsvRecord for ElementExportRow {
    fn headers() -> Vec<&'static str> {
        EXPORT_HEADERS.to_vec()
    }

    fn to_csv(&self) -> Vec<String> {
        self.text_fields()
            .iter()
            .map(|field| field.to_string())
            .chain(self.coordinates().into_iter().map(format_coordinate))
            .collect()
    }
}
