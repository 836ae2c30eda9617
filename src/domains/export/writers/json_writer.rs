use crate::domains::element::ElementExportRow;
use crate::domains::export::types::ExportFormat;
use crate::domains::export::writer::{ExportWriter, ProgressObserver};
use crate::errors::ExportResult;

/// Pretty-printed array of element records; coordinates keep full precision
#[derive(Default)]
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ExportWriter for JsonWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn encode(
        &self,
        rows: &[ElementExportRow],
        progress: Option<&dyn ProgressObserver>,
    ) -> ExportResult<Vec<u8>> {
        if let Some(observer) = progress {
            observer.report(10);
        }

        let bytes = serde_json::to_vec_pretty(rows)?;

        if let Some(observer) = progress {
            observer.report(80);
        }
        Ok(bytes)
    }
}
