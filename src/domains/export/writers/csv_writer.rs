use crate::config::ExportConfig;
use crate::domains::element::ElementExportRow;
use crate::domains::export::csv_record::CsvRecord;
use crate::domains::export::types::ExportFormat;
use crate::domains::export::writer::{ExportWriter, ProgressObserver, ProgressTracker};
use crate::errors::{ExportError, ExportResult};

/// Delimited-text writer: header record, then one record per row
pub struct CsvWriter {
    config: ExportConfig,
}

impl CsvWriter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }
}

impl ExportWriter for CsvWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn encode(
        &self,
        rows: &[ElementExportRow],
        progress: Option<&dyn ProgressObserver>,
    ) -> ExportResult<Vec<u8>> {
        let mut tracker = ProgressTracker::new(progress, rows.len(), self.config.progress_interval);

        let mut buffer = Vec::with_capacity((rows.len() + 1) * 96);
        {
            let mut wtr = csv::WriterBuilder::new()
                .delimiter(b',')
                .quote(b'"')
                .terminator(self.config.line_ending.terminator())
                .from_writer(&mut buffer);

            wtr.write_record(ElementExportRow::headers())
                .map_err(ExportError::serialization)?;

            for row in rows {
                wtr.write_record(&row.to_csv())
                    .map_err(ExportError::serialization)?;
                tracker.advance();
            }

            wtr.flush().map_err(ExportError::serialization)?;
        }

        Ok(buffer)
    }
}
