use crate::config::ExportConfig;
use crate::domains::element::{CategoryInfo, ElementExportRow, ExportStats};
use crate::domains::export::aggregation::{calculate_stats, get_category_summary, stats_for_selection};
use crate::domains::export::filter::filter_by_categories;
use crate::domains::export::types::{ExportMetadata, ExportRequest};
use crate::domains::export::writer::{ProgressObserver, WriterFactory};
use crate::errors::ExportResult;
use std::borrow::Cow;

/// Entry points used by the host UI
pub trait ExportService {
    /// Categories for the filter checklist, all selected
    fn category_summary(&self, rows: &[ElementExportRow]) -> Vec<CategoryInfo>;

    /// Counts for the stats panel; `None` means no filter applied
    fn stats(&self, rows: &[ElementExportRow], selected: Option<&[String]>) -> ExportStats;

    /// Filter by the request's selection and write the chosen format
    fn export(
        &self,
        rows: &[ElementExportRow],
        request: &ExportRequest,
        progress: Option<&dyn ProgressObserver>,
    ) -> ExportResult<ExportMetadata>;
}

pub struct ExportServiceImpl {
    config: ExportConfig,
}

impl ExportServiceImpl {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }
}

impl Default for ExportServiceImpl {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl ExportService for ExportServiceImpl {
    fn category_summary(&self, rows: &[ElementExportRow]) -> Vec<CategoryInfo> {
        get_category_summary(rows)
    }

    fn stats(&self, rows: &[ElementExportRow], selected: Option<&[String]>) -> ExportStats {
        match selected {
            Some(selected) => stats_for_selection(rows, selected),
            None => calculate_stats(rows),
        }
    }

    fn export(
        &self,
        rows: &[ElementExportRow],
        request: &ExportRequest,
        progress: Option<&dyn ProgressObserver>,
    ) -> ExportResult<ExportMetadata> {
        let subset: Cow<'_, [ElementExportRow]> = match &request.selected_categories {
            Some(selected) => Cow::Owned(filter_by_categories(rows, selected)),
            None => Cow::Borrowed(rows),
        };

        log::info!(
            "Exporting {} of {} elements as {} to {}",
            subset.len(),
            rows.len(),
            request.format,
            request.destination_path.display()
        );

        let writer = WriterFactory::create_writer(request.format, &self.config);
        match writer.write(&subset, &request.destination_path, progress) {
            Ok(metadata) => {
                log::info!(
                    "Export completed: {} rows, {} bytes in {} ms",
                    metadata.rows_written,
                    metadata.bytes_written,
                    metadata.duration_ms
                );
                Ok(metadata)
            }
            Err(e) => {
                log::error!("Export to {} failed: {}", request.destination_path.display(), e);
                Err(e)
            }
        }
    }
}
