pub mod element;
pub mod export;

pub use element::{CategoryInfo, ElementExportRow, ExportStats};
pub use export::{ExportService, ExportServiceImpl};
