// Public modules
pub mod config;
pub mod domains;
pub mod errors;
pub mod ffi;

pub use config::{ExportConfig, LineEnding};
pub use domains::element::{
    ingest, CategoryInfo, ElementExportRow, ExportStats, Location, LocationKind, Point3,
    RawElement, Segment3,
};
pub use domains::export::{
    calculate_stats, filter_by_categories, get_category_summary, ExportFormat, ExportMetadata,
    ExportRequest, ExportService, ExportServiceImpl, ProgressObserver,
};
pub use errors::{ExportError, ExportResult};
