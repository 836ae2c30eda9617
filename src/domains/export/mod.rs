pub mod types;
pub mod aggregation;
pub mod filter;
pub mod csv_record;
pub mod writer;
pub mod writers;
pub mod service;

pub use types::{ExportFormat, ExportMetadata, ExportRequest, DEFAULT_FILE_NAME};
pub use aggregation::{
    calculate_stats, get_category_summary, selected_category_names, set_all_selected,
    stats_for_selection,
};
pub use filter::filter_by_categories;
pub use csv_record::{escape_csv, format_coordinate, CsvRecord};
pub use writer::{write_atomically, ExportWriter, ProgressObserver, ProgressTracker, WriterFactory};
pub use writers::{CsvWriter, JsonWriter, XlsxWriter};
pub use service::{ExportService, ExportServiceImpl};
