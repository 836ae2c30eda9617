pub mod types;
pub mod ingest;

pub use types::{
    CategoryInfo, ElementExportRow, ElementRecord, ExportStats, Location, LocationKind, Point3,
    Segment3, EXPORT_HEADERS,
};
pub use ingest::{ingest, RawElement, RawLocation, RawXyz, FEET_TO_METERS};
