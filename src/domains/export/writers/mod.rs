pub mod csv_writer;
pub mod json_writer;
pub mod xlsx_writer;

pub use csv_writer::CsvWriter;
pub use json_writer::JsonWriter;
pub use xlsx_writer::{XlsxWriter, SHEET_NAME};
