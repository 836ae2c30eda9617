//! Single-sheet OOXML workbook writer.
//!
//! The package is assembled in memory (five parts) and handed back as bytes;
//! nothing reaches the destination until every part has been written.

use crate::config::ExportConfig;
use crate::domains::element::{ElementExportRow, EXPORT_HEADERS};
use crate::domains::export::csv_record::format_coordinate;
use crate::domains::export::types::ExportFormat;
use crate::domains::export::writer::{ExportWriter, ProgressObserver, ProgressTracker};
use crate::errors::{ExportError, ExportResult};
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

pub const SHEET_NAME: &str = "Elements";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Spreadsheet cell. Absent coordinates are written as empty text cells.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(String),
}

impl Cell {
    fn coordinate(value: Option<f64>) -> Self {
        match value {
            Some(_) => Cell::Number(format_coordinate(value)),
            None => Cell::Text(String::new()),
        }
    }
}

pub struct XlsxWriter {
    config: ExportConfig,
}

impl XlsxWriter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    fn element_cells(row: &ElementExportRow) -> Vec<Cell> {
        row.text_fields()
            .iter()
            .map(|field| Cell::Text(field.to_string()))
            .chain(row.coordinates().into_iter().map(Cell::coordinate))
            .collect()
    }

    fn worksheet_xml(
        &self,
        rows: &[ElementExportRow],
        progress: Option<&dyn ProgressObserver>,
    ) -> ExportResult<String> {
        let mut tracker = ProgressTracker::new(progress, rows.len(), self.config.progress_interval);
        let mut xml = String::with_capacity((rows.len() + 1) * 640);

        xml.push_str(XML_DECLARATION);
        write!(xml, r#"<worksheet xmlns="{}"><sheetData>"#, MAIN_NS).map_err(ExportError::serialization)?;

        let header: Vec<Cell> = EXPORT_HEADERS.iter().map(|h| Cell::Text(h.to_string())).collect();
        append_row(&mut xml, 1, &header)?;

        for (index, row) in rows.iter().enumerate() {
            append_row(&mut xml, index + 2, &Self::element_cells(row))?;
            tracker.advance();
        }

        xml.push_str("</sheetData></worksheet>");
        Ok(xml)
    }
}

impl ExportWriter for XlsxWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Excel
    }

    fn encode(
        &self,
        rows: &[ElementExportRow],
        progress: Option<&dyn ProgressObserver>,
    ) -> ExportResult<Vec<u8>> {
        let worksheet = self.worksheet_xml(rows, progress)?;

        let parts: [(&str, String); 5] = [
            ("[Content_Types].xml", content_types_xml()),
            ("_rels/.rels", root_rels_xml()),
            ("xl/workbook.xml", workbook_xml()),
            ("xl/_rels/workbook.xml.rels", workbook_rels_xml()),
            ("xl/worksheets/sheet1.xml", worksheet),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (name, contents) in parts.iter() {
            zip.start_file(*name, options)?;
            zip.write_all(contents.as_bytes())
                .map_err(|e| ExportError::partial_write(format!("{}: {}", name, e)))?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

fn append_row(xml: &mut String, row_number: usize, cells: &[Cell]) -> ExportResult<()> {
    write!(xml, r#"<row r="{}">"#, row_number).map_err(ExportError::serialization)?;
    for (col, cell) in cells.iter().enumerate() {
        let reference = format!("{}{}", column_name(col), row_number);
        let written = match cell {
            Cell::Text(text) => write!(
                xml,
                r#"<c r="{}" t="str"><v>{}</v></c>"#,
                reference,
                escape_xml(text)
            ),
            Cell::Number(number) => write!(xml, r#"<c r="{}"><v>{}</v></c>"#, reference, number),
        };
        written.map_err(ExportError::serialization)?;
    }
    xml.push_str("</row>");
    Ok(())
}

/// Zero-based column index to spreadsheet letters (0 -> A, 26 -> AA)
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Escape markup characters. Characters XML 1.0 cannot carry, and literal
/// `_xHHHH_` sequences, use the OOXML `_xHHHH_` form.
fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let chars: Vec<char> = input.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                let _ = write!(out, "_x{:04X}_", c as u32);
            }
            '_' if looks_like_ooxml_escape(&chars[i..]) => out.push_str("_x005F_"),
            c => out.push(c),
        }
    }
    out
}

fn looks_like_ooxml_escape(chars: &[char]) -> bool {
    chars.len() >= 7
        && chars[1] == 'x'
        && chars[2..6].iter().all(|c| c.is_ascii_hexdigit())
        && chars[6] == '_'
}

fn content_types_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            "</Types>"
        ),
        XML_DECLARATION
    )
}

fn root_rels_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/>"#,
            "</Relationships>"
        ),
        XML_DECLARATION, REL_NS
    )
}

fn workbook_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<workbook xmlns="{}" xmlns:r="{}">"#,
            r#"<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>"#,
            "</workbook>"
        ),
        XML_DECLARATION, MAIN_NS, REL_NS, SHEET_NAME
    )
}

fn workbook_rels_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="{}/worksheet" Target="worksheets/sheet1.xml"/>"#,
            "</Relationships>"
        ),
        XML_DECLARATION, REL_NS
    )
}
