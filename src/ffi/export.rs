// src/ffi/export.rs
// ============================================================================
// C ABI for the host plugin. Rows arrive as a JSON array of flat records (the
// same shape the JSON writer produces); every function answers with a JSON
// string: the value on success or an `FFIError` object on failure.
//
// Memory ownership: any *mut c_char returned from Rust must be released with
// `element_export_free`.
// ============================================================================

use crate::config::ExportConfig;
use crate::domains::element::ElementExportRow;
use crate::domains::export::service::{ExportService, ExportServiceImpl};
use crate::domains::export::types::ExportRequest;
use crate::ffi::error::{ErrorCode, FFIError, FFIResult};
use crate::ffi::handle_json_result;
use serde::Deserialize;
use std::ffi::{c_char, CStr, CString};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn init_logging() {
    // already initialised by the host is fine
    let _ = env_logger::try_init();
}

/// Borrow a C string argument as UTF-8
unsafe fn read_c_str<'a>(ptr: *const c_char, name: &str) -> FFIResult<&'a str> {
    if ptr.is_null() {
        return Err(FFIError::null_pointer(name));
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().map_err(|e| {
        FFIError::new(ErrorCode::InvalidUtf8, &format!("{} is not valid UTF-8: {}", name, e))
    })
}

/// Helper to parse JSON payload
fn parse_json_payload<T: serde::de::DeserializeOwned>(json_str: &str) -> FFIResult<T> {
    serde_json::from_str(json_str)
        .map_err(|e| FFIError::invalid_argument(&format!("Invalid JSON payload: {}", e)))
}

fn build_export_service() -> ExportServiceImpl {
    ExportServiceImpl::new(ExportConfig::from_env())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WritePayload {
    rows: Vec<ElementExportRow>,
    #[serde(flatten)]
    request: ExportRequest,
}

// ============================================================================
// EXPORTED FUNCTIONS
// ============================================================================

/// Category checklist for a row set, most populous first.
///
/// # Safety
/// `rows_json` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn element_export_category_summary(rows_json: *const c_char) -> *mut c_char {
    init_logging();
    handle_json_result(|| unsafe {
        let rows: Vec<ElementExportRow> = parse_json_payload(read_c_str(rows_json, "rows_json")?)?;
        Ok(build_export_service().category_summary(&rows))
    })
}

/// Stats for a row set; `selected_json` is a JSON array of category names or
/// null for no filter.
///
/// # Safety
/// Both arguments must be null or valid NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn element_export_stats(
    rows_json: *const c_char,
    selected_json: *const c_char,
) -> *mut c_char {
    init_logging();
    handle_json_result(|| unsafe {
        let rows: Vec<ElementExportRow> = parse_json_payload(read_c_str(rows_json, "rows_json")?)?;
        let selected: Option<Vec<String>> = if selected_json.is_null() {
            None
        } else {
            parse_json_payload(read_c_str(selected_json, "selected_json")?)?
        };
        Ok(build_export_service().stats(&rows, selected.as_deref()))
    })
}

/// Filter, encode and persist rows; answers with the export metadata.
///
/// # Safety
/// `request_json` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn element_export_write(request_json: *const c_char) -> *mut c_char {
    init_logging();
    handle_json_result(|| unsafe {
        let payload: WritePayload = parse_json_payload(read_c_str(request_json, "request_json")?)?;
        log::debug!(
            "[FFI] element_export_write: {} rows as {}",
            payload.rows.len(),
            payload.request.format
        );
        build_export_service()
            .export(&payload.rows, &payload.request, None)
            .map_err(FFIError::from)
    })
}

/// Free memory allocated by the export functions.
///
/// # Safety
/// `ptr` must come from one of the functions above and be freed only once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn element_export_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    const ROWS: &str = r#"[
        {"Id":"1","Category":"Walls","LocationType":"Point","X":1.0,"Y":2.0,"Z":3.0},
        {"Id":"2","Category":"Walls","LocationType":"None"},
        {"Id":"3","Category":"Doors","LocationType":"Curve-Unbound"}
    ]"#;

    fn call(ptr: *mut c_char) -> Value {
        assert!(!ptr.is_null());
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_owned();
        unsafe { element_export_free(ptr) };
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_category_summary() {
        let rows = CString::new(ROWS).unwrap();
        let value = call(unsafe { element_export_category_summary(rows.as_ptr()) });

        assert_eq!(value[0]["name"], "Walls");
        assert_eq!(value[0]["elementCount"], 2);
        assert_eq!(value[0]["isSelected"], true);
        assert_eq!(value[1]["name"], "Doors");
    }

    #[test]
    fn test_stats_with_selection() {
        let rows = CString::new(ROWS).unwrap();
        let selected = CString::new(r#"["Doors"]"#).unwrap();
        let value = call(unsafe { element_export_stats(rows.as_ptr(), selected.as_ptr()) });

        assert_eq!(value["totalElements"], 1);
        assert_eq!(value["curveLocations"], 1);
        assert_eq!(value["categoryCount"], 1);
    }

    #[test]
    fn test_stats_without_selection() {
        let rows = CString::new(ROWS).unwrap();
        let value = call(unsafe { element_export_stats(rows.as_ptr(), std::ptr::null()) });

        assert_eq!(value["totalElements"], 3);
        assert_eq!(value["pointLocations"], 1);
        assert_eq!(value["noLocations"], 1);
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("out.csv");
        let request = serde_json::json!({
            "rows": serde_json::from_str::<Value>(ROWS).unwrap(),
            "format": "csv",
            "destinationPath": destination,
            "selectedCategories": ["Walls"],
        });
        let request = CString::new(request.to_string()).unwrap();

        let value = call(unsafe { element_export_write(request.as_ptr()) });

        assert_eq!(value["rowsWritten"], 2);
        let text = std::fs::read_to_string(&destination).unwrap();
        assert!(text.starts_with("Id,Category,"));
    }

    #[test]
    fn test_write_to_missing_directory() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("missing").join("out.json");
        let request = serde_json::json!({
            "rows": [],
            "format": "json",
            "destinationPath": destination,
        });
        let request = CString::new(request.to_string()).unwrap();

        let value = call(unsafe { element_export_write(request.as_ptr()) });

        assert_eq!(value["code"], "InvalidDestination");
    }

    #[test]
    fn test_rejects_inconsistent_row() {
        let rows = CString::new(r#"[{"Id":"1","LocationType":"Point","X":1.0}]"#).unwrap();
        let value = call(unsafe { element_export_category_summary(rows.as_ptr()) });

        assert_eq!(value["code"], "InvalidArgument");
    }

    #[test]
    fn test_null_pointer() {
        let value = call(unsafe { element_export_write(std::ptr::null()) });
        assert_eq!(value["code"], "NullPointer");
    }
}
