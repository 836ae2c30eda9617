use std::ffi::CString;
use std::os::raw::c_char;

use crate::ffi::error::{ErrorCode, FFIError};
use serde::Serialize;

pub mod error;
pub mod export;

/// Serialize `Ok(T)` or the `FFIError` to JSON and hand ownership of the C
/// string to the caller (free with `element_export_free`).
pub fn handle_json_result<F, T>(func: F) -> *mut c_char
where
    F: FnOnce() -> FFIResult<T>,
    T: Serialize,
{
    let json_string = match func() {
        Ok(value) => serde_json::to_string(&value),
        Err(ffi_error) => serde_json::to_string(&ffi_error),
    };

    let final_json = match json_string {
        Ok(s) => s,
        Err(e) => {
            // the caller must always be able to parse the response
            log::error!("[FFI] Serialization failed: {}", e);
            serde_json::json!({
                "code": ErrorCode::InternalError,
                "message": format!("Failed to serialize result: {}", e),
                "details": null,
            })
            .to_string()
        }
    };

    match CString::new(final_json) {
        Ok(c_string) => c_string.into_raw(),
        Err(e) => {
            log::error!("[FFI] Failed to create CString: {}", e);
            let error = FFIError::internal(format!("Failed to create CString: {}", e));
            serde_json::to_string(&error)
                .ok()
                .and_then(|json| CString::new(json).ok())
                .map_or(std::ptr::null_mut(), |cs| cs.into_raw())
        }
    }
}

pub use error::FFIResult;
