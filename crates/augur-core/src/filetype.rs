//! Content-based file type validation.
//!
//! Uploads are classified by inspecting a bounded prefix of their bytes,
//! never the filename. Validation borrows the buffer, so the same untouched
//! bytes flow on to the preprocessor afterwards.

use crate::category::ModelCategory;
use crate::error::{AugurError, AugurResult};

/// Upper bound on how much of the upload the sniffer inspects.
pub const SNIFF_LEN: usize = 2048;

/// MIME type reported when the content matches no known signature.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Detect the MIME type of `bytes` from content.
///
/// Returns [`UNKNOWN_MIME`] when no signature matches.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    let prefix = &bytes[..bytes.len().min(SNIFF_LEN)];
    match infer::get(prefix) {
        Some(kind) => canonical_mime(kind.mime_type()),
        None => UNKNOWN_MIME,
    }
}

/// Check that the sniffed type of `bytes` is allowed for `category`.
///
/// Returns the detected MIME type on success. On failure the error names the
/// detected type and the category's allow-list.
pub fn validate(bytes: &[u8], category: ModelCategory) -> AugurResult<&'static str> {
    let detected = sniff_mime(bytes);
    if category.allowed_mime_types().contains(&detected) {
        Ok(detected)
    } else {
        Err(AugurError::UnsupportedFileType {
            detected: detected.to_string(),
            category,
            allowed: category.allowed_mime_types().to_vec(),
        })
    }
}

/// Map sniffer alias spellings onto the types the allow-lists document.
fn canonical_mime(mime: &'static str) -> &'static str {
    match mime {
        "audio/x-wav" => "audio/wav",
        "image/jpg" => "image/jpeg",
        other => other,
    }
}
