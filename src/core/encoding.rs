//! Label name encoding.
//!
//! Label names are written `application/x-www-form-urlencoded` (space as
//! `+`, everything outside `[A-Za-z0-9*-._]` percent-encoded) so they never
//! collide with the separators of the outcome log format.

use crate::core::error::{EvaluationError, Result};
use percent_encoding::percent_decode_str;

/// Encode a label name.
pub fn encode_label(label: &str) -> String {
    form_urlencoded::byte_serialize(label.as_bytes()).collect()
}

/// Decode an encoded label name.
pub fn decode_label(encoded: &str) -> Result<String> {
    let spaced = encoded.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| EvaluationError::format(format!("label '{}' is not valid UTF-8: {}", encoded, e)))
}
