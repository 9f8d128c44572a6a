//! Plain-text uploads.

use gchat_core::error::DocumentError;

/// Decode bytes as UTF-8. Invalid sequences are an error, never replaced.
pub fn decode_utf8(bytes: &[u8]) -> Result<String, DocumentError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| DocumentError::Decode(e.to_string()))
}
