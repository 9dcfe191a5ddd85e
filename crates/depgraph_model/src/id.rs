//! Hex identifier normalization.
//!
//! Trace ids are 64 or 128 bits, span ids are 64 bits. Both travel as
//! lower-hex strings with no prefix. Short ids are left-padded with zeros.

use crate::error::{Error, Result};

/// Hex characters in a 64-bit identifier.
pub const ID_64_LEN: usize = 16;

/// Hex characters in a 128-bit identifier.
pub const ID_128_LEN: usize = 32;

/// Normalizes a trace id to 16 or 32 lower-hex characters.
///
/// A 32-character id whose upper 64 bits are zero is shortened to 16
/// characters. Ids of up to 16 characters are padded to 16, longer ones to 32.
///
/// # Errors
///
/// Returns `Error::InvalidId` if the id is empty, longer than 32 characters,
/// not hex, or all zeros.
pub fn normalize_trace_id(trace_id: &str) -> Result<String> {
    let hex = lower_hex("traceId", trace_id, ID_128_LEN)?;
    if hex.bytes().all(|b| b == b'0') {
        return Err(Error::invalid_id("traceId", trace_id, "all zeros"));
    }

    let normalized = match hex.len() {
        ID_64_LEN => hex,
        ID_128_LEN if is_zero(&hex[..ID_64_LEN]) => hex[ID_64_LEN..].to_string(),
        ID_128_LEN => hex,
        len if len < ID_64_LEN => pad_left(&hex, ID_64_LEN),
        _ => pad_left(&hex, ID_128_LEN),
    };
    Ok(normalized)
}

/// Normalizes a span id to 16 lower-hex characters.
///
/// # Errors
///
/// Returns `Error::InvalidId` if the id is empty, longer than 16 characters,
/// not hex, or all zeros.
pub fn normalize_span_id(id: &str) -> Result<String> {
    let hex = lower_hex("id", id, ID_64_LEN)?;
    if is_zero(&hex) {
        return Err(Error::invalid_id("id", id, "all zeros"));
    }
    Ok(pad_left(&hex, ID_64_LEN))
}

/// Normalizes a parent span id. An all-zero parent means "no parent".
///
/// # Errors
///
/// Returns `Error::InvalidId` if the id is empty, longer than 16 characters,
/// or not hex.
pub fn normalize_parent_id(parent_id: &str) -> Result<Option<String>> {
    let hex = lower_hex("parentId", parent_id, ID_64_LEN)?;
    if is_zero(&hex) {
        return Ok(None);
    }
    Ok(Some(pad_left(&hex, ID_64_LEN)))
}

/// Returns the low 64 bits of a normalized trace id.
///
/// A 32-character id loses its leading 16 characters; anything else is
/// returned unchanged. Distinct 128-bit ids sharing their low 64 bits
/// collide after this step.
pub fn low_64_bits(trace_id: &str) -> &str {
    if trace_id.len() == ID_128_LEN {
        trace_id.get(ID_64_LEN..).unwrap_or(trace_id)
    } else {
        trace_id
    }
}

/// Validates hex and length, returning the lower-cased id.
fn lower_hex(field: &'static str, value: &str, max_len: usize) -> Result<String> {
    if value.is_empty() {
        return Err(Error::invalid_id(field, value, "empty"));
    }
    if value.len() > max_len {
        return Err(Error::invalid_id(
            field,
            value,
            format!("length {} exceeds {max_len}", value.len()),
        ));
    }
    if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::invalid_id(
            field,
            value,
            "should be hex encoded with no prefix",
        ));
    }
    Ok(value.to_ascii_lowercase())
}

fn is_zero(hex: &str) -> bool {
    hex.bytes().all(|b| b == b'0')
}

fn pad_left(hex: &str, width: usize) -> String {
    format!("{hex:0>width$}")
}
