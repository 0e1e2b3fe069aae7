//! Identifier normalization shared by the mapper and the writer.

/// Marker used when a positive-response SID cannot be derived.
pub const NEGATIVE_RESPONSE_SID: &str = "0x7F";

/// Canonical `0x`-prefixed uppercase form of a hex identifier.
///
/// Prefixed values are upper-cased behind a lowercase `0x`. Unprefixed
/// values are prefixed only when every character is a hex digit, so `"100"`
/// becomes `"0x100"`. Anything else is returned unchanged.
pub fn normalize_hex(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(digits) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return format!("0x{}", digits.to_ascii_uppercase());
    }
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return format!("0x{}", trimmed.to_ascii_uppercase());
    }
    value.to_string()
}

/// [`normalize_hex`] for request SIDs; an empty SID becomes `0x00`.
pub fn normalize_service_id(sid: &str) -> String {
    if sid.trim().is_empty() {
        return "0x00".to_string();
    }
    normalize_hex(sid)
}

/// Request SID + 0x40, or [`NEGATIVE_RESPONSE_SID`] when the request SID is
/// not a hex number.
pub fn positive_response_id(request_sid: &str) -> String {
    match parse_hex(request_sid) {
        Some(sid) => format!("0x{:02X}", sid + 0x40),
        None => {
            log::debug!("no positive response for request SID '{request_sid}'");
            NEGATIVE_RESPONSE_SID.to_string()
        }
    }
}

/// Value of a hex string with or without `0x` prefix.
pub fn parse_hex(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).ok().filter(|v| *v <= u32::MAX - 0x40)
}

/// Hex identifier without its `0x` prefix, e.g. for `DOP.DID_F190`.
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}
