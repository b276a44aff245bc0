//! Parse-on-read for list fields stored as JSON text
//!
//! Experience records carry some lists (highlights, payment methods) as
//! serialized strings. Decoding is total: bad or missing text yields the
//! field's fallback and is only logged at debug level.

use tracing::debug;

/// Payment method assumed when none can be decoded
pub const DEFAULT_PAYMENT_METHOD: &str = "onsite";

/// Decode a JSON array of strings. `None` when absent, blank, or not a string array.
pub fn parse_string_list(raw: Option<&str>) -> Option<Vec<String>> {
    let text = raw.map(str::trim).filter(|t| !t.is_empty())?;
    match serde_json::from_str::<Vec<String>>(text) {
        Ok(list) => Some(list),
        Err(e) => {
            debug!(error = %e, len = text.len(), "list_field_decode_failed");
            None
        }
    }
}

/// Highlights fall back to an empty list
pub fn parse_highlights(raw: Option<&str>) -> Vec<String> {
    parse_string_list(raw).unwrap_or_default()
}

/// Payment methods fall back to `["onsite"]`
pub fn parse_payment_methods(raw: Option<&str>) -> Vec<String> {
    parse_string_list(raw).unwrap_or_else(|| vec![DEFAULT_PAYMENT_METHOD.to_string()])
}
