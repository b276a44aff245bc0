//! Request/response envelope for procedure calls
//!
//! Success: `{"result":{"data":<payload>}}`
//! Failure: `{"error":{"message":..,"code":<rpc code>,"data":{..}}}` where data carries
//! `{"code":"NOT_FOUND","httpStatus":404,"path":..}`
//!
//! Query inputs travel as a single URL-encoded JSON `input` parameter,
//! mutation inputs as the JSON request body. Either may be wrapped as
//! `{"json": <input>}`.

use crate::mock::error::ProcedureError;
use serde_json::{json, Value};

/// Wrapper key some clients nest inputs under
const INPUT_WRAPPER_KEY: &str = "json";

pub fn success(data: Value) -> Value {
    json!({ "result": { "data": data } })
}

pub fn failure(error: &ProcedureError, path: &str) -> Value {
    json!({
        "error": {
            "message": error.message,
            "code": error.code.rpc_code(),
            "data": {
                "code": error.code.as_str(),
                "httpStatus": error.code.http_status(),
                "path": path,
            }
        }
    })
}

/// Strip the `{"json": ..}` wrapper. Null inputs become `None`.
pub fn unwrap_input(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(mut map) if map.len() == 1 && map.contains_key(INPUT_WRAPPER_KEY) => {
            match map.remove(INPUT_WRAPPER_KEY) {
                Some(Value::Null) | None => None,
                Some(inner) => Some(inner),
            }
        }
        other => Some(other),
    }
}

/// Decode input text. Blank text is an absent input; malformed JSON is BAD_REQUEST.
pub fn decode_input_text(raw: Option<&str>) -> Result<Option<Value>, ProcedureError> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ProcedureError::bad_request(format!("Invalid input JSON: {e}")))?;
    Ok(unwrap_input(value))
}

/// Decode the `input` parameter of a query string (without leading `?`)
pub fn decode_query_input(query: Option<&str>) -> Result<Option<Value>, ProcedureError> {
    let Some(query) = query else {
        return Ok(None);
    };
    let raw = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "input")
        .map(|(_, value)| value.into_owned());
    decode_input_text(raw.as_deref())
}

/// Decode a mutation request body
pub fn decode_body_input(body: &[u8]) -> Result<Option<Value>, ProcedureError> {
    let text = std::str::from_utf8(body)
        .map_err(|_| ProcedureError::bad_request("Request body is not valid UTF-8"))?;
    decode_input_text(Some(text))
}
