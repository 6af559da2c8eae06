use serde_json::Value;

/// Unwrap the backend's response envelope.
///
/// Handles `{ "data": ... }`, `{ "success": true, "data": ... }` and bare
/// payloads. A present `data` field wins even when it is `null`.
pub fn extract_response_data(response: Value) -> Value {
    match response {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Error text the backend put in a failure body (`message`, then `error`).
pub fn error_message_from_body(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|field| body.get(*field).and_then(Value::as_str))
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

/// 401 and 403 both end the session from the client's point of view.
pub fn is_auth_status(status: u16) -> bool {
    status == 401 || status == 403
}

pub fn is_not_found_status(status: u16) -> bool {
    status == 404
}
