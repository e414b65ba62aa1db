use serde_json::Value;

use super::types::TrendResult;
use super::GatewayError;

/// Parse the service's trend reply into structured JSON.
///
/// The reply is trimmed and a single surrounding Markdown code fence is
/// removed. The remainder must parse as a JSON object or array; its contents
/// are passed through unchecked.
pub fn parse_trend_payload(response: &str) -> Result<TrendResult, GatewayError> {
    let body = strip_code_fence(response.trim());

    let value: Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    match value {
        Value::Object(_) | Value::Array(_) => Ok(TrendResult(value)),
        other => Err(GatewayError::MalformedResponse(format!(
            "expected a JSON object or array, got {}",
            json_kind(&other)
        ))),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_json_object() {
        let result = parse_trend_payload(
            r#"  {"labels": ["2024-01-01", "2024-02-01"], "data": [70, 72]} "#,
        )
        .unwrap();
        assert_eq!(result.0["data"], json!([70, 72]));
    }

    #[test]
    fn parses_fenced_json() {
        let response = "```json\n{\"labels\": [\"Jan\"], \"data\": [50]}\n```";
        let result = parse_trend_payload(response).unwrap();
        assert_eq!(result.0["labels"], json!(["Jan"]));
    }

    #[test]
    fn passes_through_without_semantic_checks() {
        // Out-of-range scores and mismatched lengths are not our concern
        let result = parse_trend_payload(r#"{"labels": [], "data": [500, -3], "extra": true}"#)
            .unwrap();
        assert_eq!(result.0["extra"], json!(true));
    }

    #[test]
    fn single_line_fence_keeps_info_string_and_is_malformed() {
        // Only a fence whose info string ends at a newline is unwrapped
        let err = parse_trend_payload("```json{\"labels\": [], \"data\": []}```").unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }

    #[test]
    fn prose_is_malformed() {
        let err = parse_trend_payload("Sure! Here is the trend you asked for.").unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }

    #[test]
    fn truncated_json_is_malformed() {
        let err = parse_trend_payload(r#"{"labels": ["2024-01-01""#).unwrap_err();
        match err {
            GatewayError::MalformedResponse(reason) => assert!(!reason.is_empty()),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn scalar_json_is_malformed() {
        assert!(matches!(
            parse_trend_payload("42"),
            Err(GatewayError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_trend_payload(""),
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
