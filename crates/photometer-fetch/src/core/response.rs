use serde_json::Value;

/// Extract the service-reported error from a response body, if any.
///
/// Only a JSON object whose `error` member is present and non-empty counts.
/// `null`, `false`, `0` and `""` are treated as "no error". A body that is not
/// JSON at all is not a service error either; the formatter reports it as a
/// parse failure later.
pub fn service_error(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_error_is_reported() {
        assert_eq!(
            service_error(br#"{"error": "File type not allowed"}"#),
            Some("File type not allowed".to_string())
        );
    }

    #[test]
    fn empty_or_falsy_error_is_ignored() {
        assert_eq!(service_error(br#"{"error": ""}"#), None);
        assert_eq!(service_error(br#"{"error": null, "absorbance": 1}"#), None);
        assert_eq!(service_error(br#"{"error": false}"#), None);
        assert_eq!(service_error(br#"{"error": 0}"#), None);
    }

    #[test]
    fn non_string_error_is_stringified() {
        assert_eq!(service_error(br#"{"error": {"code": 3}}"#), Some(r#"{"code":3}"#.to_string()));
    }

    #[test]
    fn success_and_garbage_bodies_have_no_service_error() {
        assert_eq!(service_error(br#"{"absorbance": 0.5}"#), None);
        assert_eq!(service_error(b"<html>bad gateway</html>"), None);
        assert_eq!(service_error(b"[1, 2]"), None);
    }
}
