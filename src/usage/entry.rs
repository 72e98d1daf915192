use serde_json::Value;

use super::error::LineError;

/// Raw markers every usage-bearing line carries
const USAGE_MARKER: &str = "\"usage\"";
const COST_MARKER: &str = "\"cost\"";

/// Usage payload of one log line, with absent fields defaulted.
///
/// Token counts keep the raw JSON number; they are summed before truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageEntry {
    pub model: String,
    pub input: f64,
    pub output: f64,
    pub cache_read: f64,
    pub cache_write: f64,
    pub cost: f64,
    pub timestamp: String,
}

impl UsageEntry {
    /// Tokens occupying the context window: fresh input plus both cache kinds
    pub fn input_tokens(&self) -> u64 {
        to_tokens(self.input + self.cache_read + self.cache_write)
    }

    pub fn output_tokens(&self) -> u64 {
        to_tokens(self.output)
    }
}

/// Cheap substring check done before any JSON parsing.
///
/// Assumes the producer writes compact JSON, so `"usage"` and `"cost"` appear
/// verbatim as keys. Lines that fail here are never parsed.
pub fn has_usage_markers(line: &str) -> bool {
    line.contains(USAGE_MARKER) && line.contains(COST_MARKER)
}

/// Parse one log line.
///
/// Returns `Ok(None)` for lines without the usage markers, `Err` for lines that
/// carry them but cannot be read as a usage entry.
pub fn parse_line(line: &str) -> Result<Option<UsageEntry>, LineError> {
    if !has_usage_markers(line) {
        return Ok(None);
    }

    let entry: Value = serde_json::from_str(line)?;
    if !entry.is_object() {
        return Err(LineError::Shape("line"));
    }

    let message = object_field(&entry, "message")?;
    let usage = match message {
        Some(m) => object_field(m, "usage")?,
        None => None,
    };
    let cost = match usage {
        Some(u) => object_field(u, "cost")?,
        None => None,
    };

    let model = message
        .and_then(|m| m.get("model"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    let timestamp = entry
        .get("timestamp")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    Ok(Some(UsageEntry {
        model,
        input: token_field(usage, "input"),
        output: token_field(usage, "output"),
        cache_read: token_field(usage, "cacheRead"),
        cache_write: token_field(usage, "cacheWrite"),
        cost: cost
            .and_then(|c| c.get("total"))
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
        timestamp,
    }))
}

/// Fetch a nested object; absent is fine, any other type is a shape error
fn object_field<'a>(value: &'a Value, key: &'static str) -> Result<Option<&'a Value>, LineError> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) if v.is_object() => Ok(Some(v)),
        Some(_) => Err(LineError::Shape(key)),
    }
}

fn token_field(usage: Option<&Value>, key: &str) -> f64 {
    usage
        .and_then(|u| u.get(key))
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

/// Truncate toward zero; negative totals clamp to 0
fn to_tokens(total: f64) -> u64 {
    total.max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_LINE: &str = r#"{"timestamp":"2024-06-01T12:00:00Z","message":{"model":"claude-sonnet","usage":{"input":100,"output":50,"cacheRead":10,"cacheWrite":5,"cost":{"total":0.02}}}}"#;

    #[test]
    fn test_parse_full_line() {
        let entry = parse_line(FULL_LINE).unwrap().unwrap();
        assert_eq!(entry.model, "claude-sonnet");
        assert_eq!(entry.input_tokens(), 115);
        assert_eq!(entry.output_tokens(), 50);
        assert!((entry.cost - 0.02).abs() < 1e-12);
        assert_eq!(entry.timestamp, "2024-06-01T12:00:00Z");
    }

    #[test]
    fn test_missing_fields_default() {
        let line = r#"{"message":{"usage":{"input":7,"cost":{"total":0.5}}}}"#;
        let entry = parse_line(line).unwrap().unwrap();
        assert_eq!(entry.model, "unknown");
        assert_eq!(entry.input_tokens(), 7);
        assert_eq!(entry.output_tokens(), 0);
        assert_eq!(entry.timestamp, "");
    }

    #[test]
    fn test_lines_without_markers_are_skipped() {
        assert!(parse_line(r#"{"type":"user","text":"hello"}"#).unwrap().is_none());
        assert!(parse_line(r#"{"message":{"usage":{"input":1}}}"#).unwrap().is_none());
        assert!(parse_line("").unwrap().is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let truncated = &FULL_LINE[..FULL_LINE.len() - 10];
        assert!(matches!(parse_line(truncated), Err(LineError::Json(_))));
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        let line = r#"{"message":"text","usage":1,"cost":2}"#;
        assert!(matches!(parse_line(line), Err(LineError::Shape("message"))));
        assert!(matches!(
            parse_line(r#"["usage","cost"]"#),
            Err(LineError::Shape("line"))
        ));
    }

    #[test]
    fn test_markers_in_unrelated_text_still_parse() {
        // Matches the filter but has no usage payload: zero cost, zero tokens
        let line = r#"{"usage":"n/a","cost":"n/a","message":{"model":"m"}}"#;
        let entry = parse_line(line).unwrap().unwrap();
        assert_eq!(entry.cost, 0.0);
        assert_eq!(entry.input_tokens(), 0);
    }

    #[test]
    fn test_escaped_keys_are_a_known_false_negative() {
        // Valid JSON for a usage line, but the filter only sees raw text
        let line = r#"{"message":{"us\u0061ge":{"input":1,"cost":{"total":1.0}}}}"#;
        assert!(serde_json::from_str::<Value>(line).is_ok());
        assert!(!has_usage_markers(line));
        assert!(parse_line(line).unwrap().is_none());
    }

    #[test]
    fn test_fractional_tokens_sum_before_truncating() {
        let line = r#"{"message":{"usage":{"input":0.6,"cacheRead":0.6,"output":2.9,"cost":{"total":0.1}}}}"#;
        let entry = parse_line(line).unwrap().unwrap();
        assert_eq!(entry.input_tokens(), 1);
        assert_eq!(entry.output_tokens(), 2);
    }
}
