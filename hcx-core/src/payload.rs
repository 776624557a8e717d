//! Prioritized-fallback field access over raw upstream JSON.
//!
//! The analytics service answers the same logical endpoint in more than one
//! shape: fields nested under a wrapper named after the operation
//! (`{"trend": {"slope": ..}}`) or flat at the top level (`{"slope": ..}`),
//! sometimes under a different field name. Every canonical field is read
//! through an ordered list of dotted candidate paths; the first candidate
//! that resolves to a value of the wanted type wins. Candidate lists put the
//! nested dialect first and the flat dialect second, and the caller supplies
//! the default that applies when none resolves.

use serde_json::Value;

/// Ordered dotted paths for one canonical field, e.g. `&["trend.slope", "slope"]`.
pub type Candidates = &'static [&'static str];

/// Read-only view over one decoded response body.
#[derive(Debug, Clone, Copy)]
pub struct Payload<'a>(&'a Value);

impl<'a> Payload<'a> {
    pub fn new(value: &'a Value) -> Self {
        Payload(value)
    }

    pub fn value(&self) -> &'a Value {
        self.0
    }

    /// Resolve one dotted path. `null` counts as absent.
    pub fn lookup(&self, path: &str) -> Option<&'a Value> {
        path.split('.')
            .try_fold(self.0, |value, key| value.get(key))
            .filter(|value| !value.is_null())
    }

    /// First candidate path that resolves to anything.
    pub fn first(&self, candidates: &[&str]) -> Option<&'a Value> {
        candidates.iter().find_map(|path| self.lookup(path))
    }

    /// First candidate that resolves to a number (numeric strings included).
    pub fn number(&self, candidates: &[&str]) -> Option<f64> {
        candidates
            .iter()
            .find_map(|path| self.lookup(path).and_then(as_f64))
    }

    pub fn number_or(&self, candidates: &[&str], default: f64) -> f64 {
        self.number(candidates).unwrap_or(default)
    }

    /// First candidate that resolves to a non-empty string.
    pub fn string(&self, candidates: &[&str]) -> Option<&'a str> {
        candidates.iter().find_map(|path| {
            self.lookup(path)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
    }

    /// First candidate that resolves to an object, as a nested payload.
    pub fn object(&self, candidates: &[&str]) -> Option<Payload<'a>> {
        candidates.iter().find_map(|path| {
            self.lookup(path)
                .filter(|value| value.is_object())
                .map(Payload)
        })
    }

    /// First candidate that resolves to an array.
    pub fn array(&self, candidates: &[&str]) -> Option<&'a [Value]> {
        candidates.iter().find_map(|path| {
            self.lookup(path)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
        })
    }

    /// Numeric sequence; non-numeric elements become `0.0` so indices stay
    /// aligned with sibling sequences.
    pub fn numbers(&self, candidates: &[&str]) -> Vec<f64> {
        self.array(candidates)
            .map(|items| items.iter().map(|v| as_f64(v).unwrap_or(0.0)).collect())
            .unwrap_or_default()
    }

    /// String sequence; numbers are rendered, other elements become empty.
    pub fn strings(&self, candidates: &[&str]) -> Vec<String> {
        self.array(candidates)
            .map(|items| items.iter().map(as_text).collect())
            .unwrap_or_default()
    }
}

/// Number or numeric string.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Whole number, rounding floats (`1987.0` is a year too).
pub fn as_i32(value: &Value) -> Option<i32> {
    as_f64(value)
        .filter(|f| f.is_finite() && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
        .map(|f| f.round() as i32)
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SLOPE: Candidates = &["trend.slope", "slope"];

    #[test]
    fn test_nested_candidate_wins() {
        let raw = json!({"trend": {"slope": 0.25}, "slope": 9.0});
        assert_eq!(Payload::new(&raw).number(SLOPE), Some(0.25));
    }

    #[test]
    fn test_flat_candidate_fallback() {
        let raw = json!({"slope": 0.5});
        assert_eq!(Payload::new(&raw).number(SLOPE), Some(0.5));
    }

    #[test]
    fn test_wrong_type_falls_through() {
        let raw = json!({"trend": {"slope": "n/a"}, "slope": 1.5});
        assert_eq!(Payload::new(&raw).number(SLOPE), Some(1.5));
        let raw = json!({"trend": {"slope": null}});
        assert_eq!(Payload::new(&raw).number_or(SLOPE, 0.0), 0.0);
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let raw = json!({"slope": " 2.5 "});
        assert_eq!(Payload::new(&raw).number(SLOPE), Some(2.5));
    }

    #[test]
    fn test_sequences() {
        let raw = json!({"values": [1, null, "3.5"], "times": ["1950-01", 1951, true]});
        let payload = Payload::new(&raw);
        assert_eq!(payload.numbers(&["values"]), vec![1.0, 0.0, 3.5]);
        assert_eq!(
            payload.strings(&["times"]),
            vec!["1950-01".to_string(), "1951".to_string(), String::new()]
        );
        assert!(payload.numbers(&["missing"]).is_empty());
    }

    #[test]
    fn test_non_object_payload_resolves_nothing() {
        let raw = json!([1, 2, 3]);
        let payload = Payload::new(&raw);
        assert_eq!(payload.number(SLOPE), None);
        assert!(payload.object(&["trend"]).is_none());
    }

    #[test]
    fn test_as_i32_rounds() {
        assert_eq!(as_i32(&json!(1987.0)), Some(1987));
        assert_eq!(as_i32(&json!("2001")), Some(2001));
        assert_eq!(as_i32(&json!(f64::MAX)), None);
    }
}
