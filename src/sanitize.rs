//! Memory bounding for untrusted input payloads.
//!
//! Inputs are sanitized before deserialization: every string and array in the
//! JSON tree is capped, recursively, so a pathological export cannot blow up
//! the comparison run.

use serde_json::Value;

/// Marker appended to truncated strings.
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeLimits {
    pub max_string_length: usize,
    pub max_array_length: usize,
}

impl Default for SanitizeLimits {
    fn default() -> Self {
        Self {
            max_string_length: 1000,
            max_array_length: 1000,
        }
    }
}

/// Recursively cap strings and arrays in a JSON value.
///
/// Truncated strings end with [`ELLIPSIS`] and are exactly
/// `max_string_length` characters long; arrays keep their first
/// `max_array_length` elements. Object keys are left untouched.
pub fn sanitize_value(value: Value, limits: &SanitizeLimits) -> Value {
    match value {
        Value::String(s) => Value::String(truncate_string(s, limits.max_string_length)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .take(limits.max_array_length)
                .map(|item| sanitize_value(item, limits))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_value(v, limits)))
                .collect(),
        ),
        other => other,
    }
}

/// Cap a string at `max_chars` characters, ellipsis included.
pub fn truncate_string(s: String, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s;
    }
    let marker_len = ELLIPSIS.chars().count();
    if max_chars <= marker_len {
        return s.chars().take(max_chars).collect();
    }
    let mut out: String = s.chars().take(max_chars - marker_len).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Split a slice into consecutive chunks of at most `size` elements.
///
/// A size of zero is treated as one.
pub fn chunk<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}

/// JSON kind name used in error context.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn limits(strings: usize, arrays: usize) -> SanitizeLimits {
        SanitizeLimits {
            max_string_length: strings,
            max_array_length: arrays,
        }
    }

    #[test]
    fn long_strings_are_cut_to_the_cap_with_marker() {
        let out = sanitize_value(json!("abcdefghij"), &limits(6, 10));
        assert_eq!(out, json!("abc..."));
        assert_eq!(out.as_str().map(|s| s.chars().count()), Some(6));
    }

    #[test]
    fn short_strings_are_untouched() {
        let out = sanitize_value(json!("abc"), &limits(6, 10));
        assert_eq!(out, json!("abc"));
    }

    #[test]
    fn multibyte_strings_are_cut_on_char_boundaries() {
        let out = truncate_string("ééééééééé".to_string(), 5);
        assert_eq!(out, "éé...");
    }

    #[test]
    fn nested_arrays_and_strings_respect_caps() {
        let input = json!({
            "components": [
                { "name": "x".repeat(50), "tags": [1, 2, 3, 4, 5] },
                { "name": "short" },
                { "name": "third" }
            ]
        });
        let out = sanitize_value(input, &limits(10, 2));

        let components = out["components"].as_array().expect("array");
        assert_eq!(components.len(), 2);
        assert_eq!(components[0]["name"].as_str().map(str::len), Some(10));
        assert_eq!(components[0]["tags"].as_array().map(Vec::len), Some(2));
        assert_eq!(components[1]["name"], json!("short"));
    }

    #[test]
    fn sanitized_output_never_exceeds_caps() {
        for cap in [4usize, 7, 32] {
            let long = "y".repeat(cap * 3);
            let arr: Vec<Value> = (0..cap * 2).map(|i| json!(i)).collect();
            let out = sanitize_value(json!({ "s": long, "a": arr }), &limits(cap, cap));
            assert!(out["s"].as_str().unwrap().chars().count() <= cap);
            assert!(out["a"].as_array().unwrap().len() <= cap);
        }
    }

    #[test]
    fn chunking_yields_ceil_n_over_k_chunks_in_order() {
        let items: Vec<u32> = (0..23).collect();
        let chunks = chunk(&items, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 3);
        let flattened: Vec<u32> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(flattened, items);

        let exact: Vec<u32> = (0..20).collect();
        assert_eq!(chunk(&exact, 10).len(), 2);
        assert!(chunk::<u32>(&[], 10).is_empty());
    }
}
