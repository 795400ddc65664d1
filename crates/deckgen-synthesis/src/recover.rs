//! Defensive JSON recovery for loosely-typed model output.
//!
//! The model may wrap JSON in prose, fence it in a code block, or return an
//! object where an array was asked for. Recovery is a fixed ladder: direct
//! parse, fenced block, first balanced span. If every rung fails the call
//! fails; there is no guessing rung.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{Result, SynthesisError};

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("static regex"))
}

/// Recover an array of slide objects from raw model output.
pub fn recover_slide_array(text: &str) -> Result<Vec<Value>> {
    // 1. Direct parse of the whole response
    if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        return array_from_value(value);
    }

    // 2. Fenced code block
    if let Some(caps) = fence_re().captures(text) {
        if let Ok(value) = serde_json::from_str::<Value>(caps[1].trim()) {
            return array_from_value(value);
        }
    }

    // 3. First balanced [...] span in the raw text
    if let Some(span) = balanced_span(text, '[', ']') {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return array_from_value(value);
        }
    }

    Err(SynthesisError::Unrecoverable(preview(text)))
}

/// Recover a full-deck replacement plus change summary from a modify call.
///
/// Expected shape is `{"slides": [...], "summary": "..."}`; a bare array is
/// accepted with a default summary.
pub fn recover_modify(text: &str) -> Result<(Vec<Value>, String)> {
    const DEFAULT_SUMMARY: &str = "Deck updated";

    let object = parse_lenient(text);

    if let Some(value) = object {
        let summary = value
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SUMMARY)
            .to_string();
        let slides = array_from_value(value)?;
        return Ok((slides, summary));
    }

    // Fall back to the array ladder for models that ignore the envelope
    let slides = recover_slide_array(text)?;
    Ok((slides, DEFAULT_SUMMARY.to_string()))
}

/// Direct + fenced + balanced-span parse, first success wins.
fn parse_lenient(text: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(text.trim()) {
        return Some(v);
    }
    if let Some(caps) = fence_re().captures(text) {
        if let Ok(v) = serde_json::from_str::<Value>(caps[1].trim()) {
            return Some(v);
        }
    }
    if let Some(span) = balanced_span(text, '{', '}') {
        if let Ok(v) = serde_json::from_str::<Value>(span) {
            return Some(v);
        }
    }
    None
}

/// Interpret a parsed value as a slide array.
///
/// Arrays pass through; objects are checked for a `slides` array; a single
/// object that itself looks like a slide is wrapped as a one-element deck.
fn array_from_value(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(ref map) => {
            if let Some(Value::Array(items)) = map.get("slides") {
                return Ok(items.clone());
            }
            if map.contains_key("type") || map.contains_key("title") {
                return Ok(vec![value]);
            }
            Err(SynthesisError::WrongShape(
                "object with no 'slides' array and no slide fields".to_string(),
            ))
        }
        other => Err(SynthesisError::WrongShape(format!(
            "expected array, got {}",
            type_name(&other)
        ))),
    }
}

/// Find the first balanced `open..close` span, respecting JSON strings and
/// escapes.
fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() <= 120 {
        trimmed.to_string()
    } else {
        let mut end = 120;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_array() {
        let out = recover_slide_array(r#"[{"type":"title","title":"T"}]"#).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["type"], "title");
    }

    #[test]
    fn test_object_with_slides_key() {
        let out = recover_slide_array(r#"{"slides":[{"title":"A"},{"title":"B"}]}"#).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_fenced_block() {
        let text = "Here is the result:\n```json\n[{\"type\":\"content\",\"title\":\"X\"}]\n```";
        let out = recover_slide_array(text).unwrap();
        assert_eq!(out[0]["title"], "X");
    }

    #[test]
    fn test_fence_without_language_tag() {
        let text = "```\n[{\"title\":\"Y\"}]\n```";
        let out = recover_slide_array(text).unwrap();
        assert_eq!(out[0]["title"], "Y");
    }

    #[test]
    fn test_bare_span_in_prose() {
        let text = "Sure! The slides are [ {\"title\":\"Z\"} ] as requested.";
        let out = recover_slide_array(text).unwrap();
        assert_eq!(out[0]["title"], "Z");
    }

    #[test]
    fn test_span_with_bracket_inside_string() {
        let text = "result: [{\"title\":\"a ] b\"}] done";
        let out = recover_slide_array(text).unwrap();
        assert_eq!(out[0]["title"], "a ] b");
    }

    #[test]
    fn test_single_slide_object_wrapped() {
        let out = recover_slide_array(r#"{"type":"content","title":"only"}"#).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_wrong_shape_object() {
        let result = recover_slide_array(r#"{"answer":42}"#);
        assert!(matches!(result, Err(SynthesisError::WrongShape(_))));
    }

    #[test]
    fn test_unrecoverable_prose() {
        let result = recover_slide_array("I'm sorry, I can't help with that.");
        assert!(matches!(result, Err(SynthesisError::Unrecoverable(_))));
    }

    #[test]
    fn test_recover_modify_envelope() {
        let text = r#"{"slides":[{"title":"A"}],"summary":"Reordered slides"}"#;
        let (slides, summary) = recover_modify(text).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(summary, "Reordered slides");
    }

    #[test]
    fn test_recover_modify_bare_array() {
        let (slides, summary) = recover_modify(r#"[{"title":"A"},{"title":"B"}]"#).unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(summary, "Deck updated");
    }
}
