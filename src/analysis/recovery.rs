//! Recovery parser for JSON embedded in free-form model output

use serde_json::Value;

/// Parse the whole text as a JSON document
pub fn parse_strict(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text.trim())
}

/// Find a JSON object in `text`.
///
/// Strict parse first; otherwise the first balanced `{...}` span that
/// parses as an object. `None` when the text holds no usable object.
pub fn recover_object(text: &str) -> Option<Value> {
    if let Ok(value @ Value::Object(_)) = parse_strict(text) {
        return Some(value);
    }

    balanced_spans(text)
        .into_iter()
        .find_map(|span| match serde_json::from_str::<Value>(span) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        })
}

/// Top-level balanced brace spans, in order of appearance.
///
/// Braces inside JSON string literals are ignored.
pub fn balanced_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth: u32 = 0;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match ch {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        spans.push(&text[s..=idx]);
                    }
                }
            }
            _ => {}
        }
    }

    spans
}
