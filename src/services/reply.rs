//! Recovery of structured data from free-form model replies.
//!
//! Chat models are asked for bare JSON but routinely wrap it in prose or code
//! fences. The scan here finds the first balanced `{...}` span that parses as a
//! JSON object, so a stray brace in the surrounding text cannot swallow the
//! real payload.

use serde_json::{Map, Value};

/// Characters of raw reply kept as the summary when no JSON is recoverable.
pub const FALLBACK_SUMMARY_CHARS: usize = 200;
pub const MAX_KEYWORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSummary {
    pub summary: String,
    pub keywords: Vec<String>,
    /// False when the reply had no usable JSON and was truncated instead.
    pub structured: bool,
}

/// Returns the first balanced `{...}` span of `text` that is a JSON object.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let bytes = text.as_bytes();

    for (start, _) in text.match_indices('{') {
        let Some(end) = balanced_end(bytes, start) else {
            continue;
        };
        if let Ok(Value::Object(object)) = serde_json::from_str(&text[start..=end]) {
            return Some(object);
        }
    }

    None
}

// Index of the brace closing the one at `start`, ignoring braces in strings.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

/// Normalizes a summarization reply. Never fails: missing fields become empty
/// and an unparsable reply degrades to a truncated plain-text summary.
pub fn parse_summary(content: &str) -> ParsedSummary {
    match extract_json_object(content) {
        Some(object) => {
            let summary = object
                .get("summary")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            let keywords = object
                .get("keywords")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .take(MAX_KEYWORDS)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            ParsedSummary {
                summary,
                keywords,
                structured: true,
            }
        }
        None => {
            tracing::warn!(reply_len = content.len(), "no JSON object in model reply, using raw text");
            ParsedSummary {
                summary: content.chars().take(FALLBACK_SUMMARY_CHARS).collect(),
                keywords: Vec::new(),
                structured: false,
            }
        }
    }
}
