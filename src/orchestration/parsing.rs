//! Pull a JSON object out of free-form model output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplyParseError {
    #[error("empty model reply")]
    Empty,
    #[error("no valid JSON object found in model reply: {0}")]
    NoJson(String),
}

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("fence regex is valid")
});

/// Remove markdown code fences, returning the fenced body if there is one.
///
/// An opening fence with no closing fence (truncated replies) is dropped
/// along with its language tag.
pub fn strip_code_fences(text: &str) -> String {
    if let Some(caps) = FENCED_BLOCK.captures(text)
        && let Some(body) = caps.get(1)
    {
        return body.as_str().trim().to_string();
    }
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let body = match rest.find('\n') {
            Some(nl) => &rest[nl + 1..],
            None => rest,
        };
        return body.trim_end_matches('`').trim().to_string();
    }
    trimmed.to_string()
}

/// End index (inclusive) of the balanced object opening at `start`, if the
/// text closes it. Braces inside JSON strings are ignored.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth: u32 = 0;
    let mut in_string = false;
    let mut escape = false;

    for (offset, ch) in text[start..].char_indices() {
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
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
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

/// Every balanced `{...}` substring, in order of appearance.
///
/// An opening brace that is never closed (a stray `{` in prose) does not
/// hide objects after it; scanning resumes at the next `{`.
pub fn extract_json_candidates(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut pos = 0;

    while let Some(found) = text[pos..].find('{') {
        let start = pos + found;
        match balanced_end(text, start) {
            Some(end) => {
                candidates.push(text[start..=end].to_string());
                pos = end + 1;
            }
            None => pos = start + 1,
        }
    }

    candidates
}

/// Decode a model reply into `T`.
///
/// Tries the fence-stripped text directly, then each balanced-brace
/// candidate in order, returning the first that decodes.
pub fn parse_json_reply<T: DeserializeOwned>(raw: &str) -> Result<T, ReplyParseError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(ReplyParseError::Empty);
    }
    if let Ok(value) = serde_json::from_str::<T>(&cleaned) {
        return Ok(value);
    }

    for candidate in extract_json_candidates(raw) {
        if let Ok(value) = serde_json::from_str::<T>(&candidate) {
            return Ok(value);
        }
    }

    Err(ReplyParseError::NoJson(truncate_chars(cleaned.trim(), 200)))
}

fn truncate_chars(input: &str, max: usize) -> String {
    let mut out: String = input.chars().take(max).collect();
    if input.chars().count() > max {
        out.push_str("...");
    }
    out
}
