//! Repair of damaged JSON produced by language models.
//!
//! Agent output is frequently almost-JSON: it carries JavaScript comments,
//! trailing commas, or is cut off mid-stream by a token limit. These passes
//! fix the common cases so the rest of the batch can still be applied.

use std::borrow::Cow;

use serde_json::Value;

/// Attempt to repair malformed JSON.
///
/// Text that already parses is returned untouched. Otherwise, in order:
/// - `//` and `/* */` comments are stripped
/// - trailing commas before `]` or `}` are removed
/// - unclosed strings, arrays and objects are closed
/// - as a last resort, the top-level array is cut after its last complete element
///
/// When nothing helps the original text is returned and the caller's
/// parse reports the error.
pub fn repair_json(json: &str) -> Cow<'_, str> {
    if is_valid(json) {
        return Cow::Borrowed(json);
    }
    log::debug!("[A2UI] Invalid JSON ({} bytes), attempting repair", json.len());

    let cleaned = fix_trailing_commas(&strip_comments(json));
    if is_valid(&cleaned) {
        log::info!("[A2UI] Repaired JSON by stripping comments and trailing commas");
        return Cow::Owned(cleaned);
    }

    let closed = close_truncated(&cleaned);
    if is_valid(&closed) {
        log::info!(
            "[A2UI] Repaired truncated JSON by closing it ({} -> {} bytes)",
            json.len(),
            closed.len()
        );
        return Cow::Owned(closed);
    }

    if let Some(truncated) = truncate_to_last_complete_element(&cleaned) {
        if is_valid(&truncated) {
            log::info!(
                "[A2UI] Repaired JSON by dropping its incomplete tail ({} -> {} bytes)",
                json.len(),
                truncated.len()
            );
            return Cow::Owned(truncated);
        }
    }

    log::warn!("[A2UI] Could not repair JSON, leaving it as is");
    Cow::Borrowed(json)
}

fn is_valid(json: &str) -> bool {
    serde_json::from_str::<Value>(json).is_ok()
}

/// Tracks whether a forward scan is inside a string literal.
#[derive(Default)]
struct StringState {
    in_string: bool,
    escaped: bool,
}

impl StringState {
    /// Feed one character; returns true if it belongs to a string literal
    /// (including its quotes).
    fn feed(&mut self, ch: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.in_string = false;
            }
            return true;
        }
        if ch == '"' {
            self.in_string = true;
            return true;
        }
        false
    }
}

fn strip_comments(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut state = StringState::default();
    let mut chars = json.chars().peekable();

    while let Some(ch) = chars.next() {
        if state.feed(ch) {
            out.push(ch);
            continue;
        }
        match (ch, chars.peek().copied()) {
            ('/', Some('/')) => {
                while chars.next_if(|&next| next != '\n').is_some() {}
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

fn fix_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut state = StringState::default();

    for (i, &ch) in chars.iter().enumerate() {
        if !state.feed(ch) && ch == ',' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some(']') | Some('}')) {
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Close whatever a truncated stream left open.
fn close_truncated(json: &str) -> String {
    let mut repaired = json.trim_end().trim_end_matches(',').to_string();

    let mut closers = Vec::new();
    let mut state = StringState::default();
    for ch in repaired.chars() {
        if state.feed(ch) {
            continue;
        }
        match ch {
            '[' => closers.push(']'),
            '{' => closers.push('}'),
            ']' | '}' => {
                closers.pop();
            }
            _ => {}
        }
    }

    if state.in_string {
        if state.escaped {
            repaired.pop();
        }
        repaired.push('"');
    }

    // A key or element cut off right after its separator
    let kept = repaired
        .trim_end_matches(|c: char| c == ':' || c == ',' || c.is_whitespace())
        .len();
    repaired.truncate(kept);

    while let Some(closer) = closers.pop() {
        repaired.push(closer);
    }
    repaired
}

/// Cut a top-level array right after its last complete element.
fn truncate_to_last_complete_element(json: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut state = StringState::default();
    let mut last_complete_end = None;

    for (i, ch) in json.char_indices() {
        if state.feed(ch) {
            continue;
        }
        match ch {
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    last_complete_end = Some(i);
                }
            }
            _ => {}
        }
    }

    let end = last_complete_end?;
    let mut fixed = json[..=end].to_string();
    fixed.push(']');
    Some(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(json: &str) -> Value {
        serde_json::from_str(&repair_json(json)).unwrap()
    }

    #[test]
    fn test_valid_json_is_borrowed() {
        let json = r#"[{"a": 1}]"#;
        assert!(matches!(repair_json(json), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_comments() {
        let json = r#"[
            // the header
            {"a": 1}, /* inline */ {"b": "http://example.com/*not a comment*/"}
        ]"#;
        assert_eq!(
            parse(json),
            json!([{"a": 1}, {"b": "http://example.com/*not a comment*/"}])
        );
    }

    #[test]
    fn test_trailing_commas() {
        assert_eq!(parse(r#"{"a": [1, 2,], "b": ",}",}"#), json!({"a": [1, 2], "b": ",}"}));
    }

    #[test]
    fn test_close_truncated_string() {
        assert_eq!(
            parse(r#"[{"a": 1}, {"b": "unterminated"#),
            json!([{"a": 1}, {"b": "unterminated"}])
        );
    }

    #[test]
    fn test_close_truncated_after_separator() {
        assert_eq!(parse(r#"{"list": [1, 2,"#), json!({"list": [1, 2]}));
    }

    #[test]
    fn test_drop_incomplete_tail() {
        assert_eq!(parse(r#"[{"a": 1}, {"b": tru"#), json!([{"a": 1}]));
    }

    #[test]
    fn test_unrepairable_returns_original() {
        let json = "definitely not json";
        assert_eq!(repair_json(json), json);
    }
}
