use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::ChatError;

static BULLET_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[•-][^\S\n]").unwrap());
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

fn render_path(path: &[PathSegment]) -> String {
    let mut rendered = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !rendered.is_empty() {
                    rendered.push('.');
                }
                rendered.push_str(key);
            }
            PathSegment::Index(index) => rendered.push_str(&format!("[{}]", index)),
        }
    }
    rendered
}

/// Walks `path` into `body` and returns the string found there.
///
/// The error names the shortest prefix of the path that could not be
/// resolved, so an error envelope without `candidates` reports
/// `candidates` rather than the full path.
pub fn extract_text(body: &Value, path: &[PathSegment]) -> Result<String, ChatError> {
    let mut current = body;
    for (depth, segment) in path.iter().enumerate() {
        let next = match segment {
            PathSegment::Key(key) => current.get(*key),
            PathSegment::Index(index) => current.get(*index),
        };
        current = next.ok_or_else(|| ChatError::MissingField(render_path(&path[..=depth])))?;
    }

    current
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ChatError::MissingField(render_path(path)))
}

/// Strips markdown emphasis, turns `-`/`•` list items into spaced `•`
/// bullets and squeezes runs of blank lines down to one.
///
/// The marker must be followed by horizontal whitespace; a bare `-` line is
/// kept so the newline after it is never swallowed.
pub fn clean_response(text: &str) -> String {
    let without_asterisks = text.replace('*', "");
    let bulleted = BULLET_LINE.replace_all(without_asterisks.trim(), "\n• ");
    let collapsed = BLANK_RUN.replace_all(&bulleted, "\n\n");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use super::PathSegment::{ Index, Key };

    const GEMINI_PATH: &[PathSegment] = &[
        Key("candidates"),
        Index(0),
        Key("content"),
        Key("parts"),
        Index(0),
        Key("text"),
    ];

    #[test]
    fn extracts_gemini_text() {
        let body = json!({"candidates":[{"content":{"parts":[{"text":"Hello"}]}}]});
        assert_eq!(extract_text(&body, GEMINI_PATH).unwrap(), "Hello");
    }

    #[test]
    fn missing_candidates_is_reported() {
        let body = json!({"error": {"code": 400, "message": "API key not valid"}});
        match extract_text(&body, GEMINI_PATH) {
            Err(ChatError::MissingField(path)) => assert_eq!(path, "candidates"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn empty_candidate_list_reports_index() {
        let body = json!({"candidates": []});
        match extract_text(&body, GEMINI_PATH) {
            Err(ChatError::MissingField(path)) => assert_eq!(path, "candidates[0]"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn non_string_leaf_is_missing() {
        let body = json!({"candidates":[{"content":{"parts":[{"text": 42}]}}]});
        match extract_text(&body, GEMINI_PATH) {
            Err(ChatError::MissingField(path)) => assert_eq!(path, "candidates[0].content.parts[0].text"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn removes_asterisks() {
        assert_eq!(clean_response("**Diversify** your *portfolio*"), "Diversify your portfolio");
    }

    #[test]
    fn converts_list_items_to_spaced_bullets() {
        let raw = "Options:\n- Stocks\n- Bonds\n• Cash";
        assert_eq!(clean_response(raw), "Options:\n\n• Stocks\n\n• Bonds\n\n• Cash");
    }

    #[test]
    fn leading_bullet_does_not_leave_blank_first_line() {
        assert_eq!(clean_response("- first\n- second"), "• first\n\n• second");
        assert_eq!(clean_response("   - indented start"), "• indented start");
    }

    #[test]
    fn collapses_blank_line_runs() {
        assert_eq!(clean_response("one\n\n\n\ntwo\n \n\t\nthree"), "one\n\ntwo\n\nthree");
    }

    #[test]
    fn hyphenated_words_are_left_alone() {
        assert_eq!(clean_response("long-term growth\n-5% drawdown"), "long-term growth\n-5% drawdown");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let samples = [
            "",
            "   ",
            "plain text",
            "**bold** and *italic*",
            "- a\n- b\n\n\n- c",
            "   - indented start",
            "a\n-\n\nb",
            "-\n- b",
            "• already\n\n• bulleted",
            "x\r\n\r\n\r\ny",
            "- - nested\n-\tTabbed",
            "line\n  \n  \n  - not a bullet\n",
            "*\n*\n- *\n",
            "Summary:\n\n\n• one\n-two\n- three  \n\n",
        ];
        for sample in samples {
            let once = clean_response(sample);
            assert_eq!(clean_response(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
