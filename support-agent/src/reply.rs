//! Model output repair, schema validation, fallback reply and debug blob.

use chat_contract::{DebugFlags, StructuredReply, UserMood};
use serde::Serialize;

use crate::error::SupportError;

/// Opening brace sent as the primed assistant turn.
pub const PRIME: &str = "{";

pub const FALLBACK_RESPONSE: &str =
    "Sorry, there was an issue processing your request. Please try again later.";
pub const FALLBACK_THINKING: &str = "Error occurred during message generation.";

/// Fixed body returned with HTTP 500 on any internal failure.
pub fn fallback_reply() -> StructuredReply {
    StructuredReply {
        id: None,
        response: FALLBACK_RESPONSE.to_string(),
        thinking: FALLBACK_THINKING.to_string(),
        user_mood: UserMood::Neutral,
        suggested_questions: Vec::new(),
        debug: DebugFlags {
            context_used: false,
        },
        matched_categories: None,
        redirect_to_agent: None,
    }
}

/// Escape raw control characters that appear inside JSON string literals.
///
/// Structural whitespace outside strings is left untouched; already escaped
/// sequences (`\\n`, `\\"`) pass through unchanged.
pub fn escape_newlines_in_strings(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 16);
    let mut in_string = false;
    let mut escaped = false;

    for ch in raw.chars() {
        if !in_string {
            if ch == '"' {
                in_string = true;
            }
            out.push(ch);
            continue;
        }

        if escaped {
            escaped = false;
            out.push(ch);
            continue;
        }

        match ch {
            '\\' => {
                escaped = true;
                out.push(ch);
            }
            '"' => {
                in_string = false;
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Rebuild the full object from the primed output and validate it.
///
/// `completion` is the model text that follows the primed `{`.
pub fn parse_reply(completion: &str) -> Result<StructuredReply, SupportError> {
    let raw = format!("{PRIME}{completion}");
    let repaired = escape_newlines_in_strings(&raw);

    let value: serde_json::Value =
        serde_json::from_str(repaired.trim()).map_err(|e| invalid("not valid JSON", &e, &raw))?;
    serde_json::from_value(value).map_err(|e| invalid("schema violation", &e, &raw))
}

fn invalid(what: &str, e: &serde_json::Error, raw: &str) -> SupportError {
    SupportError::InvalidReply {
        reason: format!("{what}: {e}"),
        snippet: snippet(raw),
    }
}

fn snippet(raw: &str) -> String {
    const MAX: usize = 240;
    let mut s: String = raw.chars().take(MAX).collect();
    if raw.chars().count() > MAX {
        s.push('…');
    }
    s
}

/// Diagnostic blob sent in the `X-Debug-Data` header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugInfo {
    /// RFC3339 UTC.
    pub timestamp: String,
    /// Whether retrieval answered for this turn.
    pub context_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_error: Option<String>,
    /// Number of sources attached to the response.
    pub sources: usize,
    pub model: String,
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#""thinking": "ok",
  "response": "line one
line two",
  "user_mood": "positive",
  "suggested_questions": [],
  "debug": {"context_used": false}
}"#;

    #[test]
    fn repairs_raw_newlines_inside_strings() {
        let reply = parse_reply(BODY).unwrap();
        assert_eq!(reply.response, "line one\nline two");
        assert_eq!(reply.user_mood, UserMood::Positive);
    }

    #[test]
    fn leaves_escapes_and_structure_alone() {
        let src = "{\n  \"a\": \"x\\\"y\\n\",\n  \"b\": 1\n}";
        assert_eq!(escape_newlines_in_strings(src), src);
    }

    #[test]
    fn schema_violation_is_rejected() {
        let err = parse_reply(r#""response": "hi", "thinking": "t", "user_mood": "sleepy", "suggested_questions": [], "debug": {"context_used": false}}"#)
            .unwrap_err();
        assert!(matches!(err, SupportError::InvalidReply { .. }));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_reply("not json at all").is_err());
    }

    #[test]
    fn fallback_is_fixed() {
        let f = fallback_reply();
        assert_eq!(f.response, FALLBACK_RESPONSE);
        assert_eq!(f.thinking, FALLBACK_THINKING);
        assert_eq!(f.user_mood, UserMood::Neutral);
        assert!(f.suggested_questions.is_empty());
        assert!(!f.debug.context_used);
    }
}
