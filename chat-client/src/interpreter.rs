//! Turns assistant payloads into displayable form.

use std::time::Instant;

use chat_contract::{AssistantPayload, StructuredReply, UserMood};
use serde_json::Value;
use tracing::debug;

use crate::conversation::PENDING_TIMEOUT;

/// Shown in place of a reply that cannot be interpreted.
pub const GENERIC_ERROR: &str = "Sorry, something went wrong. Please try again.";

/// Offer to hand the conversation to a human.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectAffordance {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub text: String,
    pub mood: Option<UserMood>,
    pub suggestions: Vec<String>,
    pub redirect: Option<RedirectAffordance>,
    /// `true` when the payload could not be interpreted.
    pub is_error: bool,
}

impl Rendered {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mood: None,
            suggestions: Vec::new(),
            redirect: None,
            is_error: false,
        }
    }

    fn error() -> Self {
        Self {
            is_error: true,
            ..Self::plain(GENERIC_ERROR)
        }
    }
}

fn from_reply(reply: &StructuredReply) -> Rendered {
    Rendered {
        text: reply.response.clone(),
        mood: Some(reply.user_mood),
        suggestions: reply.suggested_questions.clone(),
        redirect: reply
            .redirect_to_agent
            .as_ref()
            .filter(|r| r.should_redirect)
            .map(|r| RedirectAffordance {
                reason: r.reason.clone(),
            }),
        is_error: false,
    }
}

pub fn interpret(payload: &AssistantPayload) -> Rendered {
    match payload {
        AssistantPayload::Structured(reply) => from_reply(reply),
        AssistantPayload::Text(t) => Rendered::plain(t.clone()),
    }
}

/// Interpret a reply stored as JSON text.
///
/// A JSON string whose content is itself JSON is decoded a second time.
/// Anything that does not yield a structured reply renders [`GENERIC_ERROR`].
pub fn interpret_raw(raw: &str) -> Rendered {
    let first: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "assistant payload is not JSON");
            return Rendered::error();
        }
    };

    let value = match first {
        Value::String(inner) => match serde_json::from_str::<Value>(&inner) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "nested assistant payload is not JSON");
                return Rendered::error();
            }
        },
        other => other,
    };

    match serde_json::from_value::<StructuredReply>(value) {
        Ok(reply) => from_reply(&reply),
        Err(e) => {
            debug!(error = %e, "assistant payload is not a structured reply");
            Rendered::error()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Pending,
    TimedOut,
}

/// "Thinking…" indicator that gives up after 30 s.
#[derive(Debug, Clone, Copy)]
pub struct PendingDisplay {
    since: Instant,
}

impl PendingDisplay {
    pub fn start(now: Instant) -> Self {
        Self { since: now }
    }

    pub fn status(&self, now: Instant) -> DisplayStatus {
        if now.saturating_duration_since(self.since) >= PENDING_TIMEOUT {
            DisplayStatus::TimedOut
        } else {
            DisplayStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const REPLY: &str = r#"{"response":"Talk to billing","thinking":"t","user_mood":"frustrated","suggested_questions":["Why?"],"debug":{"context_used":false},"redirect_to_agent":{"should_redirect":true,"reason":"refund"}}"#;

    #[test]
    fn structured_reply_with_redirect() {
        let r = interpret_raw(REPLY);
        assert_eq!(r.text, "Talk to billing");
        assert_eq!(r.mood, Some(UserMood::Frustrated));
        assert_eq!(
            r.redirect,
            Some(RedirectAffordance {
                reason: Some("refund".into())
            })
        );
    }

    #[test]
    fn double_encoded_payload() {
        let twice = serde_json::to_string(REPLY).unwrap();
        assert_eq!(interpret_raw(&twice).text, "Talk to billing");
    }

    #[test]
    fn garbage_renders_generic_error() {
        let r = interpret_raw("{not json");
        assert!(r.is_error);
        assert_eq!(r.text, GENERIC_ERROR);
        assert!(interpret_raw("\"just a string\"").is_error);
    }

    #[test]
    fn text_payload_passes_through() {
        let r = interpret(&AssistantPayload::Text("Revenue grew.".into()));
        assert_eq!(r.text, "Revenue grew.");
        assert!(r.redirect.is_none());
    }

    #[test]
    fn pending_display_times_out() {
        let t0 = Instant::now();
        let d = PendingDisplay::start(t0);
        assert_eq!(d.status(t0 + Duration::from_secs(5)), DisplayStatus::Pending);
        assert_eq!(d.status(t0 + Duration::from_secs(30)), DisplayStatus::TimedOut);
    }
}
