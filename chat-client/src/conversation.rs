//! In-memory conversation mirror for one page view.
//!
//! Assistant turns move `Pending → Resolved | Failed` in place; at most one
//! turn is pending at a time.

use std::time::{Duration, Instant};

use chat_contract::{AssistantPayload, FileData, Message, MessageContent};
use tracing::debug;

use crate::error::ClientError;

/// Advisory display timeout of a pending reply.
pub const PENDING_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub enum TurnState {
    Pending { since: Instant },
    Resolved(AssistantPayload),
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    User(Message),
    Assistant { id: String, state: TurnState },
}

#[derive(Debug, Default, Clone)]
pub struct Conversation {
    entries: Vec<Entry>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// `true` while an assistant turn is pending.
    pub fn is_busy(&self) -> bool {
        self.entries.iter().any(|e| {
            matches!(
                e,
                Entry::Assistant {
                    state: TurnState::Pending { .. },
                    ..
                }
            )
        })
    }

    /// Append a user message.
    pub fn push_user(
        &mut self,
        content: impl Into<MessageContent>,
        file: Option<FileData>,
    ) -> Result<(), ClientError> {
        if self.is_busy() {
            return Err(ClientError::Busy);
        }
        let content = content.into();
        if content.text().trim().is_empty() && file.is_none() {
            return Err(ClientError::EmptyInput);
        }
        let mut msg = Message::user(content);
        msg.id = Some(uuid::Uuid::new_v4().to_string());
        msg.file = file;
        self.entries.push(Entry::User(msg));
        Ok(())
    }

    /// Insert a pending assistant turn and return its id.
    pub fn begin_reply(&mut self, now: Instant) -> Result<String, ClientError> {
        if self.is_busy() {
            return Err(ClientError::Busy);
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.entries.push(Entry::Assistant {
            id: id.clone(),
            state: TurnState::Pending { since: now },
        });
        Ok(id)
    }

    pub fn resolve(&mut self, id: &str, payload: AssistantPayload) -> Result<(), ClientError> {
        *self.pending_state(id)? = TurnState::Resolved(payload);
        Ok(())
    }

    pub fn fail(&mut self, id: &str, reason: impl Into<String>) -> Result<(), ClientError> {
        *self.pending_state(id)? = TurnState::Failed {
            reason: reason.into(),
        };
        Ok(())
    }

    /// Fail every turn pending for longer than [`PENDING_TIMEOUT`]; returns their ids.
    pub fn expire_pending(&mut self, now: Instant) -> Vec<String> {
        let mut expired = Vec::new();
        for entry in &mut self.entries {
            if let Entry::Assistant { id, state } = entry {
                if let TurnState::Pending { since } = state {
                    if now.saturating_duration_since(*since) >= PENDING_TIMEOUT {
                        debug!(turn = %id, "pending reply timed out");
                        *state = TurnState::Failed {
                            reason: "timed out".into(),
                        };
                        expired.push(id.clone());
                    }
                }
            }
        }
        expired
    }

    /// Messages resent to the server: user entries and resolved replies, in
    /// order. Structured replies travel as their JSON text.
    pub fn wire_messages(&self) -> Vec<Message> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::User(m) => Some(m.clone()),
                Entry::Assistant {
                    id,
                    state: TurnState::Resolved(payload),
                } => {
                    let text = match payload {
                        AssistantPayload::Structured(reply) => serde_json::to_string(reply).ok()?,
                        AssistantPayload::Text(t) => t.clone(),
                    };
                    let mut m = Message::assistant(text);
                    m.id = Some(id.clone());
                    Some(m)
                }
                Entry::Assistant { .. } => None,
            })
            .collect()
    }

    /// Text of the most recent user message.
    pub fn last_user_text(&self) -> Option<String> {
        self.entries.iter().rev().find_map(|e| match e {
            Entry::User(m) => Some(m.content.text()),
            Entry::Assistant { .. } => None,
        })
    }

    fn pending_state(&mut self, id: &str) -> Result<&mut TurnState, ClientError> {
        self.entries
            .iter_mut()
            .find_map(|e| match e {
                Entry::Assistant { id: eid, state }
                    if eid == id && matches!(state, TurnState::Pending { .. }) =>
                {
                    Some(state)
                }
                _ => None,
            })
            .ok_or_else(|| ClientError::UnknownTurn(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_pending_turn_at_a_time() {
        let mut c = Conversation::new();
        c.push_user("hi", None).unwrap();
        let now = Instant::now();
        let id = c.begin_reply(now).unwrap();
        assert!(c.is_busy());
        assert!(matches!(c.begin_reply(now), Err(ClientError::Busy)));
        assert!(matches!(c.push_user("again", None), Err(ClientError::Busy)));

        c.resolve(&id, AssistantPayload::Text("hello".into())).unwrap();
        assert!(!c.is_busy());
        assert!(matches!(
            c.resolve(&id, AssistantPayload::Text("twice".into())),
            Err(ClientError::UnknownTurn(_))
        ));
    }

    #[test]
    fn wire_messages_skip_pending_and_failed() {
        let mut c = Conversation::new();
        let t0 = Instant::now();
        c.push_user("first", None).unwrap();
        let a = c.begin_reply(t0).unwrap();
        c.fail(&a, "boom").unwrap();
        c.push_user("second", None).unwrap();
        let b = c.begin_reply(t0).unwrap();
        c.resolve(&b, AssistantPayload::Text("answer".into())).unwrap();
        c.push_user("third", None).unwrap();
        c.begin_reply(t0).unwrap();

        let wire: Vec<_> = c.wire_messages().iter().map(|m| m.content.text()).collect();
        assert_eq!(wire, ["first", "second", "answer", "third"]);
    }

    #[test]
    fn pending_expires_after_timeout() {
        let mut c = Conversation::new();
        c.push_user("q", None).unwrap();
        let t0 = Instant::now();
        let id = c.begin_reply(t0).unwrap();

        assert!(c.expire_pending(t0 + Duration::from_secs(29)).is_empty());
        assert_eq!(c.expire_pending(t0 + PENDING_TIMEOUT), vec![id]);
        assert!(!c.is_busy());
    }

    #[test]
    fn blank_input_is_rejected() {
        let mut c = Conversation::new();
        assert!(matches!(c.push_user("   ", None), Err(ClientError::EmptyInput)));
    }
}
