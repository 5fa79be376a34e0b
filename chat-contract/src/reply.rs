use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportRequest {
    pub messages: Vec<Message>,
    pub model: String,
    /// Missing or empty id disables retrieval for this turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_id: Option<String>,
}

/// Mood tag the model assigns to the user's latest message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserMood {
    Positive,
    Neutral,
    Negative,
    Curious,
    Frustrated,
    Confused,
}

impl UserMood {
    pub const ALL: [UserMood; 6] = [
        UserMood::Positive,
        UserMood::Neutral,
        UserMood::Negative,
        UserMood::Curious,
        UserMood::Frustrated,
        UserMood::Confused,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserMood::Positive => "positive",
            UserMood::Neutral => "neutral",
            UserMood::Negative => "negative",
            UserMood::Curious => "curious",
            UserMood::Frustrated => "frustrated",
            UserMood::Confused => "confused",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DebugFlags {
    pub context_used: bool,
}

/// Hand-off to a human agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectDirective {
    pub should_redirect: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Validated output of the support model.
///
/// Deserialization is the schema check: a missing required field or a field
/// of the wrong type rejects the whole reply. Unknown fields are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReply {
    /// Server-generated; absent in raw model output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub response: String,
    pub thinking: String,
    pub user_mood: UserMood,
    pub suggested_questions: Vec<String>,
    pub debug: DebugFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to_agent: Option<RedirectDirective>,
}

impl StructuredReply {
    pub fn should_redirect(&self) -> bool {
        self.redirect_to_agent
            .as_ref()
            .is_some_and(|r| r.should_redirect)
    }
}

/// Typed assistant message body kept by the client.
///
/// Replaces the JSON-string-inside-JSON encoding: structured replies stay
/// typed end to end, plain text stays plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum AssistantPayload {
    Structured(StructuredReply),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full() -> serde_json::Value {
        json!({
            "thinking": "user wants a reset link",
            "response": "Use the 'Forgot password' link.",
            "user_mood": "curious",
            "suggested_questions": ["What if I lost my email?"],
            "debug": {"context_used": true},
            "matched_categories": ["account_management"],
            "redirect_to_agent": {"should_redirect": false}
        })
    }

    #[test]
    fn accepts_complete_reply() {
        let r: StructuredReply = serde_json::from_value(full()).unwrap();
        assert_eq!(r.user_mood, UserMood::Curious);
        assert!(!r.should_redirect());
        assert!(r.id.is_none());
    }

    #[test]
    fn rejects_missing_mood() {
        let mut v = full();
        v.as_object_mut().unwrap().remove("user_mood");
        assert!(serde_json::from_value::<StructuredReply>(v).is_err());
    }

    #[test]
    fn rejects_wrong_type_for_suggestions() {
        let mut v = full();
        v["suggested_questions"] = json!("not a list");
        assert!(serde_json::from_value::<StructuredReply>(v).is_err());
    }

    #[test]
    fn rejects_mood_outside_enum() {
        let mut v = full();
        v["user_mood"] = json!("ecstatic");
        assert!(serde_json::from_value::<StructuredReply>(v).is_err());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let mut v = full();
        let obj = v.as_object_mut().unwrap();
        obj.remove("matched_categories");
        obj.remove("redirect_to_agent");
        let r: StructuredReply = serde_json::from_value(v).unwrap();
        let out = serde_json::to_value(&r).unwrap();
        assert!(out.get("matched_categories").is_none());
        assert!(out.get("redirect_to_agent").is_none());
    }

    #[test]
    fn payload_envelope_is_tagged() {
        let p = AssistantPayload::Text("hi".into());
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({"kind": "text", "body": "hi"})
        );
    }
}
