//! Conversions from conversation messages to Messages API payloads.

use chat_contract::{ContentPart, Message, MessageContent, Role};

use crate::types::{ApiContent, ApiImageSource, ApiMessage, ApiRole, ContentBlock};

impl From<Role> for ApiRole {
    fn from(r: Role) -> Self {
        match r {
            Role::User => ApiRole::User,
            Role::Assistant => ApiRole::Assistant,
        }
    }
}

impl From<ContentPart> for ContentBlock {
    fn from(p: ContentPart) -> Self {
        match p {
            ContentPart::Text { text } => ContentBlock::Text { text },
            ContentPart::Image { source } => ContentBlock::Image {
                source: ApiImageSource {
                    kind: source.kind,
                    media_type: source.media_type,
                    data: source.data,
                },
            },
        }
    }
}

impl From<MessageContent> for ApiContent {
    fn from(c: MessageContent) -> Self {
        match c {
            MessageContent::Text(t) => ApiContent::Text(t),
            MessageContent::Parts(parts) => {
                ApiContent::Blocks(parts.into_iter().map(ContentBlock::from).collect())
            }
        }
    }
}

/// Role and content only; ids and attachments stay client-side.
impl From<&Message> for ApiMessage {
    fn from(m: &Message) -> Self {
        ApiMessage {
            role: m.role.into(),
            content: m.content.clone().into(),
        }
    }
}

/// Convert a whole conversation, preserving order.
pub fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
    messages.iter().map(ApiMessage::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_contract::ImageSource;

    #[test]
    fn keeps_order_and_parts() {
        let msgs = vec![
            Message::user("hi"),
            Message::assistant("hello"),
            Message::user(MessageContent::Parts(vec![
                ContentPart::Image {
                    source: ImageSource::base64("image/png", "AAAA"),
                },
                ContentPart::Text {
                    text: "what is this?".into(),
                },
            ])),
        ];
        let api = to_api_messages(&msgs);
        assert_eq!(api.len(), 3);
        assert_eq!(api[1].role, ApiRole::Assistant);
        match &api[2].content {
            ApiContent::Blocks(b) => {
                assert!(matches!(b[0], ContentBlock::Image { .. }));
                assert_eq!(b[1], ContentBlock::text("what is this?"));
            }
            other => panic!("unexpected content {other:?}"),
        }
    }
}
