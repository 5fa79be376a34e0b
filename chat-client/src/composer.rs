//! Builds outgoing request bodies from the conversation.

use base64::{Engine, engine::general_purpose::STANDARD};
use chat_contract::{FileData, FinanceRequest, SupportRequest};

use crate::{conversation::Conversation, error::ClientError};

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "csv", "tsv", "json", "xml", "yaml", "yml", "log", "html",
];

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Image,
}

/// A file the user picked, classified before upload.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedFile {
    pub file_name: String,
    pub media_type: String,
    pub kind: FileKind,
    pub bytes: Vec<u8>,
}

impl AttachedFile {
    /// Text when the media type is `text/*` or the extension is a known text
    /// format; image for supported `image/*` types; anything else is rejected.
    pub fn from_upload(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ClientError> {
        let file_name = file_name.into();
        let media_type = media_type.into().trim().to_ascii_lowercase();

        let ext = file_name
            .rsplit_once('.')
            .map(|(_, e)| e.to_ascii_lowercase())
            .unwrap_or_default();

        let kind = if media_type.starts_with("text/") || TEXT_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Text
        } else if IMAGE_TYPES.contains(&media_type.as_str()) {
            FileKind::Image
        } else {
            return Err(ClientError::UnsupportedFile {
                file_name,
                media_type,
            });
        };

        Ok(Self {
            file_name,
            media_type,
            kind,
            bytes,
        })
    }

    pub fn to_file_data(&self) -> FileData {
        FileData {
            base64: STANDARD.encode(&self.bytes),
            media_type: self.media_type.clone(),
            file_name: self.file_name.clone(),
            is_text: self.kind == FileKind::Text,
        }
    }
}

pub fn compose_support(
    conversation: &Conversation,
    model: &str,
    knowledge_base_id: Option<&str>,
) -> SupportRequest {
    SupportRequest {
        messages: conversation.wire_messages(),
        model: model.to_string(),
        knowledge_base_id: knowledge_base_id.map(str::to_string),
    }
}

pub fn compose_finance(
    conversation: &Conversation,
    model: &str,
    file: Option<&AttachedFile>,
) -> FinanceRequest {
    FinanceRequest {
        messages: conversation.wire_messages(),
        file_data: file.map(AttachedFile::to_file_data),
        model: model.to_string(),
    }
}
