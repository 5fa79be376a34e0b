//! Inline attached files into the last conversation message.

use ai_llm_service::types::{ApiContent, ApiImageSource, ApiMessage, ContentBlock};
use base64::{Engine, engine::general_purpose::STANDARD};
use chat_contract::FileData;

use crate::error::FinanceError;

/// Image types the model API accepts inline.
pub const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Kind of attachment after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Text { file_name: String, text: String },
    Image { media_type: String, data: String },
}

/// `data:<type>;base64,<payload>` → `<payload>`.
fn strip_data_url(b64: &str) -> &str {
    match b64.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => b64,
    }
}

/// Decode and classify an attached file.
///
/// # Errors
/// - [`FinanceError::UnsupportedFile`] for anything but text or a supported image
/// - [`FinanceError::InvalidFile`] for bad base64 or non-UTF-8 text
pub fn classify(file: &FileData) -> Result<Attachment, FinanceError> {
    let payload = strip_data_url(file.base64.trim());
    let invalid = |reason: String| FinanceError::InvalidFile {
        file_name: file.file_name.clone(),
        reason,
    };

    if file.is_text {
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| invalid(format!("base64: {e}")))?;
        let text = String::from_utf8(bytes).map_err(|e| invalid(format!("utf-8: {e}")))?;
        return Ok(Attachment::Text {
            file_name: file.file_name.clone(),
            text,
        });
    }

    let media_type = file.media_type.trim().to_ascii_lowercase();
    if SUPPORTED_IMAGE_TYPES.contains(&media_type.as_str()) {
        STANDARD
            .decode(payload)
            .map_err(|e| invalid(format!("base64: {e}")))?;
        return Ok(Attachment::Image {
            media_type,
            data: payload.to_string(),
        });
    }

    Err(FinanceError::UnsupportedFile {
        media_type: file.media_type.clone(),
    })
}

/// Rewrite the last message so the attachment precedes its text.
///
/// Text files become a `File contents of {name}:` block, images an inline
/// base64 image block. No-op without a file or without messages.
pub fn attach_file(
    messages: &mut [ApiMessage],
    file: Option<&FileData>,
) -> Result<(), FinanceError> {
    let Some(file) = file else {
        return Ok(());
    };
    let attachment = classify(file)?;
    let Some(last) = messages.last_mut() else {
        return Ok(());
    };

    let lead = match attachment {
        Attachment::Text { file_name, text } => {
            ContentBlock::text(format!("File contents of {file_name}:\n\n{text}"))
        }
        Attachment::Image { media_type, data } => ContentBlock::Image {
            source: ApiImageSource {
                kind: "base64".into(),
                media_type,
                data,
            },
        },
    };

    let existing = match std::mem::replace(&mut last.content, ApiContent::Blocks(Vec::new())) {
        ApiContent::Text(t) => vec![ContentBlock::text(t)],
        ApiContent::Blocks(b) => b,
    };
    let mut blocks = Vec::with_capacity(existing.len() + 1);
    blocks.push(lead);
    blocks.extend(existing);
    last.content = ApiContent::Blocks(blocks);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(media_type: &str, body: &[u8], is_text: bool) -> FileData {
        FileData {
            base64: STANDARD.encode(body),
            media_type: media_type.into(),
            file_name: "q3.csv".into(),
            is_text,
        }
    }

    fn user(text: &str) -> Vec<ApiMessage> {
        vec![ApiMessage::user(ApiContent::Text(text.into()))]
    }

    #[test]
    fn text_file_is_prepended() {
        let mut msgs = user("Chart this");
        attach_file(&mut msgs, Some(&file("text/csv", b"month,rev\nJan,10", true))).unwrap();
        assert_eq!(
            msgs[0].content,
            ApiContent::Blocks(vec![
                ContentBlock::text("File contents of q3.csv:\n\nmonth,rev\nJan,10"),
                ContentBlock::text("Chart this"),
            ])
        );
    }

    #[test]
    fn image_goes_first() {
        let mut msgs = user("What is this?");
        attach_file(&mut msgs, Some(&file("image/png", &[137, 80, 78, 71], false))).unwrap();
        let ApiContent::Blocks(b) = &msgs[0].content else {
            panic!("expected blocks");
        };
        assert!(matches!(&b[0], ContentBlock::Image { source } if source.media_type == "image/png"));
        assert_eq!(b[1], ContentBlock::text("What is this?"));
    }

    #[test]
    fn other_types_are_rejected() {
        let mut msgs = user("x");
        let err = attach_file(&mut msgs, Some(&file("application/pdf", b"%PDF", false))).unwrap_err();
        assert!(matches!(err, FinanceError::UnsupportedFile { .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn non_utf8_text_is_invalid() {
        let mut msgs = user("x");
        let err = attach_file(&mut msgs, Some(&file("text/plain", &[0xff, 0xfe], true))).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidFile { .. }));
    }

    #[test]
    fn data_url_prefix_is_accepted() {
        let mut f = file("text/plain", b"hello", true);
        f.base64 = format!("data:text/plain;base64,{}", f.base64);
        assert_eq!(
            classify(&f).unwrap(),
            Attachment::Text {
                file_name: "q3.csv".into(),
                text: "hello".into()
            }
        );
    }
}
