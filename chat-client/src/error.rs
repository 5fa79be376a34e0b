//! Typed error for the chat-client crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// A reply is already outstanding; input stays disabled until it settles.
    #[error("a reply is already pending")]
    Busy,

    #[error("unknown turn: {0}")]
    UnknownTurn(String),

    #[error("nothing to send")]
    EmptyInput,

    /// Upload is neither text nor a supported image.
    #[error("unsupported file '{file_name}' ({media_type})")]
    UnsupportedFile {
        file_name: String,
        media_type: String,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(String),
}
