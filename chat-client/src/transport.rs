//! HTTP clients for both endpoints.
//!
//! Each `send` drives one full turn: compose, mark the reply pending, call
//! the endpoint once, then resolve or fail the turn. The support client also
//! fans out side-channel notifications.

use std::time::Instant;

use chat_contract::{
    AssistantPayload, FinanceErrorBody, FinanceResponse, RAG_SOURCES_HEADER, RagSourcesUpdate,
    RetrievedSource, SidebarUpdate, StructuredReply,
};
use reqwest::{Response, StatusCode};
use tracing::{debug, warn};

use crate::{
    bus::{Notification, NotificationBus},
    composer::{AttachedFile, compose_finance, compose_support},
    conversation::Conversation,
    error::ClientError,
};

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Decoded `x-rag-sources`; a missing or malformed header yields no sources.
pub fn parse_sources_header(resp: &Response) -> Vec<RetrievedSource> {
    let Some(raw) = resp.headers().get(RAG_SOURCES_HEADER) else {
        return Vec::new();
    };
    match raw.to_str().map(serde_json::from_str::<Vec<RetrievedSource>>) {
        Ok(Ok(sources)) => sources,
        _ => {
            warn!("ignoring malformed {RAG_SOURCES_HEADER} header");
            Vec::new()
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupportClient {
    http: reqwest::Client,
    base_url: String,
    bus: NotificationBus,
}

impl SupportClient {
    pub fn new(base_url: impl Into<String>, bus: NotificationBus) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            bus,
        }
    }

    /// Send the conversation to `POST /api/chat`.
    ///
    /// On success the reply resolves the pending turn and `updateSidebar` /
    /// `updateRagSources` are published; on failure the turn is failed.
    pub async fn send(
        &self,
        conversation: &mut Conversation,
        model: &str,
        knowledge_base_id: Option<&str>,
    ) -> Result<StructuredReply, ClientError> {
        let request = compose_support(conversation, model, knowledge_base_id);
        let query = conversation.last_user_text().unwrap_or_default();
        let turn = conversation.begin_reply(Instant::now())?;

        match self.exchange(&request).await {
            Ok((reply, sources)) => {
                conversation.resolve(&turn, AssistantPayload::Structured(reply.clone()))?;
                self.publish(&turn, &reply, sources, query);
                Ok(reply)
            }
            Err(e) => {
                conversation.fail(&turn, e.to_string())?;
                Err(e)
            }
        }
    }

    async fn exchange(
        &self,
        request: &chat_contract::SupportRequest,
    ) -> Result<(StructuredReply, Vec<RetrievedSource>), ClientError> {
        let url = endpoint(&self.base_url, "/api/chat");
        debug!(%url, messages = request.messages.len(), "support request");

        let resp = self.http.post(&url).json(request).send().await?;
        let status = resp.status();
        let sources = parse_sources_header(&resp);
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            // The fallback reply carries a user-facing message.
            let message = serde_json::from_slice::<StructuredReply>(&bytes)
                .map(|r| r.response)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let reply = serde_json::from_slice::<StructuredReply>(&bytes)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok((reply, sources))
    }

    fn publish(
        &self,
        turn: &str,
        reply: &StructuredReply,
        sources: Vec<RetrievedSource>,
        query: String,
    ) {
        self.bus.publish(Notification::Sidebar(SidebarUpdate {
            id: reply.id.clone().unwrap_or_else(|| turn.to_string()),
            content: reply.thinking.clone(),
            user_mood: reply.user_mood,
            matched_categories: reply.matched_categories.clone().unwrap_or_default(),
            debug: reply.debug,
        }));
        if !sources.is_empty() {
            self.bus.publish(Notification::RagSources(RagSourcesUpdate {
                sources,
                query,
                debug: reply.debug,
            }));
        }
    }
}

#[derive(Debug, Clone)]
pub struct FinanceClient {
    http: reqwest::Client,
    base_url: String,
}

impl FinanceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Send the conversation (and optional file) to `POST /api/finance`.
    ///
    /// The text content resolves the pending turn; the full response (tool
    /// use, chart) is returned for rendering.
    pub async fn send(
        &self,
        conversation: &mut Conversation,
        model: &str,
        file: Option<&AttachedFile>,
    ) -> Result<FinanceResponse, ClientError> {
        let request = compose_finance(conversation, model, file);
        let turn = conversation.begin_reply(Instant::now())?;

        let result = async {
            let url = endpoint(&self.base_url, "/api/finance");
            debug!(%url, has_file = request.file_data.is_some(), "finance request");
            let resp = self.http.post(&url).json(&request).send().await?;
            let status = resp.status();
            let bytes = resp.bytes().await?;
            if !status.is_success() {
                return Err(finance_error(status, &bytes));
            }
            serde_json::from_slice::<FinanceResponse>(&bytes)
                .map_err(|e| ClientError::Decode(e.to_string()))
        }
        .await;

        match result {
            Ok(body) => {
                conversation.resolve(&turn, AssistantPayload::Text(body.content.clone()))?;
                Ok(body)
            }
            Err(e) => {
                conversation.fail(&turn, e.to_string())?;
                Err(e)
            }
        }
    }
}

fn finance_error(status: StatusCode, bytes: &[u8]) -> ClientError {
    let message = match serde_json::from_slice::<FinanceErrorBody>(bytes) {
        Ok(FinanceErrorBody {
            error,
            details: Some(details),
            ..
        }) => format!("{error}: {details}"),
        Ok(body) => body.error,
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    };
    ClientError::Server {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finance_error_prefers_details() {
        let e = finance_error(
            StatusCode::UNAUTHORIZED,
            br#"{"error":"Authentication Error","details":"Invalid API key or authentication failed"}"#,
        );
        assert!(matches!(
            e,
            ClientError::Server { status: 401, ref message }
                if message == "Authentication Error: Invalid API key or authentication failed"
        ));
    }

    #[test]
    fn endpoint_joins_cleanly() {
        assert_eq!(endpoint("http://h:1/", "/api/chat"), "http://h:1/api/chat");
    }
}
