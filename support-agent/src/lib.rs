//! Support-agent orchestration with a single public entry point.
//!
//! Public API: [`handle_turn`]. It retrieves context for the latest user
//! message (degrading to "no information" on any retrieval failure), builds
//! the system prompt, calls the model once with a primed `{` assistant turn,
//! repairs and validates the JSON reply, and stamps it with a fresh id.

pub mod categories;
pub mod cfg;
pub mod error;
pub mod prompt;
pub mod reply;

use std::time::Instant;

use ai_llm_service::{
    ChatModel, to_api_messages,
    types::{ApiContent, ApiMessage, MessageRequest},
};
use chat_contract::{RetrievedSource, StructuredReply, SupportRequest};
use knowledge_base::{Retriever, retrieve_context};
use tracing::{debug, info, warn};

pub use categories::{Category, CategoryTaxonomy};
pub use cfg::SupportConfig;
pub use error::SupportError;
pub use reply::{DebugInfo, fallback_reply};

/// Everything the HTTP layer needs to answer one support turn.
#[derive(Debug, Clone)]
pub struct SupportTurn {
    pub reply: StructuredReply,
    pub sources: Vec<RetrievedSource>,
    pub debug: DebugInfo,
}

/// Run one support turn.
///
/// # Errors
/// - [`SupportError::EmptyConversation`] / [`SupportError::EmptyModel`] for unusable input
/// - [`SupportError::Model`] when the model call fails
/// - [`SupportError::InvalidReply`] when the output is not a valid reply
pub async fn handle_turn(
    model: &dyn ChatModel,
    retriever: &dyn Retriever,
    request: &SupportRequest,
    cfg: &SupportConfig,
) -> Result<SupportTurn, SupportError> {
    let started = Instant::now();

    let Some(last) = request.messages.last() else {
        return Err(SupportError::EmptyConversation);
    };
    let model_name = request.model.trim();
    if model_name.is_empty() {
        return Err(SupportError::EmptyModel);
    }

    // 1) Retrieval (never fails)
    let query = last.content.text();
    let outcome = retrieve_context(
        retriever,
        request.knowledge_base_id.as_deref(),
        &query,
        &cfg.retrieval,
    )
    .await;

    // 2) Prompt
    let system = prompt::build_system_prompt(&outcome, &cfg.categories);

    // 3) One primed call
    let mut messages = to_api_messages(&request.messages);
    messages.push(ApiMessage::assistant(ApiContent::Text(reply::PRIME.into())));
    let req = MessageRequest::new(model_name, cfg.max_tokens, messages)
        .system(system)
        .temperature(cfg.temperature);

    debug!(
        model = model_name,
        history = request.messages.len(),
        context_chars = outcome.context.len(),
        "support turn: calling model"
    );
    let resp = model.create_message(req).await?;

    // 4) Validate
    let mut reply = reply::parse_reply(&resp.joined_text()).inspect_err(|e| {
        warn!(model = model_name, error = %e, "support reply rejected");
    })?;

    // 5) Decorate
    reply.id = Some(services::uuid::reply_id());

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let debug = DebugInfo {
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        context_used: outcome.is_rag_working,
        retrieval_error: outcome.error.clone(),
        sources: outcome.sources.len(),
        model: model_name.to_string(),
        latency_ms,
    };

    info!(
        model = model_name,
        mood = reply.user_mood.as_str(),
        rag = outcome.is_rag_working,
        sources = outcome.sources.len(),
        redirect = reply.should_redirect(),
        latency_ms,
        "support turn completed"
    );

    Ok(SupportTurn {
        reply,
        sources: outcome.sources,
        debug,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use ai_llm_service::{
        AiLlmError,
        types::{ApiRole, ContentBlock, MessageResponse},
    };
    use async_trait::async_trait;
    use chat_contract::Message;
    use knowledge_base::{KbError, NoopRetriever, RetrievalHit};

    struct FakeModel {
        text: String,
        seen: Mutex<Option<MessageRequest>>,
    }

    impl FakeModel {
        fn new(text: &str) -> Self {
            Self {
                text: text.into(),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatModel for FakeModel {
        async fn create_message(&self, req: MessageRequest) -> Result<MessageResponse, AiLlmError> {
            *self.seen.lock().unwrap() = Some(req);
            Ok(MessageResponse {
                id: "msg_1".into(),
                model: "m1".into(),
                content: vec![ContentBlock::text(self.text.clone())],
                stop_reason: Some("end_turn".into()),
                usage: None,
            })
        }
    }

    struct OneHit;

    #[async_trait]
    impl Retriever for OneHit {
        async fn retrieve(&self, _: &str, _: &str, n: usize) -> Result<Vec<RetrievalHit>, KbError> {
            assert_eq!(n, 3);
            Ok(vec![RetrievalHit {
                text: Some("Use the Forgot password link.".into()),
                uri: Some("s3://kb/reset_password.txt".into()),
                score: Some(0.8),
                chunk_id: Some("c1".into()),
            }])
        }
    }

    const GOOD: &str = r#""thinking":"t","response":"r","user_mood":"curious","suggested_questions":["q"],"debug":{"context_used":true},"redirect_to_agent":{"should_redirect":false}}"#;

    fn request() -> SupportRequest {
        SupportRequest {
            messages: vec![Message::user("How do I reset my password?")],
            model: "m1".into(),
            knowledge_base_id: Some("kb1".into()),
        }
    }

    #[tokio::test]
    async fn primes_and_validates() {
        let model = FakeModel::new(GOOD);
        let turn = handle_turn(&model, &OneHit, &request(), &SupportConfig::default())
            .await
            .unwrap();

        assert!(turn.reply.id.is_some());
        assert!(!turn.reply.should_redirect());
        assert_eq!(turn.sources.len(), 1);
        assert!(turn.debug.context_used);

        let seen = model.seen.lock().unwrap().take().unwrap();
        let last = seen.messages.last().unwrap();
        assert_eq!(last.role, ApiRole::Assistant);
        assert_eq!(last.content, ApiContent::Text("{".into()));
        assert_eq!(seen.max_tokens, 1000);
        assert!(seen.system.unwrap().contains("Use the Forgot password link."));
    }

    #[tokio::test]
    async fn retrieval_disabled_still_answers() {
        let model = FakeModel::new(GOOD);
        let turn = handle_turn(&model, &NoopRetriever, &request(), &SupportConfig::default())
            .await
            .unwrap();
        assert!(!turn.debug.context_used);
        assert!(turn.sources.is_empty());
        let seen = model.seen.lock().unwrap().take().unwrap();
        assert!(seen.system.unwrap().contains(prompt::NO_INFORMATION));
    }

    #[tokio::test]
    async fn invalid_output_is_an_error() {
        let model = FakeModel::new(r#""response": 5}"#);
        let err = handle_turn(&model, &OneHit, &request(), &SupportConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SupportError::InvalidReply { .. }));
    }

    #[tokio::test]
    async fn empty_conversation_is_rejected() {
        let mut req = request();
        req.messages.clear();
        let err = handle_turn(&FakeModel::new(GOOD), &OneHit, &req, &SupportConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SupportError::EmptyConversation));
    }
}
