#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use ai_llm_service::{
    AiLlmError, ApiErrorKind, ChatModel,
    error_handler::ApiError,
    types::{ContentBlock, MessageRequest, MessageResponse},
};
use api::core::app_state::AppState;
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode},
};
use finance_analyst::FinanceConfig;
use knowledge_base::{KbError, Retriever, RetrievalHit};
use serde_json::Value;
use support_agent::{SupportConfig, prompt::NO_INFORMATION};
use tower::ServiceExt;

/// Model double: a scripted outcome plus the last request it saw.
pub struct FakeModel {
    script: Script,
    pub seen: Mutex<Vec<MessageRequest>>,
}

pub enum Script {
    /// Valid support reply; `debug.context_used` mirrors whether the system
    /// prompt carried retrieved information.
    SupportReply,
    /// Fixed content blocks.
    Blocks(Vec<ContentBlock>),
    /// Upstream error with this status and kind.
    Upstream(u16, ApiErrorKind),
}

impl FakeModel {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn last_request(&self) -> MessageRequest {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl ChatModel for FakeModel {
    async fn create_message(&self, req: MessageRequest) -> Result<MessageResponse, AiLlmError> {
        let system = req.system.clone().unwrap_or_default();
        self.seen.lock().unwrap().push(req);

        let content = match &self.script {
            Script::SupportReply => {
                let used = !system.contains(NO_INFORMATION);
                // Completion after the primed "{"; raw newline inside a string on purpose.
                vec![ContentBlock::text(format!(
                    r#""thinking": "Looked at the information block.",
  "response": "Open Settings and choose
Reset password.",
  "user_mood": "curious",
  "suggested_questions": ["What if I lost access to my email?"],
  "debug": {{"context_used": {used}}},
  "matched_categories": ["account_management"],
  "redirect_to_agent": {{"should_redirect": false}}
}}"#
                ))]
            }
            Script::Blocks(blocks) => blocks.clone(),
            Script::Upstream(status, kind) => {
                return Err(AiLlmError::Api(ApiError {
                    status: StatusCode::from_u16(*status).unwrap(),
                    kind: *kind,
                    url: "https://api.example.com/v1/messages".into(),
                    message: "upstream failure".into(),
                }));
            }
        };

        Ok(MessageResponse {
            id: "msg_test".into(),
            model: "m1".into(),
            content,
            stop_reason: Some("end_turn".into()),
            usage: None,
        })
    }
}

/// Retriever double.
pub enum FakeRetriever {
    Hits(Vec<RetrievalHit>),
    Down,
}

#[async_trait]
impl Retriever for FakeRetriever {
    async fn retrieve(
        &self,
        _knowledge_base_id: &str,
        _query: &str,
        _max_results: usize,
    ) -> Result<Vec<RetrievalHit>, KbError> {
        match self {
            FakeRetriever::Hits(h) => Ok(h.clone()),
            FakeRetriever::Down => Err(KbError::Status {
                status: 503,
                snippet: "connection refused".into(),
            }),
        }
    }
}

pub fn reset_password_hit(score: f32) -> RetrievalHit {
    RetrievalHit {
        text: Some("To reset your password, open Settings and choose Reset password.".into()),
        uri: Some("s3://support-kb/docs/reset_password.txt".into()),
        score: Some(score),
        chunk_id: Some("chunk-reset-1".into()),
    }
}

pub fn app(model: Arc<FakeModel>, retriever: FakeRetriever) -> Router {
    let state = AppState::new(
        model,
        Arc::new(retriever),
        SupportConfig::default(),
        FinanceConfig::default(),
    );
    api::router(Arc::new(state))
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn send(app: Router, req: Request<Body>) -> Response<Body> {
    app.oneshot(req).await.unwrap()
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
