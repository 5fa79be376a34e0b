use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chat_contract::{DEBUG_DATA_HEADER, RAG_SOURCES_HEADER, SupportRequest};
use support_agent::{fallback_reply, handle_turn};
use tracing::{debug, error};

use crate::core::{
    app_state::AppState,
    http::headers::{REQUEST_ID_HEADER, debug_data_value, insert_opt, rag_sources_value},
};

/// `POST /api/chat`: one support-agent turn.
///
/// 200 with the validated reply plus `x-rag-sources` / `X-Debug-Data`, or
/// 500 with the fixed fallback reply on any failure.
pub async fn chat_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SupportRequest>,
) -> Response {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    debug!(
        request_id = %request_id,
        model = %req.model,
        messages = req.messages.len(),
        knowledge_base = req.knowledge_base_id.as_deref().unwrap_or("-"),
        "chat_route: start"
    );

    match handle_turn(
        state.model.as_ref(),
        state.retriever.as_ref(),
        &req,
        &state.support,
    )
    .await
    {
        Ok(turn) => {
            debug!(
                request_id = %request_id,
                sources = turn.sources.len(),
                "chat_route: success"
            );

            let mut resp = Json(&turn.reply).into_response();
            let out = resp.headers_mut();
            if !turn.sources.is_empty() {
                insert_opt(out, RAG_SOURCES_HEADER, rag_sources_value(&turn.sources));
            }
            insert_opt(
                out,
                DEBUG_DATA_HEADER,
                debug_data_value(&turn.debug, state.support.debug_budget),
            );
            resp
        }
        Err(err) => {
            error!(
                request_id = %request_id,
                error = %err,
                "chat_route: turn failed"
            );

            let mut body = fallback_reply();
            body.id = Some(services::uuid::reply_id());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
