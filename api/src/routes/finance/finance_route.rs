use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use chat_contract::FinanceRequest;
use finance_analyst::handle_turn;
use tracing::{debug, error, warn};

use crate::{
    core::{app_state::AppState, http::headers::REQUEST_ID_HEADER},
    routes::finance::finance_error::{bad_body_response, finance_error_response},
};

/// `POST /api/finance`: one financial-analyst turn.
pub async fn finance_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<FinanceRequest>, JsonRejection>,
) -> Response {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(
                request_id = %request_id,
                error = %rejection.body_text(),
                "finance_route: rejected body"
            );
            return bad_body_response(rejection.body_text());
        }
    };

    debug!(
        request_id = %request_id,
        model = %req.model,
        messages = req.messages.len(),
        file = req.file_data.as_ref().map(|f| f.media_type.as_str()).unwrap_or("-"),
        "finance_route: start"
    );

    match handle_turn(state.model.as_ref(), &req, &state.finance).await {
        Ok(body) => {
            debug!(
                request_id = %request_id,
                has_tool_use = body.has_tool_use,
                "finance_route: success"
            );
            Json(body).into_response()
        }
        Err(err) => {
            if err.is_validation() {
                warn!(request_id = %request_id, error = %err, "finance_route: invalid input");
            } else {
                error!(request_id = %request_id, error = %err, "finance_route: turn failed");
            }
            finance_error_response(&err)
        }
    }
}
