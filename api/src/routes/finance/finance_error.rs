use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chat_contract::FinanceErrorBody;
use finance_analyst::FinanceError;

/// Status and body for a failed finance turn.
///
/// - validation → 400 `{error}`
/// - upstream authentication → 401 with a fixed message
/// - other upstream API errors → upstream status `{error:"API Error", details, code}`
/// - everything else → 500 `{error}`
pub fn finance_error_parts(err: &FinanceError) -> (StatusCode, FinanceErrorBody) {
    if err.is_validation() {
        return (
            StatusCode::BAD_REQUEST,
            FinanceErrorBody {
                error: err.to_string(),
                details: None,
                code: None,
            },
        );
    }

    if let FinanceError::Model(llm) = err {
        if llm.is_authentication() {
            return (
                StatusCode::UNAUTHORIZED,
                FinanceErrorBody {
                    error: "Authentication Error".into(),
                    details: Some("Invalid API key or authentication failed".into()),
                    code: None,
                },
            );
        }
        if let Some(upstream) = llm.upstream_status() {
            let code = upstream.as_u16();
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY);
            return (
                status,
                FinanceErrorBody {
                    error: "API Error".into(),
                    details: Some(llm.to_string()),
                    code: Some(code),
                },
            );
        }
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        FinanceErrorBody {
            error: err.to_string(),
            details: None,
            code: None,
        },
    )
}

pub fn finance_error_response(err: &FinanceError) -> Response {
    let (status, body) = finance_error_parts(err);
    (status, Json(body)).into_response()
}

/// 400 for a body that could not be parsed as a finance request.
pub fn bad_body_response(details: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(FinanceErrorBody {
            error: "Invalid request body".into(),
            details: Some(details),
            code: None,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{
        AiLlmError, ApiErrorKind,
        error_handler::ApiError,
    };

    fn upstream(status: u16, kind: ApiErrorKind) -> FinanceError {
        FinanceError::Model(AiLlmError::Api(ApiError {
            status: axum::http::StatusCode::from_u16(status).unwrap(),
            kind,
            url: "https://api.example.com/v1/messages".into(),
            message: "upstream said no".into(),
        }))
    }

    #[test]
    fn authentication_maps_to_401() {
        let (status, body) = finance_error_parts(&upstream(401, ApiErrorKind::Authentication));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "Authentication Error");
        assert_eq!(
            body.details.as_deref(),
            Some("Invalid API key or authentication failed")
        );
    }

    #[test]
    fn other_upstream_keeps_status() {
        let (status, body) = finance_error_parts(&upstream(429, ApiErrorKind::RateLimited));
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body.error, "API Error");
        assert_eq!(body.code, Some(429));
    }

    #[test]
    fn validation_is_400_and_chart_errors_500() {
        assert_eq!(
            finance_error_parts(&FinanceError::EmptyConversation).0,
            StatusCode::BAD_REQUEST
        );
        let (status, body) = finance_error_parts(&FinanceError::InvalidChartData("x".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.error.contains("invalid chart data"));
    }
}
