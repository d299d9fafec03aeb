//! 处理器错误类型
//!
//! 所有失败都在处理器边界转换为 `{"error": "..."}` JSON 响应

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method not allowed. Use POST.")]
    MethodNotAllowed,
    #[error("Gemini API key is not configured on the server.")]
    Unconfigured,
    #[error("Invalid request body. 'prompt' is required.")]
    InvalidRequest,
    #[error("Failed to connect to Gemini API: {0}")]
    UpstreamConnection(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::InvalidRequest => StatusCode::BAD_REQUEST,
            ProxyError::Unconfigured
            | ProxyError::UpstreamConnection(_)
            | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for ProxyError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Transport(_) | UpstreamError::Status { .. } => {
                ProxyError::UpstreamConnection(err.to_string())
            }
            UpstreamError::Decode(_) => ProxyError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!("{message}");
        } else {
            tracing::warn!("{message}");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ProxyError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ProxyError::InvalidRequest.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::Unconfigured.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::UpstreamConnection("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_errors_map_to_connection_or_internal() {
        let status = ProxyError::from(UpstreamError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "overloaded".into(),
        });
        assert!(matches!(status, ProxyError::UpstreamConnection(_)));
        assert_eq!(
            status.to_string(),
            "Failed to connect to Gemini API: upstream returned 503 Service Unavailable: overloaded"
        );

        let transport = ProxyError::from(UpstreamError::Transport("connection refused".into()));
        assert!(matches!(transport, ProxyError::UpstreamConnection(_)));

        let decode = ProxyError::from(UpstreamError::Decode("expected value".into()));
        assert!(matches!(decode, ProxyError::Internal(_)));
        assert!(decode.to_string().starts_with("Internal server error: "));
    }
}
