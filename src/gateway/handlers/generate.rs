//! generateContent 中继处理器

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::Value;

use crate::gateway::{error::ProxyError, state::AppState};
use crate::upstream::{parse_usage, GenerateContentRequest};

/// 从调用方请求体中取出 `prompt`
///
/// 先解析为 `Value`，重复的 `prompt` 键以最后一个为准；其他字段忽略
fn extract_prompt(body: &[u8]) -> Result<String, ProxyError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("rejected request body: {e}");
        ProxyError::InvalidRequest
    })?;

    match value.get("prompt") {
        Some(Value::String(prompt)) => Ok(prompt.clone()),
        _ => Err(ProxyError::InvalidRequest),
    }
}

/// `/` 处理器
///
/// - OPTIONS: 预检，直接 204
/// - POST: 转发到 Gemini
/// - 其他方法: 405
pub async fn handle_generate(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    if method != Method::POST {
        return ProxyError::MethodNotAllowed.into_response();
    }

    match generate(&state, &body).await {
        Ok(response_body) => (StatusCode::OK, Json(response_body)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn generate(state: &AppState, body: &[u8]) -> Result<Value, ProxyError> {
    let upstream = state.upstream().ok_or(ProxyError::Unconfigured)?;

    let prompt = extract_prompt(body)?;

    let prompt_chars = prompt.chars().count();
    let payload = GenerateContentRequest::from_prompt(prompt);

    tracing::info!(model = upstream.model(), prompt_chars, "request");

    let response_body = upstream.generate_content(&payload).await?;

    if let Some(usage) = parse_usage(&response_body) {
        tracing::info!(
            model = upstream.model(),
            prompt_tokens = usage.prompt_tokens,
            candidates_tokens = usage.candidates_tokens,
            total_tokens = usage.total_tokens,
            "response"
        );
    }

    Ok(response_body)
}
