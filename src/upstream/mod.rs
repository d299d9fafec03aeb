//! 上游抽象层
//!
//! 定义 generateContent 请求体、上游错误类型，以及统一的 `Upstream` 接口

mod constants;
pub mod gemini;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use constants::{DEFAULT_API_BASE_URL, DEFAULT_MODEL};
pub use gemini::GeminiClient;

/// generateContent 请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// 一轮对话内容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

impl GenerateContentRequest {
    /// 由单条用户 prompt 构造请求体，文本原样嵌入
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

/// Token 使用统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub candidates_tokens: u64,
    pub total_tokens: u64,
}

/// 从 generateContent 响应中解析 `usageMetadata`
///
/// 响应里没有 `usageMetadata` 时返回 `None`，缺失的单项按 0 计
pub fn parse_usage(response: &Value) -> Option<Usage> {
    let usage = response.get("usageMetadata")?;
    let count = |key: &str| usage.get(key).and_then(|v| v.as_u64()).unwrap_or(0);

    Some(Usage {
        prompt_tokens: count("promptTokenCount"),
        candidates_tokens: count("candidatesTokenCount"),
        total_tokens: count("totalTokenCount"),
    })
}

/// 调用上游时可能出现的错误
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// 连接失败、超时等传输层错误
    #[error("{0}")]
    Transport(String),
    /// 上游返回了非 2xx 状态码
    #[error("upstream returned {status}: {body}")]
    Status {
        status: http::StatusCode,
        body: String,
    },
    /// 上游返回 2xx，但响应体不是合法 JSON
    #[error("invalid upstream response: {0}")]
    Decode(String),
}

/// Upstream Trait - 生成式语言 API 的统一接口
#[async_trait]
pub trait Upstream: Send + Sync {
    /// 模型名称（用于日志）
    fn model(&self) -> &str;
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Value, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_payload_has_single_user_turn() {
        let payload = serde_json::to_value(GenerateContentRequest::from_prompt("hello")).unwrap();
        assert_eq!(
            payload,
            json!({"contents": [{"role": "user", "parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn prompt_text_is_embedded_verbatim() {
        let prompt = "line one\n\"quoted\" <b>tag</b> \u{1F600}";
        let request = GenerateContentRequest::from_prompt(prompt);
        let encoded = serde_json::to_string(&request).unwrap();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded["contents"][0]["parts"][0]["text"], prompt);
    }

    #[test]
    fn usage_is_read_from_metadata() {
        let response = json!({
            "candidates": [],
            "usageMetadata": {
                "promptTokenCount": 4,
                "candidatesTokenCount": 12,
                "totalTokenCount": 16
            }
        });
        assert_eq!(
            parse_usage(&response),
            Some(Usage {
                prompt_tokens: 4,
                candidates_tokens: 12,
                total_tokens: 16,
            })
        );
    }

    #[test]
    fn usage_missing_metadata() {
        assert_eq!(parse_usage(&json!({"candidates": []})), None);
        assert_eq!(
            parse_usage(&json!({"usageMetadata": {"promptTokenCount": 3}})),
            Some(Usage {
                prompt_tokens: 3,
                ..Usage::default()
            })
        );
    }
}
