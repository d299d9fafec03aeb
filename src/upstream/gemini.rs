//! Gemini generateContent 客户端
//!
//! 使用服务端持有的 API 密钥（查询参数 `key`）调用上游

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::constants::{API_KEY_PARAM, API_VERSION};
use super::{GenerateContentRequest, Upstream, UpstreamError};

pub struct GeminiClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// # 参数
    ///
    /// * `http` - 共享的 HTTP 客户端（超时已在其上配置）
    /// * `base_url` - API 根地址，如 `https://generativelanguage.googleapis.com`
    /// * `model` - 模型名称
    /// * `api_key` - API 密钥
    pub fn new(http: Client, base_url: &str, model: &str, api_key: String) -> Self {
        Self {
            http,
            endpoint: endpoint_url(base_url, model),
            model: model.to_string(),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 把错误文本里出现的密钥替换掉
    fn redact(&self, text: &str) -> String {
        text.replace(&self.api_key, "<redacted>")
    }

    /// 展开 reqwest 错误及其 source 链，不带请求 URL（URL 里有密钥）
    fn describe_transport_error(&self, err: reqwest::Error) -> UpstreamError {
        let err = err.without_url();
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        UpstreamError::Transport(self.redact(&message))
    }
}

/// 拼出 `{base}/v1beta/models/{model}:generateContent`
pub fn endpoint_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        API_VERSION,
        model
    )
}

#[async_trait]
impl Upstream for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Value, UpstreamError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[(API_KEY_PARAM, self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| self.describe_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "gemini returned an error status");
            return Err(UpstreamError::Status {
                status,
                body: self.redact(body.trim()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.describe_transport_error(e))?;

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}
