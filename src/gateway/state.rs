//! Gateway 应用状态

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::upstream::{GeminiClient, Upstream};
use crate::utils::build_http_client;

/// Gateway 应用状态
///
/// 只在未配置 API 密钥时 `upstream` 为 `None`
#[derive(Clone)]
pub struct AppState {
    upstream: Option<Arc<dyn Upstream>>,
    model: Arc<str>,
}

impl AppState {
    pub fn new(upstream: Option<Arc<dyn Upstream>>, model: impl Into<Arc<str>>) -> Self {
        Self {
            upstream,
            model: model.into(),
        }
    }

    /// 根据配置构建状态；有密钥时创建 Gemini 客户端
    pub fn from_config(config: &Config) -> Result<Self> {
        let upstream: Option<Arc<dyn Upstream>> = match &config.api_key {
            Some(key) => {
                let http = build_http_client(config.upstream_timeout, config.disable_tls_verify)?;
                let client =
                    GeminiClient::new(http, &config.api_base_url, &config.model, key.clone());
                tracing::info!(endpoint = client.endpoint(), "Gemini upstream configured");
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY is not set; POST requests will fail with 500");
                None
            }
        };

        Ok(Self::new(upstream, config.model.as_str()))
    }

    pub fn upstream(&self) -> Option<&Arc<dyn Upstream>> {
        self.upstream.as_ref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
