//! 应用配置模块
//!
//! 负责从环境变量加载应用配置，包括：
//! - 服务器监听地址和端口
//! - Gemini API 密钥、模型和上游地址
//! - 上游请求超时

use anyhow::{Context, Result};
use std::time::Duration;

use crate::upstream::{DEFAULT_API_BASE_URL, DEFAULT_MODEL};
use crate::utils::parse_flag;

/// 上游请求默认超时（秒）
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// 应用配置
///
/// 进程启动时加载一次，之后只读
#[derive(Clone)]
pub struct Config {
    /// 服务器监听地址（如 "0.0.0.0" 或 "127.0.0.1"）
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// Gemini API 密钥，未设置或为空时为 `None`
    pub api_key: Option<String>,
    /// Gemini 模型名称
    pub model: String,
    /// Gemini API 根地址（不含版本路径）
    pub api_base_url: String,
    /// 单次上游请求的超时
    pub upstream_timeout: Duration,
    /// 是否跳过上游 TLS 证书校验（仅用于调试）
    pub disable_tls_verify: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("disable_tls_verify", &self.disable_tls_verify)
            .finish()
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// # 环境变量
    ///
    /// - `GEMINI_API_KEY`: Gemini API 密钥（缺失时服务仍会启动，但请求返回 500）
    /// - `GEMINI_MODEL`: 模型名称（默认: "gemini-2.0-flash"）
    /// - `GEMINI_API_BASE_URL`: API 根地址（默认: 官方地址）
    /// - `GEMINI_RELAY_HOST`: 服务器监听地址（默认: "0.0.0.0"）
    /// - `GEMINI_RELAY_PORT`: 服务器监听端口（默认: 8080）
    /// - `GEMINI_RELAY_UPSTREAM_TIMEOUT_SECS`: 上游超时秒数（默认: 30）
    /// - `GEMINI_RELAY_DISABLE_TLS_VERIFY`: 为 "1"/"true" 时跳过证书校验（默认: false）
    ///
    /// # 错误
    ///
    /// - 如果 `GEMINI_RELAY_PORT` 不是有效的端口号
    /// - 如果 `GEMINI_RELAY_UPSTREAM_TIMEOUT_SECS` 不是正整数
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置，便于测试
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("GEMINI_RELAY_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("GEMINI_RELAY_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .context("GEMINI_RELAY_PORT must be a valid port number")?;

        let timeout_secs: u64 = lookup("GEMINI_RELAY_UPSTREAM_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("GEMINI_RELAY_UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);
        if timeout_secs == 0 {
            anyhow::bail!("GEMINI_RELAY_UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }

        let api_key = lookup("GEMINI_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let model = lookup("GEMINI_MODEL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_base_url = lookup("GEMINI_API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let disable_tls_verify = lookup("GEMINI_RELAY_DISABLE_TLS_VERIFY")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            api_key,
            model,
            api_base_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
            disable_tls_verify,
        })
    }

    /// 是否已配置 API 密钥
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
