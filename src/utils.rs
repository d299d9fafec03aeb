use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

/// 解析布尔型环境变量取值（"1" 或 "true"，不区分大小写）
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// 构建上游请求使用的 HTTP 客户端
///
/// # 参数
///
/// * `timeout` - 单次请求的总超时（连接 + 读取）
/// * `disable_tls_verify` - 是否跳过证书校验（用于调试 mitmproxy 等场景）
pub fn build_http_client(timeout: Duration, disable_tls_verify: bool) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("gemini-relay/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10);

    if disable_tls_verify {
        tracing::warn!("TLS certificate verification is DISABLED - for debugging only!");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().context("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" true "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }
}
