//! Serve 命令 - 启动中继服务器

use anyhow::Result;

use crate::config::Config;
use crate::gateway;

/// 执行服务器启动命令
///
/// 未配置 `GEMINI_API_KEY` 时服务器照常启动，POST 请求返回 500。
/// 收到 Ctrl+C 或 SIGTERM 后优雅关闭。
pub async fn serve_command(config: Config) -> Result<()> {
    tracing::debug!(?config, "loaded configuration");
    gateway::serve(config).await
}
