//! Gemini Relay - Gemini generateContent 中继服务
//!
//! 一个极简的 HTTP 端点：接收前端发来的 prompt，用服务端持有的 API 密钥
//! 转发给 Gemini，再把响应原样返回，并统一加上 CORS 头。
//!
//! # 功能特性
//!
//! - 单一路由 `/`，支持 POST 与 CORS 预检
//! - API 密钥只保存在服务端，不会出现在返回给调用方的错误里
//! - 上游请求有超时上限
//!
//! # 命令行接口
//!
//! - `serve`: 启动中继服务器
//! - `test`: 向本地服务器发送测试 prompt

mod commands;
mod config;
mod gateway;
mod upstream;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Gemini Relay CLI
#[derive(Parser)]
#[command(name = "gemini-relay")]
#[command(about = "CORS-enabled relay for the Gemini generateContent API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 可用的命令
#[derive(Subcommand)]
enum Commands {
    /// 启动中继服务器
    Serve,
    /// 向本地服务器发送测试 prompt
    Test {
        /// 要发送的 prompt
        #[arg(short, long, default_value = "Say hello in one short sentence.")]
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（如果存在）
    if let Ok(dotenv_path) = std::env::var("GEMINI_RELAY_ENV_FILE") {
        dotenvy::from_path(&dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }

    // 初始化日志系统
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_relay=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    // 解析命令行参数和配置
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve => commands::serve_command(config).await,
        Commands::Test { prompt } => commands::test_command(config, prompt).await,
    }
}
