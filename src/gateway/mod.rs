//! Gateway 应用层
//!
//! HTTP 服务器和请求处理

mod error;
mod handlers;
mod middleware;
mod state;

pub use state::AppState;

use anyhow::Result;
use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    BoxError, Router,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use error::ProxyError;

/// 整体请求超时比上游超时多出的余量，保证上游超时以连接错误的形式返回
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

pub async fn serve(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state, config.upstream_timeout + REQUEST_TIMEOUT_MARGIN);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(
        model = %config.model,
        configured = config.is_configured(),
        "Starting server on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

pub(crate) fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", any(handlers::handle_generate))
        .route("/health", get(handlers::handle_health))
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::cors_headers))
                .layer(axum_middleware::from_fn(middleware::request_logger))
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_layer_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}

/// 把中间件层的错误（目前只有整体超时）转换为 JSON 错误响应
async fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        ProxyError::Internal("request timed out".to_string()).into_response()
    } else {
        ProxyError::Internal(err.to_string()).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    tokio::select! {
        _ = ctrl_c => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
