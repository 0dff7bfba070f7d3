//! Edge Gate 서버.
//!
//! 정적으로 빌드된 포털 페이지를 제공하면서 모든 페이지 요청에 Edge Gate를 적용합니다.
//!
//! # 환경변수
//!
//! - `RECRUIT_CONFIG`: TOML 설정 파일 경로 (기본값: `config/gate.toml`, 없으면 무시)
//! - `RECRUIT__SERVER__HOST`, `RECRUIT__SERVER__PORT` 등: 설정 오버라이드
//! - `RUST_LOG`, `LOG_FORMAT`: 로깅

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use recruit_api::{create_router, setup_metrics_recorder, AppConfig, AppState};
use recruit_core::{init_logging_from_env, LogFormat};
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "config/gate.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    init_logging_from_env(LogFormat::Pretty)
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let config_path = std::env::var("RECRUIT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::load(Some(&config_path))?;
    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. RECRUIT__SERVER__HOST, RECRUIT__SERVER__PORT를 확인하세요."
        );
        e
    })?;

    if !config.assets.dir.is_dir() {
        warn!(dir = %config.assets.dir.display(), "Assets directory not found, pages will 404");
    }

    // 메트릭 레코더는 실패해도 서버는 계속 기동
    let metrics_handle = match setup_metrics_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
            None
        }
    };

    let timeout = config.server.request_timeout();
    info!(
        guard_recruiter_area = config.gate.guard_recruiter_area,
        assets = %config.assets.dir.display(),
        "Edge gate configured"
    );

    let state = Arc::new(AppState::new(config));
    let app = create_router(state, metrics_handle)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ));

    let shutdown_token = CancellationToken::new();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Edge gate listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    shutdown_token.cancel();
    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
        _ = shutdown_token.cancelled() => {}
    }

    shutdown_token.cancel();
}
