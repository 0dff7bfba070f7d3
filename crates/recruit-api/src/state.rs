//! 애플리케이션 공유 상태.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::AppConfig;
use crate::gate::EdgeGate;

/// 라우터 전체에서 공유하는 상태.
#[derive(Debug, Clone)]
pub struct AppState {
    /// 요청 게이트
    pub gate: Arc<EdgeGate>,
    /// 설정
    pub config: Arc<AppConfig>,
    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
    /// 버전
    pub version: &'static str,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            gate: Arc::new(EdgeGate::new(config.gate)),
            config: Arc::new(config),
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
