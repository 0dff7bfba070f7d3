//! Edge Gate 서버.
//!
//! 채용 포털 페이지 앞에서 쿠키만으로 역할별 접근을 판정합니다.
//!
//! # 모듈 구성
//!
//! - [`gate`]: Edge Gate 미들웨어
//! - [`routes`]: 헬스 체크, 메트릭, 게이트가 적용된 정적 페이지
//! - [`config`]: 서버 설정 (기본값 → TOML → 환경 변수)
//! - [`metrics`]: Prometheus 메트릭
//! - [`middleware`]: HTTP 메트릭 미들웨어

pub mod config;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{AppConfig, AssetsConfig, ServerConfig};
pub use error::ServerError;
pub use gate::{edge_gate, EdgeGate};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::create_router;
pub use state::AppState;
