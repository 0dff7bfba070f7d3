//! 서버 설정.
//!
//! 기본값 → TOML 파일(선택) → `RECRUIT__` 환경 변수 순서로 덮어씁니다.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [gate]
//! guard_recruiter_area = false
//!
//! [assets]
//! dir = "public"
//! ```
//!
//! 환경 변수 예: `RECRUIT__SERVER__PORT=8081`, `RECRUIT__GATE__GUARD_RECRUITER_AREA=true`

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use recruit_core::GatePolicy;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;

/// 전체 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// Edge Gate 적용 범위
    #[serde(default)]
    pub gate: GatePolicy,
    /// 정적 페이지 설정
    pub assets: AssetsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 에러를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// 요청 타임아웃.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 정적 페이지 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// 빌드된 페이지 디렉터리
    pub dir: PathBuf,
    /// 클라이언트 라우팅용 대체 파일
    pub index: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public"),
            index: "index.html".to_string(),
        }
    }
}

impl AssetsConfig {
    /// 대체 파일 경로.
    pub fn index_path(&self) -> PathBuf {
        self.dir.join(&self.index)
    }
}

impl AppConfig {
    /// 파일(있으면)과 환경 변수에서 설정을 로드합니다.
    pub fn load(path: Option<&Path>) -> Result<Self, ServerError> {
        let mut builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("gate.guard_recruiter_area", false)?
            .set_default("assets.dir", "public")?
            .set_default("assets.index", "index.html")?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config = builder
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("RECRUIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
