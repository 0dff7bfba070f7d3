//! 서버 기동 에러.

use thiserror::Error;

/// Edge Gate 서버 기동 중 발생하는 에러.
#[derive(Debug, Error)]
pub enum ServerError {
    /// 설정 로드 실패
    #[error("설정 로드 실패: {0}")]
    Config(#[from] config::ConfigError),

    /// 바인딩 주소 오류
    #[error("잘못된 바인딩 주소: {0}")]
    Address(#[from] std::net::AddrParseError),

    /// 메트릭 레코더 설치 실패
    #[error("메트릭 레코더 설치 실패: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// 소켓 입출력 실패
    #[error("입출력 실패: {0}")]
    Io(#[from] std::io::Error),
}
