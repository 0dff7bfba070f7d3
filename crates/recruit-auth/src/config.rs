//! 클라이언트 설정.
//!
//! 환경 변수(및 `.env`)에서 로드합니다.
//!
//! - `RECRUIT_API_URL`: 백엔드 기본 URL (기본값: `http://localhost:8080`)
//! - `RECRUIT_API_TIMEOUT_SECS`: HTTP 요청 타임아웃 (기본값: 10)
//! - `RECRUIT_PROBE_BUDGET_MS`: 데모 로그인 시 헬스 체크 제한 시간 (기본값: 2000)
//! - `RECRUIT_OAUTH_CONFIRM_DELAY_MS`: OAuth 성공 후 리다이렉트 지연 (기본값: 1500)
//! - `RECRUIT_OAUTH_ERROR_DELAY_MS`: OAuth 실패 후 `/login` 이동 지연 (기본값: 3000)

use std::time::Duration;

use crate::demo::PROBE_BUDGET;

/// 기본 백엔드 URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Auth Coordinator 및 OAuth 핸드셰이크 설정.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 백엔드 기본 URL (끝의 `/` 제외)
    pub api_base_url: String,
    /// HTTP 요청 타임아웃
    pub request_timeout: Duration,
    /// 헬스 체크 제한 시간
    pub probe_budget: Duration,
    /// OAuth 성공 확인 화면 유지 시간
    pub oauth_confirm_delay: Duration,
    /// OAuth 에러 화면 유지 시간
    pub oauth_error_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            probe_budget: PROBE_BUDGET,
            oauth_confirm_delay: Duration::from_millis(1500),
            oauth_error_delay: Duration::from_millis(3000),
        }
    }
}

impl ClientConfig {
    /// 지정한 백엔드 URL로 생성.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// 환경 변수에서 설정 로드.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let api_base_url =
            std::env::var("RECRUIT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(env_var_parse(
                "RECRUIT_API_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            probe_budget: env_millis("RECRUIT_PROBE_BUDGET_MS", defaults.probe_budget),
            oauth_confirm_delay: env_millis(
                "RECRUIT_OAUTH_CONFIRM_DELAY_MS",
                defaults.oauth_confirm_delay,
            ),
            oauth_error_delay: env_millis("RECRUIT_OAUTH_ERROR_DELAY_MS", defaults.oauth_error_delay),
        }
    }

    /// 즉시 리다이렉트하도록 지연 시간 제거 (CLI용).
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.oauth_confirm_delay = Duration::ZERO;
        self.oauth_error_delay = Duration::ZERO;
        self
    }
}

fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_millis(key: &str, default: Duration) -> Duration {
    Duration::from_millis(env_var_parse(key, default.as_millis() as u64))
}
