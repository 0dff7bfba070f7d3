//! OAuth2 핸드셰이크 처리기.
//!
//! 두 가지 리다이렉트 형태를 처리합니다.
//!
//! - 코드 교환: `/oauth2/callback/{provider}?code=...` → 백엔드에 코드를 보내 세션을 받음
//! - 토큰 전달: `/oauth2/success?token=...` → 토큰을 로컬에서 디코딩해 사용자 ID를 얻고
//!   해당 토큰으로 Principal을 조회
//!
//! 실패하면 `/oauth2/error`와 같은 경로로 수렴합니다. 이유를 보여 준 뒤 일정 시간 후
//! `/login`으로 이동하며, 자동 재시도는 하지 않습니다.
//!
//! 상태 전이: `Pending → Success → Redirecting` 또는 `Pending → Failed → Redirecting`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::{DecodingKey, Validation};
use recruit_core::principal::parse_id;
use recruit_core::router::LOGIN_PATH;
use recruit_core::{DecodeError, Principal, Session};
use reqwest::Url;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::coordinator::AuthCoordinator;
use crate::error::AuthError;

/// 코드 교환 콜백 경로 접두사.
pub const CALLBACK_PREFIX: &str = "/oauth2/callback/";
/// 토큰 전달 경로.
pub const SUCCESS_PATH: &str = "/oauth2/success";
/// 공통 에러 경로.
pub const ERROR_PATH: &str = "/oauth2/error";

const DEFAULT_ERROR_REASON: &str = "Error en la autenticación";

/// 지원하는 외부 ID 공급자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Google,
    Github,
    Linkedin,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [
        OAuthProvider::Google,
        OAuthProvider::Github,
        OAuthProvider::Linkedin,
    ];

    /// 경로 세그먼트에서 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Some(OAuthProvider::Google),
            "github" => Some(OAuthProvider::Github),
            "linkedin" => Some(OAuthProvider::Linkedin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Github => "github",
            OAuthProvider::Linkedin => "linkedin",
        }
    }

    /// 백엔드의 공급자 인가 시작 URL.
    pub fn authorization_url(&self, api_base_url: &str) -> String {
        format!(
            "{}/oauth2/authorization/{}",
            api_base_url.trim_end_matches('/'),
            self.as_str()
        )
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AuthError::OAuth(format!("지원하지 않는 공급자: {}", s)))
    }
}

/// 핸드셰이크 진행 상태.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HandshakeState {
    /// 처리 중
    #[default]
    Pending,
    /// 세션 확정, 확인 화면 표시 중
    Success { principal: Principal },
    /// 실패, 이유 표시 중
    Failed { reason: String },
    /// 이동 직전. 실패했다면 이유를 유지합니다.
    Redirecting { to: String, reason: Option<String> },
}

impl HandshakeState {
    /// 표시할 에러 이유.
    pub fn reason(&self) -> Option<&str> {
        match self {
            HandshakeState::Failed { reason } => Some(reason),
            HandshakeState::Redirecting { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

/// 콜백 쿼리 파라미터.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub message: Option<String>,
    pub state: Option<String>,
}

impl CallbackQuery {
    /// 이름-값 쌍에서 구성. 빈 값은 없는 것으로 취급합니다.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value: String = value.into();
            if value.trim().is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "code" => &mut query.code,
                "token" => &mut query.token,
                "error" => &mut query.error,
                "error_description" => &mut query.error_description,
                "message" => &mut query.message,
                "state" => &mut query.state,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    /// URL의 쿼리 문자열에서 구성.
    pub fn from_url(url: &Url) -> Self {
        Self::from_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())))
    }

    /// 공급자가 보고한 에러 이유.
    fn provider_error(&self) -> Option<String> {
        self.error.as_ref().map(|error| match &self.error_description {
            Some(description) => format!("{}: {}", error, description),
            None => error.clone(),
        })
    }
}

/// 절대 URL 또는 경로(`/oauth2/success?token=...`)를 파싱.
pub fn parse_redirect(raw: &str) -> Result<Url, AuthError> {
    Url::parse(raw)
        .or_else(|_| Url::parse("http://localhost").and_then(|base| base.join(raw)))
        .map_err(|e| AuthError::OAuth(format!("잘못된 리다이렉트 URL: {}", e)))
}

/// 토큰에서 사용자 ID 추출.
///
/// 서명은 검증하지 않습니다. 이후 백엔드 호출에서 토큰이 검증됩니다.
/// `id`, `userId`, `sub` 클레임 순서로 찾습니다.
pub fn decode_subject(token: &str) -> Result<u64, DecodeError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    )
    .map_err(|e| DecodeError::Token(e.to_string()))?;

    let mut claims = data.claims;
    let subject = ["id", "userId", "sub"]
        .into_iter()
        .find_map(|key| claims.remove(key).filter(|v| !v.is_null()))
        .ok_or(DecodeError::MissingField("sub"))?;
    parse_id(subject)
}

/// OAuth 콜백 처리기.
pub struct OAuthHandshake {
    coordinator: AuthCoordinator,
    state: watch::Sender<HandshakeState>,
}

impl OAuthHandshake {
    pub fn new(coordinator: AuthCoordinator) -> Self {
        let (state, _) = watch::channel(HandshakeState::Pending);
        Self { coordinator, state }
    }

    /// 상태 구독.
    pub fn subscribe(&self) -> watch::Receiver<HandshakeState> {
        self.state.subscribe()
    }

    /// 현재 상태.
    pub fn state(&self) -> HandshakeState {
        self.state.borrow().clone()
    }

    /// 리다이렉트 URL 경로에 맞는 처리기로 분기.
    pub async fn handle_redirect(&self, raw_url: &str) -> Result<Session, AuthError> {
        let url = match parse_redirect(raw_url) {
            Ok(url) => url,
            Err(e) => return Err(self.fail(e).await),
        };
        let query = CallbackQuery::from_url(&url);
        let path = url.path().trim_end_matches('/');

        if let Some(provider) = path.strip_prefix(CALLBACK_PREFIX) {
            self.handle_code_callback(provider, &query).await
        } else if path == SUCCESS_PATH {
            self.handle_token_callback(&query).await
        } else if path == ERROR_PATH {
            Err(self.handle_error_page(&query).await)
        } else {
            Err(self
                .fail(AuthError::OAuth(format!("알 수 없는 콜백 경로: {}", path)))
                .await)
        }
    }

    /// 코드 교환 콜백.
    ///
    /// `code`가 없으면 교환 엔드포인트를 호출하지 않고 실패 처리합니다.
    pub async fn handle_code_callback(
        &self,
        provider: &str,
        query: &CallbackQuery,
    ) -> Result<Session, AuthError> {
        self.start();

        if let Some(reason) = query.provider_error() {
            return Err(self.fail(AuthError::OAuth(reason)).await);
        }
        let provider = match provider.parse::<OAuthProvider>() {
            Ok(provider) => provider,
            Err(e) => return Err(self.fail(e).await),
        };
        let Some(code) = query.code.as_deref() else {
            return Err(self
                .fail(AuthError::OAuth("No se recibió el código de autorización".to_string()))
                .await);
        };

        debug!(%provider, "Exchanging authorization code");
        match self
            .coordinator
            .backend()
            .exchange_oauth_code(provider, code)
            .await
        {
            Ok(session) => {
                let delay = self.coordinator.config().oauth_confirm_delay;
                Ok(self.succeed(session, delay).await)
            }
            Err(e) => Err(self.fail(e).await),
        }
    }

    /// 토큰 전달 콜백.
    pub async fn handle_token_callback(&self, query: &CallbackQuery) -> Result<Session, AuthError> {
        self.start();

        if let Some(reason) = query.provider_error() {
            return Err(self.fail(AuthError::OAuth(reason)).await);
        }
        let Some(token) = query.token.as_deref() else {
            return Err(self
                .fail(AuthError::OAuth("No se recibió el token".to_string()))
                .await);
        };

        let id = match decode_subject(token) {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e.into()).await),
        };

        match self.coordinator.backend().fetch_principal(id, token).await {
            Ok(principal) => Ok(self
                .succeed(Session::real(principal, token), Duration::ZERO)
                .await),
            Err(e) => Err(self.fail(e).await),
        }
    }

    /// 공통 에러 페이지.
    pub async fn handle_error_page(&self, query: &CallbackQuery) -> AuthError {
        let reason = query
            .message
            .clone()
            .or_else(|| query.provider_error())
            .unwrap_or_else(|| DEFAULT_ERROR_REASON.to_string());
        self.fail(AuthError::OAuth(reason)).await
    }

    fn start(&self) {
        self.coordinator.begin();
        self.state.send_replace(HandshakeState::Pending);
    }

    async fn succeed(&self, session: Session, delay: Duration) -> Session {
        let session = self.coordinator.persist_real(session);
        info!(
            user_id = session.principal.id,
            role = %session.role(),
            "OAuth session established"
        );
        self.state.send_replace(HandshakeState::Success {
            principal: session.principal.clone(),
        });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let to = session.role().home();
        self.state.send_replace(HandshakeState::Redirecting {
            to: to.to_string(),
            reason: None,
        });
        self.coordinator.navigator().replace(to);
        session
    }

    async fn fail(&self, error: AuthError) -> AuthError {
        let error = self.coordinator.record_error(error.into_oauth());
        let reason = match &error {
            AuthError::OAuth(reason) => reason.clone(),
            other => other.to_string(),
        };
        warn!(reason = %reason, "OAuth handshake failed");
        self.state.send_replace(HandshakeState::Failed {
            reason: reason.clone(),
        });

        tokio::time::sleep(self.coordinator.config().oauth_error_delay).await;

        self.state.send_replace(HandshakeState::Redirecting {
            to: LOGIN_PATH.to_string(),
            reason: Some(reason),
        });
        self.coordinator.navigator().replace(LOGIN_PATH);
        error
    }
}
