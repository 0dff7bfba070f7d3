//! 쿠키 및 영속 캐시 키, 쿠키 값 인코딩.
//!
//! 쿠키 집합은 Edge Gate와 클라이언트가 공유하는 유일한 상태입니다.
//! `usuario` 쿠키에는 URL 인코딩된 Principal JSON이 들어갑니다.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::DecodeError;
use crate::principal::{Principal, PrincipalPayload, Role};
use crate::router::{GateInput, RoleHint};

/// Bearer 토큰 쿠키.
pub const TOKEN_COOKIE: &str = "token";
/// Principal 쿠키.
pub const PRINCIPAL_COOKIE: &str = "usuario";
/// 데모 모드 쿠키.
pub const DEMO_COOKIE: &str = "demoMode";

/// 데모 플래그 값.
pub const DEMO_FLAG: &str = "true";

/// `token`, `usuario` 쿠키 유효기간 (7일).
pub const SESSION_COOKIE_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// `demoMode` 쿠키 유효기간 (1일).
pub const DEMO_COOKIE_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// 영속 캐시: Bearer 토큰.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// 영속 캐시: Principal JSON.
pub const USER_DATA_KEY: &str = "user_data";
/// 영속 캐시: 데모 플래그.
pub const DEMO_MODE_KEY: &str = "demoMode";
/// 영속 캐시: 데모 역할.
pub const DEMO_ROLE_KEY: &str = "demoUserRole";

/// `Cookie` 헤더 파싱.
///
/// 같은 이름이 여러 번 나오면 첫 번째 값을 사용합니다.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for pair in header.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        cookies
            .entry(name.to_string())
            .or_insert_with(|| value.trim().trim_matches('"').to_string());
    }
    cookies
}

/// 이름-값 쌍으로 `Cookie` 헤더 문자열 생성.
pub fn render_cookie_header<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Principal을 `usuario` 쿠키 값으로 인코딩.
pub fn encode_principal(principal: &Principal) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(principal)?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// `usuario` 쿠키 값을 검증된 Principal로 디코딩.
pub fn decode_principal(raw: &str) -> Result<Principal, DecodeError> {
    let json = urlencoding::decode(raw).map_err(|e| DecodeError::Encoding(e.to_string()))?;
    Principal::from_json(&json)
}

/// `usuario` 쿠키에서 역할만 읽기.
///
/// Edge Gate는 역할 외의 필드를 검증하지 않습니다.
pub fn role_hint(raw: Option<&str>) -> RoleHint {
    let Some(raw) = raw else {
        return RoleHint::Absent;
    };

    let role = urlencoding::decode(raw)
        .ok()
        .and_then(|json| serde_json::from_str::<PrincipalPayload>(&json).ok())
        .and_then(|payload| payload.role)
        .and_then(|role| Role::parse(&role));

    match role {
        Some(role) => RoleHint::Known(role),
        None => RoleHint::Unreadable,
    }
}

impl GateInput {
    /// 파싱된 쿠키에서 Edge Gate 입력 구성.
    pub fn from_cookies(cookies: &HashMap<String, String>) -> Self {
        Self {
            demo: cookies.get(DEMO_COOKIE).is_some_and(|v| v == DEMO_FLAG),
            token: cookies.get(TOKEN_COOKIE).is_some_and(|v| !v.is_empty()),
            role: role_hint(cookies.get(PRINCIPAL_COOKIE).map(String::as_str)),
        }
    }

    /// `Cookie` 헤더에서 Edge Gate 입력 구성.
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        header
            .map(|h| Self::from_cookies(&parse_cookie_header(h)))
            .unwrap_or_default()
    }
}
