//! 인증 흐름 에러 타입.

use recruit_core::DecodeError;
use thiserror::Error;

/// 로그인, 데모 모드, OAuth 핸드셰이크에서 발생하는 에러.
///
/// Auth Coordinator는 협력자의 에러를 모두 이 타입으로 받아
/// 하나의 `error` 필드로 노출합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// 이메일/비밀번호 불일치
    #[error("이메일 또는 비밀번호가 올바르지 않습니다")]
    Credentials,

    /// 백엔드 연결 불가
    #[error("서버에 연결할 수 없습니다: {0}")]
    Network(String),

    /// 백엔드가 살아 있어 데모 계정을 거부함
    #[error("데모 모드를 사용할 수 없습니다: 서버가 실행 중이므로 실제 계정으로 로그인하세요")]
    DemoUnavailable,

    /// OAuth 핸드셰이크 실패
    #[error("OAuth 인증 실패: {0}")]
    OAuth(String),

    /// 응답 형식 오류
    #[error("응답 형식 오류: {0}")]
    Decode(#[from] DecodeError),

    /// 그 외 백엔드 에러 응답
    #[error("서버 에러 ({status}): {message}")]
    Backend { status: u16, message: String },
}

impl AuthError {
    /// 에러 코드 (CLI/로그 출력용).
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Credentials => "CREDENTIALS",
            AuthError::Network(_) => "NETWORK",
            AuthError::DemoUnavailable => "DEMO_UNAVAILABLE",
            AuthError::OAuth(_) => "OAUTH",
            AuthError::Decode(_) => "DECODE",
            AuthError::Backend { .. } => "BACKEND",
        }
    }

    /// OAuth 핸드셰이크 경계에서의 분류.
    ///
    /// 디코딩 실패와 백엔드 에러도 OAuth 에러로 취급합니다.
    #[must_use]
    pub fn into_oauth(self) -> Self {
        match self {
            AuthError::OAuth(_) => self,
            other => AuthError::OAuth(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AuthError::Decode(DecodeError::Json(err.to_string()))
        } else {
            AuthError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_oauth_classifies_decode_errors() {
        let err = AuthError::Decode(DecodeError::Token("bad segment".to_string())).into_oauth();
        assert!(matches!(err, AuthError::OAuth(ref msg) if msg.contains("bad segment")));

        let already = AuthError::OAuth("missing code".to_string()).into_oauth();
        assert_eq!(already, AuthError::OAuth("missing code".to_string()));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthError::Credentials.code(), "CREDENTIALS");
        assert_eq!(AuthError::DemoUnavailable.code(), "DEMO_UNAVAILABLE");
        assert_eq!(
            AuthError::Backend {
                status: 500,
                message: "boom".to_string()
            }
            .code(),
            "BACKEND"
        );
    }
}
