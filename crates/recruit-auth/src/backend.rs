//! 백엔드 인증 계약과 HTTP 구현.
//!
//! 실제 자격 증명 검증은 백엔드의 책임이며, 이 모듈은 다음 계약으로만 소비합니다:
//!
//! - `POST /api/auth/login` → `{token, usuario}`
//! - `GET /api/health` → 200 이면 살아 있음
//! - `POST /api/auth/oauth2/{provider}` (`{code}`) → `{token, usuario}`
//! - `GET /api/usuarios/{id}` (`Authorization: Bearer`) → Principal 형태 객체
//! - `POST /api/auth/logout` (`Authorization: Bearer`)
//!
//! 모든 응답 본문은 [`Principal::try_from`]을 거쳐 검증된 뒤에만 세션이 됩니다.

use std::time::Duration;

use async_trait::async_trait;
use recruit_core::{DecodeError, Principal, PrincipalPayload, Session};
use reqwest::{header::AUTHORIZATION, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::oauth::OAuthProvider;

/// 인증 백엔드 계약.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// 이메일/비밀번호 로그인.
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// 백엔드 생존 여부.
    async fn health(&self) -> Result<bool, AuthError>;

    /// OAuth 인증 코드를 세션으로 교환.
    async fn exchange_oauth_code(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> Result<Session, AuthError>;

    /// ID로 Principal 조회.
    async fn fetch_principal(&self, id: u64, token: &str) -> Result<Principal, AuthError>;

    /// 토큰 무효화.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;
}

/// 로그인 요청 본문.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// OAuth 코드 교환 요청 본문.
#[derive(Debug, Serialize)]
struct CodeExchangeRequest<'a> {
    code: &'a str,
}

/// 로그인/코드 교환 응답.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default, alias = "accessToken", alias = "access_token")]
    token: Option<String>,
    #[serde(default, alias = "user", alias = "usuarioDto")]
    usuario: Option<PrincipalPayload>,
}

impl TryFrom<TokenResponse> for Session {
    type Error = DecodeError;

    fn try_from(response: TokenResponse) -> Result<Self, Self::Error> {
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or(DecodeError::MissingField("token"))?;
        let principal = Principal::try_from(
            response
                .usuario
                .ok_or(DecodeError::MissingField("usuario"))?,
        )?;
        Ok(Session::real(principal, token))
    }
}

/// 에러 응답 본문에서 메시지 추출.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "mensaje", alias = "error")]
    message: Option<String>,
}

/// reqwest 기반 백엔드 클라이언트.
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    base_url: String,
    client: Client,
}

impl HttpAuthBackend {
    /// 새 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `AuthError::Network`를 반환합니다.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Network(format!("HTTP client 생성 실패: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// 클라이언트 설정으로 생성.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AuthError> {
        Self::new(&config.api_base_url, config.request_timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 성공이 아닌 응답을 에러로 변환.
    async fn reject(response: Response) -> AuthError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown")
                    .to_string()
            });

        AuthError::Backend {
            status: status.as_u16(),
            message,
        }
    }

    async fn session_from(response: Response) -> Result<Session, AuthError> {
        let body: TokenResponse = response.json().await?;
        Ok(Session::try_from(body)?)
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Self::session_from(response).await,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!(status = %response.status(), "Credential login rejected");
                Err(AuthError::Credentials)
            }
            _ => Err(Self::reject(response).await),
        }
    }

    async fn health(&self) -> Result<bool, AuthError> {
        let response = self.client.get(self.url("/api/health")).send().await?;
        Ok(response.status().is_success())
    }

    async fn exchange_oauth_code(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.url(&format!("/api/auth/oauth2/{}", provider.as_str())))
            .json(&CodeExchangeRequest { code })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Self::session_from(response).await
    }

    async fn fetch_principal(&self, id: u64, token: &str) -> Result<Principal, AuthError> {
        let response = self
            .client
            .get(self.url(&format!("/api/usuarios/{}", id)))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        let value: serde_json::Value = response.json().await?;
        Ok(Principal::from_value(value)?)
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url("/api/auth/logout"))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::reject(response).await;
            warn!(error = %err, "Backend logout rejected");
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruit_core::Role;
    use serde_json::json;

    #[test]
    fn test_token_response_into_session() {
        let response: TokenResponse = serde_json::from_value(json!({
            "token": "jwt-abc",
            "usuario": {"id": 4, "email": "r@empresa.com", "nombre": "Rita", "rol": "RECLUTADOR"}
        }))
        .unwrap();

        let session = Session::try_from(response).unwrap();
        assert_eq!(session.token.as_deref(), Some("jwt-abc"));
        assert_eq!(session.role(), Role::Recruiter);
    }

    #[test]
    fn test_token_response_requires_token() {
        let response: TokenResponse = serde_json::from_value(json!({
            "usuario": {"id": 4, "email": "r@empresa.com", "rol": "RECLUTADOR"}
        }))
        .unwrap();
        assert_eq!(
            Session::try_from(response),
            Err(DecodeError::MissingField("token"))
        );
    }

    #[tokio::test]
    async fn test_login_maps_unauthorized_to_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .with_body(r#"{"message":"bad credentials"}"#)
            .create_async()
            .await;

        let backend = HttpAuthBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        let result = backend.login("x@y.com", "wrong").await;

        mock.assert_async().await;
        assert_eq!(result.unwrap_err(), AuthError::Credentials);
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .match_body(mockito::Matcher::Json(
                json!({"email": "ana@empresa.com", "password": "s3cret"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"token":"t-1","usuario":{"id":11,"email":"ana@empresa.com","nombre":"Ana","apellido":"Ruiz","rol":"CANDIDATO"}}"#,
            )
            .create_async()
            .await;

        let backend = HttpAuthBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        let session = backend.login("ana@empresa.com", "s3cret").await.unwrap();

        assert_eq!(session.principal.id, 11);
        assert_eq!(session.principal.display_name(), "Ana Ruiz");
        assert_eq!(session.token.as_deref(), Some("t-1"));
    }

    #[tokio::test]
    async fn test_fetch_principal_sends_bearer_and_validates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/usuarios/7")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(r#"{"id":7,"email":"no-at-sign","rol":"ADMIN"}"#)
            .create_async()
            .await;

        let backend = HttpAuthBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        let result = backend.fetch_principal(7, "tok").await;
        assert!(matches!(result, Err(AuthError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_principal_not_ok() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/usuarios/7")
            .with_status(404)
            .with_body(r#"{"mensaje":"Usuario no encontrado"}"#)
            .create_async()
            .await;

        let backend = HttpAuthBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        let result = backend.fetch_principal(7, "tok").await;
        assert_eq!(
            result.unwrap_err(),
            AuthError::Backend {
                status: 404,
                message: "Usuario no encontrado".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/health")
            .with_status(503)
            .create_async()
            .await;

        let backend = HttpAuthBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        assert_eq!(backend.health().await, Ok(false));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let backend =
            HttpAuthBackend::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let result = backend.login("a@b.com", "x").await;
        assert!(matches!(result, Err(AuthError::Network(_))));
    }
}
