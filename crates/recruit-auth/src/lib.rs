//! # Recruit Auth
//!
//! 클라이언트 쪽 세션 조정 계층입니다.
//!
//! - [`coordinator`]: 세션의 유일한 소유자. 로그인, 로그아웃, 데모 모드, 부트스트랩
//! - [`store`]: 쿠키와 영속 캐시 쌍
//! - [`demo`]: 백엔드가 없을 때만 허용되는 데모 계정
//! - [`oauth`]: 외부 ID 공급자 리다이렉트 처리
//! - [`backend`]: 백엔드 인증 계약과 reqwest 구현
//! - [`broadcast`]: 프로필 사진 변경 이벤트
//! - [`navigator`]: 페이지 이동 경계
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use recruit_auth::{AuthCoordinator, ClientConfig, HttpAuthBackend, NavigationLog, SessionStore};
//!
//! let config = ClientConfig::from_env();
//! let backend = Arc::new(HttpAuthBackend::from_config(&config)?);
//! let coordinator = AuthCoordinator::new(
//!     backend,
//!     SessionStore::in_memory(),
//!     Arc::new(NavigationLog::new()),
//!     config,
//! );
//! coordinator.bootstrap();
//! let session = coordinator.login("candidato@demo.com", "candidato").await?;
//! ```

pub mod backend;
pub mod broadcast;
pub mod config;
pub mod coordinator;
pub mod demo;
pub mod error;
pub mod navigator;
pub mod oauth;
pub mod store;

#[cfg(test)]
mod testing;

pub use backend::{AuthBackend, HttpAuthBackend};
pub use broadcast::{PhotoBus, PhotoUpdated, PHOTO_UPDATED_EVENT};
pub use config::ClientConfig;
pub use coordinator::{AuthCoordinator, AuthState};
pub use demo::{demo_principal, demo_role_for, probe_backend, ProbeOutcome, DEMO_ACCOUNTS};
pub use error::AuthError;
pub use navigator::{Navigation, NavigationLog, Navigator};
pub use oauth::{decode_subject, CallbackQuery, HandshakeState, OAuthHandshake, OAuthProvider};
pub use store::{
    CookieStore, DurableCache, FileCache, FileCookieJar, MemoryCache, MemoryCookieJar,
    SessionStore, StoreError,
};
