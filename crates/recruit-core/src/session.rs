//! 세션 모델.
//!
//! 브라우저 컨텍스트(또는 클라이언트 프로필)마다 권한을 가진 세션은 최대 하나입니다.

use serde::{Deserialize, Serialize};

use crate::principal::{Principal, Role};

/// 인증 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// 백엔드가 발급한 토큰 기반 세션
    Real,
    /// 백엔드 없이 자체 발급된 데모 세션
    Demo,
}

/// 세션 사본이 저장된 위치.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageLocation {
    /// 요청마다 Edge Gate로 전달되는 쿠키
    Cookie,
    /// 클라이언트 로컬 영속 캐시
    DurableCache,
}

/// 현재 권한을 가진 세션.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// 인증 주체
    pub principal: Principal,
    /// 인증 모드
    pub mode: AuthMode,
    /// Bearer 토큰 (데모 세션에는 없음)
    pub token: Option<String>,
    /// 사본이 기록된 위치
    pub storage: Vec<StorageLocation>,
}

impl Session {
    /// 쿠키와 영속 캐시 양쪽에 기록되는 실제 세션.
    pub fn real(principal: Principal, token: impl Into<String>) -> Self {
        Self {
            principal,
            mode: AuthMode::Real,
            token: Some(token.into()),
            storage: vec![StorageLocation::Cookie, StorageLocation::DurableCache],
        }
    }

    /// 토큰 없는 데모 세션.
    pub fn demo(principal: Principal) -> Self {
        Self {
            principal,
            mode: AuthMode::Demo,
            token: None,
            storage: vec![StorageLocation::Cookie, StorageLocation::DurableCache],
        }
    }

    /// 실제로 읽어 온 저장 위치로 교체.
    #[must_use]
    pub fn with_storage(mut self, storage: Vec<StorageLocation>) -> Self {
        self.storage = storage;
        self
    }

    /// 세션 역할.
    pub fn role(&self) -> Role {
        self.principal.role
    }

    /// 데모 세션 여부.
    pub fn is_demo(&self) -> bool {
        self.mode == AuthMode::Demo
    }

    /// `Authorization` 헤더 값.
    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

// 토큰이 로그에 남지 않도록 직접 구현
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("principal", &self.principal)
            .field("mode", &self.mode)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("storage", &self.storage)
            .finish()
    }
}
