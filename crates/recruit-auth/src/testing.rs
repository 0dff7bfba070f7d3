//! 단위 테스트용 가짜 백엔드.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use recruit_core::{Principal, Role, Session};

use crate::backend::AuthBackend;
use crate::config::ClientConfig;
use crate::coordinator::AuthCoordinator;
use crate::error::AuthError;
use crate::navigator::NavigationLog;
use crate::oauth::OAuthProvider;
use crate::store::SessionStore;

pub(crate) fn principal(id: u64, role: Role) -> Principal {
    Principal {
        id,
        email: format!("user{}@empresa.com", id),
        name: "Lucía".to_string(),
        surname: "Paz".to_string(),
        role,
        photo_url: None,
    }
}

pub(crate) struct FakeBackend {
    health: Result<bool, AuthError>,
    health_delay: Duration,
    login: Result<Session, AuthError>,
    exchange: Result<Session, AuthError>,
    principal: Result<Principal, AuthError>,
    logout: Result<(), AuthError>,
    login_calls: AtomicUsize,
    exchange_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    logout_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn healthy() -> Self {
        Self {
            health: Ok(true),
            health_delay: Duration::ZERO,
            login: Err(AuthError::Credentials),
            exchange: Err(AuthError::Backend {
                status: 400,
                message: "invalid_grant".to_string(),
            }),
            principal: Err(AuthError::Backend {
                status: 404,
                message: "Usuario no encontrado".to_string(),
            }),
            logout: Ok(()),
            login_calls: AtomicUsize::new(0),
            exchange_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            health: Err(AuthError::Network("connection refused".to_string())),
            login: Err(AuthError::Network("connection refused".to_string())),
            ..Self::healthy()
        }
    }

    pub fn with_health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = delay;
        self
    }

    pub fn with_login(mut self, result: Result<Session, AuthError>) -> Self {
        self.login = result;
        self
    }

    pub fn with_exchange(mut self, result: Result<Session, AuthError>) -> Self {
        self.exchange = result;
        self
    }

    pub fn with_principal(mut self, result: Result<Principal, AuthError>) -> Self {
        self.principal = result;
        self
    }

    pub fn with_logout(mut self, result: Result<(), AuthError>) -> Self {
        self.logout = result;
        self
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn login(&self, _email: &str, _password: &str) -> Result<Session, AuthError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login.clone()
    }

    async fn health(&self) -> Result<bool, AuthError> {
        if !self.health_delay.is_zero() {
            tokio::time::sleep(self.health_delay).await;
        }
        self.health.clone()
    }

    async fn exchange_oauth_code(
        &self,
        _provider: OAuthProvider,
        _code: &str,
    ) -> Result<Session, AuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.exchange.clone()
    }

    async fn fetch_principal(&self, _id: u64, _token: &str) -> Result<Principal, AuthError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.principal.clone()
    }

    async fn logout(&self, _token: &str) -> Result<(), AuthError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout.clone()
    }
}

/// 메모리 저장소와 이동 기록을 가진 코디네이터.
pub(crate) fn coordinator(
    backend: Arc<FakeBackend>,
) -> (AuthCoordinator, SessionStore, Arc<NavigationLog>) {
    let store = SessionStore::in_memory();
    let navigator = Arc::new(NavigationLog::new());
    let coordinator = AuthCoordinator::new(
        backend,
        store.clone(),
        navigator.clone(),
        ClientConfig::default(),
    );
    (coordinator, store, navigator)
}
