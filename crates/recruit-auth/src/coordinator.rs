//! Auth Coordinator.
//!
//! 세션의 유일한 소유자이자 변경 주체입니다. 쿠키, 영속 캐시, 백엔드 세 곳의 상태를
//! 하나의 [`AuthState`]로 합치고, 구독자에게는 `watch` 채널로 읽기 전용 사본을 제공합니다.
//!
//! 모든 협력자 에러는 여기서 잡혀 `error` 필드로 노출됩니다.

use std::sync::{Arc, Weak};

use recruit_core::router::LOGIN_PATH;
use recruit_core::{
    client_guard, decode_principal, Decision, Principal, Role, Session, StorageLocation,
};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::AuthBackend;
use crate::broadcast::{PhotoBus, PhotoUpdated};
use crate::config::ClientConfig;
use crate::demo::{demo_principal, demo_role_for, probe_backend};
use crate::error::AuthError;
use crate::navigator::Navigator;
use crate::oauth::{OAuthHandshake, OAuthProvider};
use crate::store::{CacheSnapshot, CookieSnapshot, SessionStore};

/// 구독자가 관찰하는 인증 상태.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// 현재 권한을 가진 세션
    pub session: Option<Session>,
    /// 백엔드 호출 진행 중
    pub loading: bool,
    /// 마지막 에러
    pub error: Option<AuthError>,
}

struct Inner {
    backend: Arc<dyn AuthBackend>,
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    config: ClientConfig,
    state: watch::Sender<AuthState>,
}

/// 세션 조정자 핸들. 복제해도 같은 상태를 공유합니다.
#[derive(Clone)]
pub struct AuthCoordinator {
    inner: Arc<Inner>,
}

impl AuthCoordinator {
    /// 새 코디네이터 생성. 부트스트랩 전까지 `loading` 상태입니다.
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        store: SessionStore,
        navigator: Arc<dyn Navigator>,
        config: ClientConfig,
    ) -> Self {
        let (state, _) = watch::channel(AuthState {
            loading: true,
            ..Default::default()
        });

        Self {
            inner: Arc::new(Inner {
                backend,
                store,
                navigator,
                config,
                state,
            }),
        }
    }

    /// 상태 구독.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// 현재 상태 사본.
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// 현재 세션.
    pub fn current_session(&self) -> Option<Session> {
        self.inner.state.borrow().session.clone()
    }

    /// 마지막 에러.
    pub fn error(&self) -> Option<AuthError> {
        self.inner.state.borrow().error.clone()
    }

    /// 저장소에서 세션 복원.
    ///
    /// 백엔드에 재검증하지 않고 저장된 Principal을 그대로 신뢰합니다.
    /// 저장된 값을 해석할 수 없으면 미인증 상태로 시작합니다.
    pub fn bootstrap(&self) -> Option<Session> {
        let session = self.restore();
        match &session {
            Some(s) => info!(
                user_id = s.principal.id,
                role = %s.role(),
                mode = ?s.mode,
                "Session restored"
            ),
            None => debug!("No stored session"),
        }

        self.inner.state.send_modify(|state| {
            state.session = session.clone();
            state.loading = false;
        });
        session
    }

    fn restore(&self) -> Option<Session> {
        let cache = self.inner.store.read_cache();
        let cookies = self.inner.store.read_cookies();
        log_divergence(&cache, &cookies);

        if cache.demo {
            let role = cache.demo_role.as_deref().and_then(Role::parse);
            let Some(role) = role else {
                warn!(demo_role = ?cache.demo_role, "Demo flag set without a readable role");
                return None;
            };
            let mut storage = vec![StorageLocation::DurableCache];
            if cookies.demo {
                storage.insert(0, StorageLocation::Cookie);
            }
            return Some(Session::demo(demo_principal(role)).with_storage(storage));
        }

        if let (Some(token), Some(user_data)) = (&cache.token, &cache.user_data) {
            return match Principal::from_json(user_data) {
                Ok(principal) => {
                    let mut storage = vec![StorageLocation::DurableCache];
                    if cookies.token.as_ref() == Some(token) {
                        storage.insert(0, StorageLocation::Cookie);
                    }
                    Some(Session::real(principal, token.clone()).with_storage(storage))
                }
                Err(e) => {
                    warn!(error = %e, "Stored principal unreadable, starting unauthenticated");
                    None
                }
            };
        }

        if cookies.demo {
            let role = cookies
                .principal
                .as_deref()
                .and_then(|raw| decode_principal(raw).ok())
                .map(|p| p.role);
            return match role {
                Some(role) => Some(
                    Session::demo(demo_principal(role)).with_storage(vec![StorageLocation::Cookie]),
                ),
                None => {
                    warn!("Demo cookie set without a readable principal");
                    None
                }
            };
        }

        if let (Some(token), Some(raw)) = (cookies.token, cookies.principal) {
            return match decode_principal(&raw) {
                Ok(principal) => Some(
                    Session::real(principal, token).with_storage(vec![StorageLocation::Cookie]),
                ),
                Err(e) => {
                    warn!(error = %e, "Principal cookie unreadable, starting unauthenticated");
                    None
                }
            };
        }

        None
    }

    /// 이메일/비밀번호 로그인.
    ///
    /// 데모 계정이면 먼저 헬스 체크를 수행하고, 백엔드가 내려가 있을 때만 데모 세션을
    /// 만듭니다. 이 경우 자격 증명 로그인 엔드포인트는 호출하지 않습니다.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.begin();

        if let Some(role) = demo_role_for(email, password) {
            let outcome = probe_backend(self.inner.backend.as_ref(), self.inner.config.probe_budget).await;
            if !outcome.allows_demo() {
                warn!(%role, "Demo credentials rejected while backend is up");
                return Err(self.record_error(AuthError::DemoUnavailable));
            }
            return Ok(self.enable_demo_mode(role));
        }

        match self.inner.backend.login(email, password).await {
            Ok(session) => {
                let session = self.persist_real(session);
                info!(user_id = session.principal.id, role = %session.role(), "Logged in");
                self.inner.navigator.push(session.role().home());
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, code = e.code(), "Login failed");
                Err(self.record_error(e))
            }
        }
    }

    /// 외부 ID 공급자로 이동. 세션은 콜백 핸드셰이크에서 만들어집니다.
    ///
    /// 결과를 기다리지 않으므로 `loading`은 켜지 않습니다.
    pub fn login_with_oauth(&self, provider: OAuthProvider) {
        self.clear_error();
        let url = provider.authorization_url(&self.inner.config.api_base_url);
        info!(provider = provider.as_str(), "Redirecting to identity provider");
        self.inner.navigator.assign(&url);
    }

    /// 로그아웃.
    ///
    /// 데모 세션은 모든 사본을 지우고 `/login`으로 전체 이동합니다.
    /// 실제 세션은 백엔드에 토큰 무효화를 요청한 뒤 사본을 지웁니다.
    /// 백엔드 무효화 실패는 기록만 하고 로그아웃을 계속합니다.
    pub async fn logout(&self) {
        let session = self.current_session();
        let demo = session.as_ref().map_or_else(
            || self.inner.store.read_cache().demo || self.inner.store.read_cookies().demo,
            Session::is_demo,
        );

        if demo {
            self.inner.store.clear();
            self.reset();
            info!("Demo session ended");
            self.inner.navigator.assign(LOGIN_PATH);
            return;
        }

        if let Some(token) = session.as_ref().and_then(|s| s.token.as_deref()) {
            if let Err(e) = self.inner.backend.logout(token).await {
                warn!(error = %e, "Backend logout failed, clearing local session anyway");
            }
        }

        self.inner.store.clear();
        self.reset();
        info!("Logged out");
        self.inner.navigator.push(LOGIN_PATH);
    }

    /// 데모 모드 진입.
    ///
    /// 두 저장소에 데모 세션을 기록한 뒤 역할 홈으로 전체 이동하여
    /// Edge Gate가 새 쿠키로 다시 판정하게 합니다.
    pub fn enable_demo_mode(&self, role: Role) -> Session {
        let principal = demo_principal(role);
        let storage = self.inner.store.write_demo(&principal);
        let session = self.establish(Session::demo(principal).with_storage(storage));

        info!(%role, "Demo mode enabled");
        self.inner.navigator.assign(role.home());
        session
    }

    /// 에러 초기화.
    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|state| state.error.take().is_some());
    }

    /// 메모리 세션의 사진 URL만 갱신. 저장소는 건드리지 않습니다.
    pub fn apply_photo_update(&self, event: &PhotoUpdated) -> bool {
        self.inner.state.send_if_modified(|state| match state.session.as_mut() {
            Some(session) if session.principal.photo_url.as_deref() != Some(event.photo_url.as_str()) => {
                session.principal.photo_url = Some(event.photo_url.clone());
                true
            }
            _ => false,
        })
    }

    /// 사진 변경 이벤트 구독.
    ///
    /// 리스너 태스크는 코디네이터를 약한 참조로만 가지며, 코디네이터가 사라지면 종료합니다.
    pub fn attach_photo_listener(&self, bus: &PhotoBus) -> JoinHandle<()> {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let mut events = bus.subscribe();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let Some(inner) = weak.upgrade() else {
                            break;
                        };
                        AuthCoordinator { inner }.apply_photo_update(&event);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Photo listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            debug!("Photo listener stopped");
        })
    }

    /// 현재 세션 기준 페이지 단위 접근 검사.
    pub fn guard(&self, path: &str) -> Decision {
        let session = self.current_session();
        client_guard(session.as_ref(), path)
    }

    /// OAuth 콜백 처리기.
    pub fn oauth_handshake(&self) -> OAuthHandshake {
        OAuthHandshake::new(self.clone())
    }

    /// 실제 세션을 두 저장소에 기록하고 확정.
    pub(crate) fn persist_real(&self, session: Session) -> Session {
        let storage = match session.token.as_deref() {
            Some(token) => self.inner.store.write_real(&session.principal, token),
            None => Vec::new(),
        };
        self.establish(session.with_storage(storage))
    }

    pub(crate) fn establish(&self, session: Session) -> Session {
        self.inner.state.send_modify(|state| {
            state.session = Some(session.clone());
            state.loading = false;
            state.error = None;
        });
        session
    }

    pub(crate) fn begin(&self) {
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
    }

    pub(crate) fn record_error(&self, error: AuthError) -> AuthError {
        self.inner.state.send_modify(|state| {
            state.loading = false;
            state.error = Some(error.clone());
        });
        error
    }

    fn reset(&self) {
        self.inner.state.send_replace(AuthState::default());
    }

    pub(crate) fn backend(&self) -> &dyn AuthBackend {
        self.inner.backend.as_ref()
    }

    pub(crate) fn navigator(&self) -> &dyn Navigator {
        self.inner.navigator.as_ref()
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

fn log_divergence(cache: &CacheSnapshot, cookies: &CookieSnapshot) {
    if cache.demo != cookies.demo || cache.token != cookies.token {
        debug!(
            cache_demo = cache.demo,
            cookie_demo = cookies.demo,
            token_match = cache.token == cookies.token,
            "Cookie and durable cache copies diverge"
        );
    }
}
