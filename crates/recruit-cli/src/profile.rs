//! 파일 기반 세션 프로필.
//!
//! 프로필 디렉터리에 `cookies.json`(쿠키 저장소)과 `cache.json`(영속 캐시)을 둡니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use recruit_auth::{
    AuthCoordinator, ClientConfig, FileCache, FileCookieJar, HttpAuthBackend, NavigationLog,
    SessionStore,
};

/// 프로필 디렉터리 환경 변수.
pub const PROFILE_DIR_ENV: &str = "RECRUIT_PROFILE_DIR";
/// 기본 프로필 디렉터리.
pub const DEFAULT_PROFILE_DIR: &str = ".recruit";

/// 세션 프로필.
#[derive(Debug, Clone)]
pub struct Profile {
    dir: PathBuf,
}

impl Profile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 명시적 경로 → `RECRUIT_PROFILE_DIR` → `.recruit` 순서로 결정.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        let dir = explicit
            .or_else(|| std::env::var(PROFILE_DIR_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_DIR));
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 파일 저장소 열기.
    pub fn store(&self) -> anyhow::Result<SessionStore> {
        let cookies = FileCookieJar::open(self.dir.join("cookies.json"))
            .with_context(|| format!("쿠키 파일 열기 실패: {}", self.dir.display()))?;
        let cache = FileCache::open(self.dir.join("cache.json"))
            .with_context(|| format!("캐시 파일 열기 실패: {}", self.dir.display()))?;
        Ok(SessionStore::new(Arc::new(cookies), Arc::new(cache)))
    }

    /// 프로필 저장소와 HTTP 백엔드로 코디네이터 구성.
    pub fn coordinator(
        &self,
        config: ClientConfig,
    ) -> anyhow::Result<(AuthCoordinator, SessionStore, Arc<NavigationLog>)> {
        let store = self.store()?;
        let backend = Arc::new(
            HttpAuthBackend::from_config(&config).context("HTTP 클라이언트 생성 실패")?,
        );
        let navigator = Arc::new(NavigationLog::new());
        let coordinator = AuthCoordinator::new(backend, store.clone(), navigator.clone(), config);
        Ok((coordinator, store, navigator))
    }
}
