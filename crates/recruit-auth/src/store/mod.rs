//! 세션 저장소 (쿠키 + 영속 캐시 쌍).
//!
//! 세션 전환 시 쿠키 쓰기와 캐시 쓰기는 순서대로 수행되지만 원자적이지 않습니다.
//! 중간에 실패하면 두 사본이 잠시 어긋날 수 있으며, 다음 전체 쓰기에서 정리됩니다.
//! 어긋남을 능동적으로 복구하지는 않습니다.

mod file;
mod memory;

pub use file::{FileCache, FileCookieJar};
pub use memory::{MemoryCache, MemoryCookieJar};

use std::sync::Arc;
use std::time::Duration;

use recruit_core::cookies::{
    AUTH_TOKEN_KEY, DEMO_COOKIE, DEMO_COOKIE_MAX_AGE, DEMO_FLAG, DEMO_MODE_KEY, DEMO_ROLE_KEY,
    PRINCIPAL_COOKIE, SESSION_COOKIE_MAX_AGE, TOKEN_COOKIE, USER_DATA_KEY,
};
use recruit_core::{encode_principal, Principal, StorageLocation};
use thiserror::Error;
use tracing::{debug, warn};

/// 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 파일 입출력 실패
    #[error("저장소 입출력 실패: {0}")]
    Io(#[from] std::io::Error),

    /// 직렬화 실패
    #[error("저장소 직렬화 실패: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 쿠키 저장소.
///
/// 브라우저에서는 `document.cookie`, 그 외 호스트에서는 메모리/파일 구현을 사용합니다.
pub trait CookieStore: Send + Sync {
    /// 만료되지 않은 쿠키 값.
    fn get(&self, name: &str) -> Option<String>;

    /// 쿠키 기록.
    fn set(&self, name: &str, value: &str, max_age: Duration) -> Result<(), StoreError>;

    /// 쿠키 삭제.
    fn remove(&self, name: &str) -> Result<(), StoreError>;

    /// 만료되지 않은 모든 쿠키 (이름순).
    fn all(&self) -> Vec<(String, String)>;
}

/// 클라이언트 로컬 영속 캐시 (브라우저의 localStorage에 해당).
pub trait DurableCache: Send + Sync {
    /// 값 조회.
    fn get(&self, key: &str) -> Option<String>;

    /// 값 기록.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// 값 삭제.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// 캐시에 저장된 세션 원본 값.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    /// `demoMode == "true"`
    pub demo: bool,
    /// `demoUserRole`
    pub demo_role: Option<String>,
    /// `auth_token`
    pub token: Option<String>,
    /// `user_data` (Principal JSON)
    pub user_data: Option<String>,
}

/// 쿠키에 저장된 세션 원본 값.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSnapshot {
    /// `demoMode == "true"`
    pub demo: bool,
    /// `token`
    pub token: Option<String>,
    /// `usuario` (URL 인코딩된 Principal JSON)
    pub principal: Option<String>,
}

/// 쿠키와 영속 캐시를 함께 다루는 세션 저장소.
#[derive(Clone)]
pub struct SessionStore {
    cookies: Arc<dyn CookieStore>,
    cache: Arc<dyn DurableCache>,
}

impl SessionStore {
    /// 새 저장소 생성.
    pub fn new(cookies: Arc<dyn CookieStore>, cache: Arc<dyn DurableCache>) -> Self {
        Self { cookies, cache }
    }

    /// 메모리 기반 저장소 (테스트 및 임베딩용).
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryCookieJar::new()),
            Arc::new(MemoryCache::new()),
        )
    }

    /// 쿠키 저장소.
    pub fn cookies(&self) -> &Arc<dyn CookieStore> {
        &self.cookies
    }

    /// 영속 캐시.
    pub fn cache(&self) -> &Arc<dyn DurableCache> {
        &self.cache
    }

    /// 실제 세션 기록. 쿠키 → 캐시 순서로 쓰고, 성공한 위치를 반환합니다.
    pub fn write_real(&self, principal: &Principal, token: &str) -> Vec<StorageLocation> {
        let principal_json = match serde_json::to_string(principal) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize principal, session not persisted");
                return Vec::new();
            }
        };

        let cookie = self.write_cookies(|cookies| {
            cookies.set(TOKEN_COOKIE, token, SESSION_COOKIE_MAX_AGE)?;
            cookies.set(
                PRINCIPAL_COOKIE,
                &encode_principal(principal)?,
                SESSION_COOKIE_MAX_AGE,
            )?;
            cookies.remove(DEMO_COOKIE)
        });

        let cache = self.write_cache(|cache| {
            cache.set(AUTH_TOKEN_KEY, token)?;
            cache.set(USER_DATA_KEY, &principal_json)?;
            cache.remove(DEMO_MODE_KEY)?;
            cache.remove(DEMO_ROLE_KEY)
        });

        debug!(user_id = principal.id, role = %principal.role, "Real session persisted");
        locations(cookie, cache)
    }

    /// 데모 세션 기록. 토큰 사본은 제거됩니다.
    pub fn write_demo(&self, principal: &Principal) -> Vec<StorageLocation> {
        let principal_json = match serde_json::to_string(principal) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize demo principal");
                return Vec::new();
            }
        };

        let cookie = self.write_cookies(|cookies| {
            cookies.set(DEMO_COOKIE, DEMO_FLAG, DEMO_COOKIE_MAX_AGE)?;
            cookies.set(
                PRINCIPAL_COOKIE,
                &encode_principal(principal)?,
                SESSION_COOKIE_MAX_AGE,
            )?;
            cookies.remove(TOKEN_COOKIE)
        });

        let cache = self.write_cache(|cache| {
            cache.set(DEMO_MODE_KEY, DEMO_FLAG)?;
            cache.set(DEMO_ROLE_KEY, principal.role.as_str())?;
            cache.set(USER_DATA_KEY, &principal_json)?;
            cache.remove(AUTH_TOKEN_KEY)
        });

        debug!(role = %principal.role, "Demo session persisted");
        locations(cookie, cache)
    }

    /// 모든 쿠키와 캐시 사본 삭제.
    pub fn clear(&self) {
        self.write_cookies(|cookies| {
            cookies.remove(TOKEN_COOKIE)?;
            cookies.remove(PRINCIPAL_COOKIE)?;
            cookies.remove(DEMO_COOKIE)
        });
        self.write_cache(|cache| {
            cache.remove(AUTH_TOKEN_KEY)?;
            cache.remove(USER_DATA_KEY)?;
            cache.remove(DEMO_MODE_KEY)?;
            cache.remove(DEMO_ROLE_KEY)
        });
        debug!("Session copies cleared");
    }

    /// 캐시 원본 값 읽기.
    pub fn read_cache(&self) -> CacheSnapshot {
        CacheSnapshot {
            demo: self.cache.get(DEMO_MODE_KEY).as_deref() == Some(DEMO_FLAG),
            demo_role: self.cache.get(DEMO_ROLE_KEY),
            token: self.cache.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty()),
            user_data: self.cache.get(USER_DATA_KEY),
        }
    }

    /// 쿠키 원본 값 읽기.
    pub fn read_cookies(&self) -> CookieSnapshot {
        CookieSnapshot {
            demo: self.cookies.get(DEMO_COOKIE).as_deref() == Some(DEMO_FLAG),
            token: self.cookies.get(TOKEN_COOKIE).filter(|t| !t.is_empty()),
            principal: self.cookies.get(PRINCIPAL_COOKIE),
        }
    }

    fn write_cookies<F>(&self, write: F) -> bool
    where
        F: FnOnce(&dyn CookieStore) -> Result<(), StoreError>,
    {
        match write(self.cookies.as_ref()) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Cookie write failed, copies may diverge until next write");
                false
            }
        }
    }

    fn write_cache<F>(&self, write: F) -> bool
    where
        F: FnOnce(&dyn DurableCache) -> Result<(), StoreError>,
    {
        match write(self.cache.as_ref()) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Durable cache write failed, copies may diverge until next write");
                false
            }
        }
    }
}

fn locations(cookie: bool, cache: bool) -> Vec<StorageLocation> {
    let mut written = Vec::with_capacity(2);
    if cookie {
        written.push(StorageLocation::Cookie);
    }
    if cache {
        written.push(StorageLocation::DurableCache);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruit_core::{decode_principal, Role};

    fn principal() -> Principal {
        Principal {
            id: 21,
            email: "eva@empresa.com".to_string(),
            name: "Eva".to_string(),
            surname: "Mora".to_string(),
            role: Role::Recruiter,
            photo_url: None,
        }
    }

    /// 항상 실패하는 쿠키 저장소.
    struct BrokenCookies;

    impl CookieStore for BrokenCookies {
        fn get(&self, _name: &str) -> Option<String> {
            None
        }
        fn set(&self, _name: &str, _value: &str, _max_age: Duration) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
        fn remove(&self, _name: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
        fn all(&self) -> Vec<(String, String)> {
            Vec::new()
        }
    }

    #[test]
    fn test_write_real_populates_both_copies() {
        let store = SessionStore::in_memory();
        let written = store.write_real(&principal(), "tok-1");
        assert_eq!(
            written,
            vec![StorageLocation::Cookie, StorageLocation::DurableCache]
        );

        let cookies = store.read_cookies();
        assert_eq!(cookies.token.as_deref(), Some("tok-1"));
        assert!(!cookies.demo);
        assert_eq!(
            decode_principal(cookies.principal.as_deref().unwrap()).unwrap(),
            principal()
        );

        let cache = store.read_cache();
        assert_eq!(cache.token.as_deref(), Some("tok-1"));
        assert_eq!(
            Principal::from_json(cache.user_data.as_deref().unwrap()).unwrap(),
            principal()
        );
    }

    #[test]
    fn test_write_demo_replaces_real_copies() {
        let store = SessionStore::in_memory();
        store.write_real(&principal(), "tok-1");
        store.write_demo(&principal());

        let cookies = store.read_cookies();
        assert!(cookies.demo);
        assert!(cookies.token.is_none());

        let cache = store.read_cache();
        assert!(cache.demo);
        assert_eq!(cache.demo_role.as_deref(), Some("RECLUTADOR"));
        assert!(cache.token.is_none());
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = SessionStore::in_memory();
        store.write_demo(&principal());
        store.clear();

        assert_eq!(store.read_cookies(), CookieSnapshot::default());
        assert_eq!(store.read_cache(), CacheSnapshot::default());
        assert!(store.cookies().all().is_empty());
    }

    #[test]
    fn test_partial_write_reports_only_successful_location() {
        let store = SessionStore::new(Arc::new(BrokenCookies), Arc::new(MemoryCache::new()));
        let written = store.write_real(&principal(), "tok-2");
        assert_eq!(written, vec![StorageLocation::DurableCache]);
        assert_eq!(store.read_cache().token.as_deref(), Some("tok-2"));
    }
}
