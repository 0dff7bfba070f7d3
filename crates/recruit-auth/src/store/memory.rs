//! 메모리 기반 쿠키/캐시 구현.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CookieStore, DurableCache, StoreError};

/// 만료 시각이 있는 쿠키 값.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredCookie {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredCookie {
    pub fn new(value: &str, max_age: Duration) -> Self {
        let max_age = chrono::Duration::from_std(max_age).unwrap_or_else(|_| chrono::Duration::days(36_500));
        Self {
            value: value.to_string(),
            expires_at: Utc::now().checked_add_signed(max_age).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn is_live(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 만료를 반영하는 메모리 쿠키 저장소.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<BTreeMap<String, StoredCookie>>,
}

impl MemoryCookieJar {
    /// 빈 저장소 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 만료 시각을 직접 지정해 기록 (만료 동작 확인용).
    pub fn set_expiring_at(&self, name: &str, value: &str, expires_at: DateTime<Utc>) {
        lock(&self.cookies).insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at,
            },
        );
    }
}

impl CookieStore for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        lock(&self.cookies)
            .get(name)
            .filter(|c| c.is_live())
            .map(|c| c.value.clone())
    }

    fn set(&self, name: &str, value: &str, max_age: Duration) -> Result<(), StoreError> {
        lock(&self.cookies).insert(name.to_string(), StoredCookie::new(value, max_age));
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        lock(&self.cookies).remove(name);
        Ok(())
    }

    fn all(&self) -> Vec<(String, String)> {
        lock(&self.cookies)
            .iter()
            .filter(|(_, c)| c.is_live())
            .map(|(name, c)| (name.clone(), c.value.clone()))
            .collect()
    }
}

/// 메모리 영속 캐시.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    /// 빈 캐시 생성.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_expiry() {
        let jar = MemoryCookieJar::new();
        jar.set("token", "abc", Duration::from_secs(60)).unwrap();
        jar.set_expiring_at("demoMode", "true", Utc::now() - chrono::Duration::seconds(1));

        assert_eq!(jar.get("token").as_deref(), Some("abc"));
        assert!(jar.get("demoMode").is_none());
        assert_eq!(jar.all(), vec![("token".to_string(), "abc".to_string())]);
    }

    #[test]
    fn test_cache_roundtrip() {
        let cache = MemoryCache::new();
        cache.set("auth_token", "t").unwrap();
        assert_eq!(cache.get("auth_token").as_deref(), Some("t"));
        cache.remove("auth_token").unwrap();
        assert!(cache.get("auth_token").is_none());
    }
}
