//! JSON 파일 기반 쿠키/캐시 구현.
//!
//! CLI처럼 프로세스가 매번 새로 시작되는 호스트에서 세션을 유지하는 데 사용합니다.
//! 변경할 때마다 파일 전체를 다시 씁니다.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use super::memory::{lock, StoredCookie};
use super::{CookieStore, DurableCache, StoreError};

fn load<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(raw) if raw.trim().is_empty() => Ok(T::default()),
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

fn persist<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// 파일 쿠키 저장소.
#[derive(Debug)]
pub struct FileCookieJar {
    path: PathBuf,
    cookies: Mutex<BTreeMap<String, StoredCookie>>,
}

impl FileCookieJar {
    /// 파일을 열거나 새로 만듭니다. 만료된 쿠키는 로드 시 버립니다.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut cookies: BTreeMap<String, StoredCookie> = load(&path)?;
        cookies.retain(|_, c| c.is_live());
        Ok(Self {
            path,
            cookies: Mutex::new(cookies),
        })
    }

    /// 파일 경로.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CookieStore for FileCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        lock(&self.cookies)
            .get(name)
            .filter(|c| c.is_live())
            .map(|c| c.value.clone())
    }

    fn set(&self, name: &str, value: &str, max_age: Duration) -> Result<(), StoreError> {
        let mut cookies = lock(&self.cookies);
        cookies.insert(name.to_string(), StoredCookie::new(value, max_age));
        persist(&self.path, &*cookies)
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        let mut cookies = lock(&self.cookies);
        if cookies.remove(name).is_none() {
            return Ok(());
        }
        persist(&self.path, &*cookies)
    }

    fn all(&self) -> Vec<(String, String)> {
        lock(&self.cookies)
            .iter()
            .filter(|(_, c)| c.is_live())
            .map(|(name, c)| (name.clone(), c.value.clone()))
            .collect()
    }
}

/// 파일 영속 캐시.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileCache {
    /// 파일을 열거나 새로 만듭니다.
    ///
    /// 파일이 손상되어 있으면 경고 후 빈 캐시로 시작합니다.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match load(&path) {
            Ok(entries) => entries,
            Err(StoreError::Serialization(e)) => {
                warn!(path = %path.display(), error = %e, "Durable cache file corrupted, starting empty");
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }
}

impl DurableCache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        persist(&self.path, &*entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_none() {
            return Ok(());
        }
        persist(&self.path, &*entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_jar_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        let jar = FileCookieJar::open(&path).unwrap();
        jar.set("token", "abc", Duration::from_secs(3600)).unwrap();
        jar.set("demoMode", "true", Duration::from_secs(3600)).unwrap();
        jar.remove("demoMode").unwrap();
        drop(jar);

        let reopened = FileCookieJar::open(&path).unwrap();
        assert_eq!(reopened.get("token").as_deref(), Some("abc"));
        assert!(reopened.get("demoMode").is_none());
    }

    #[test]
    fn test_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let cache = FileCache::open(&path).unwrap();
        cache.set("user_data", "{}").unwrap();
        drop(cache);

        let reopened = FileCache::open(&path).unwrap();
        assert_eq!(reopened.get("user_data").as_deref(), Some("{}"));
    }

    #[test]
    fn test_corrupted_cache_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = FileCache::open(&path).unwrap();
        assert!(cache.get("auth_token").is_none());
    }
}
