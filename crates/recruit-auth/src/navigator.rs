//! 페이지 이동 경계.
//!
//! 전체 페이지 이동(`assign`)은 다음 요청에서 Edge Gate가 새 쿠키로 다시 판정하게 만들고,
//! 클라이언트 라우트 이동(`push`/`replace`)은 Edge Gate를 거치지 않습니다.

use std::sync::Mutex;

use tracing::debug;

/// 페이지 이동 수단.
pub trait Navigator: Send + Sync {
    /// 전체 페이지 이동.
    fn assign(&self, url: &str);

    /// 히스토리에 추가하는 클라이언트 라우트 이동.
    fn push(&self, path: &str);

    /// 현재 히스토리 항목을 교체하는 클라이언트 라우트 이동.
    fn replace(&self, path: &str);
}

/// 기록된 이동.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Full(String),
    Push(String),
    Replace(String),
}

impl Navigation {
    /// 이동 대상.
    pub fn target(&self) -> &str {
        match self {
            Navigation::Full(to) | Navigation::Push(to) | Navigation::Replace(to) => to,
        }
    }

    /// Edge Gate 재판정을 일으키는 전체 이동인지.
    pub fn is_full(&self) -> bool {
        matches!(self, Navigation::Full(_))
    }
}

/// 이동을 기록만 하는 Navigator (CLI 및 테스트용).
#[derive(Debug, Default)]
pub struct NavigationLog {
    events: Mutex<Vec<Navigation>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기록된 모든 이동.
    pub fn events(&self) -> Vec<Navigation> {
        self.lock().clone()
    }

    /// 마지막 이동.
    pub fn last(&self) -> Option<Navigation> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Navigation>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, navigation: Navigation) {
        debug!(?navigation, "Navigation");
        self.lock().push(navigation);
    }
}

impl Navigator for NavigationLog {
    fn assign(&self, url: &str) {
        self.record(Navigation::Full(url.to_string()));
    }

    fn push(&self, path: &str) {
        self.record(Navigation::Push(path.to_string()));
    }

    fn replace(&self, path: &str) {
        self.record(Navigation::Replace(path.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_log_records_in_order() {
        let log = NavigationLog::new();
        log.push("/dashboard");
        log.assign("/login");

        assert_eq!(
            log.events(),
            vec![
                Navigation::Push("/dashboard".to_string()),
                Navigation::Full("/login".to_string()),
            ]
        );
        let last = log.last().unwrap();
        assert!(last.is_full());
        assert_eq!(last.target(), "/login");
    }
}
