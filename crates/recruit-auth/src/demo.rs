//! 데모 모드 에뮬레이터.
//!
//! 백엔드가 없을 때만 고정된 데모 계정 세 개를 받아들입니다.
//! 헬스 체크가 제한 시간 안에 성공하면 데모 계정은 거부되므로,
//! 예약된 데모 주소의 실제 계정을 데모 세션이 가리는 일은 없습니다.

use std::time::Duration;

use recruit_core::{Principal, Role};
use tracing::{debug, info};

use crate::backend::AuthBackend;

/// 헬스 체크 제한 시간.
pub const PROBE_BUDGET: Duration = Duration::from_secs(2);

/// 데모 계정.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
}

/// 역할별 고정 데모 계정.
pub const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        email: "candidato@demo.com",
        password: "candidato",
        role: Role::Applicant,
    },
    DemoAccount {
        email: "reclutador@demo.com",
        password: "reclutador",
        role: Role::Recruiter,
    },
    DemoAccount {
        email: "admin@demo.com",
        password: "admin",
        role: Role::Admin,
    },
];

/// 자격 증명이 데모 계정과 일치하면 해당 역할.
///
/// 이메일은 앞뒤 공백을 제거하고 대소문자를 무시하며, 비밀번호는 정확히 일치해야 합니다.
pub fn demo_role_for(email: &str, password: &str) -> Option<Role> {
    let email = email.trim();
    DEMO_ACCOUNTS
        .iter()
        .find(|account| account.email.eq_ignore_ascii_case(email) && account.password == password)
        .map(|account| account.role)
}

/// 역할별 데모 계정.
pub fn demo_account(role: Role) -> &'static DemoAccount {
    match role {
        Role::Applicant => &DEMO_ACCOUNTS[0],
        Role::Recruiter => &DEMO_ACCOUNTS[1],
        Role::Admin => &DEMO_ACCOUNTS[2],
    }
}

/// 결정적인 데모 Principal 생성 (id = 1).
pub fn demo_principal(role: Role) -> Principal {
    let name = match role {
        Role::Applicant => "Candidato",
        Role::Recruiter => "Reclutador",
        Role::Admin => "Administrador",
    };

    Principal {
        id: 1,
        email: demo_account(role).email.to_string(),
        name: name.to_string(),
        surname: "Demo".to_string(),
        role,
        photo_url: None,
    }
}

/// 헬스 체크 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 백엔드가 살아 있음
    Up,
    /// 응답이 실패했거나 연결 불가
    Down,
    /// 제한 시간 초과
    TimedOut,
}

impl ProbeOutcome {
    /// 데모 로그인 허용 여부. 생존이 확인된 경우에만 거부합니다.
    pub fn allows_demo(self) -> bool {
        !matches!(self, ProbeOutcome::Up)
    }
}

/// 제한 시간 안에서 백엔드 헬스 체크.
pub async fn probe_backend(backend: &dyn AuthBackend, budget: Duration) -> ProbeOutcome {
    let outcome = match tokio::time::timeout(budget, backend.health()).await {
        Ok(Ok(true)) => ProbeOutcome::Up,
        Ok(Ok(false)) => ProbeOutcome::Down,
        Ok(Err(e)) => {
            debug!(error = %e, "Health probe failed");
            ProbeOutcome::Down
        }
        Err(_) => ProbeOutcome::TimedOut,
    };

    info!(outcome = ?outcome, budget_ms = budget.as_millis() as u64, "Backend health probe");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    #[test]
    fn test_demo_role_for_each_account() {
        for account in DEMO_ACCOUNTS {
            assert_eq!(
                demo_role_for(account.email, account.password),
                Some(account.role)
            );
        }
    }

    #[test]
    fn test_demo_role_for_normalizes_email_only() {
        assert_eq!(
            demo_role_for("  Admin@Demo.com ", "admin"),
            Some(Role::Admin)
        );
        assert_eq!(demo_role_for("admin@demo.com", "ADMIN"), None);
        assert_eq!(demo_role_for("admin@demo.com", "candidato"), None);
        assert_eq!(demo_role_for("ana@empresa.com", "admin"), None);
    }

    #[test]
    fn test_demo_principal_is_deterministic() {
        let principal = demo_principal(Role::Recruiter);
        assert_eq!(principal, demo_principal(Role::Recruiter));
        assert_eq!(principal.id, 1);
        assert_eq!(principal.email, "reclutador@demo.com");
        assert_eq!(principal.display_name(), "Reclutador Demo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_outcomes() {
        let up = FakeBackend::healthy();
        assert_eq!(probe_backend(&up, PROBE_BUDGET).await, ProbeOutcome::Up);

        let down = FakeBackend::unreachable();
        assert_eq!(probe_backend(&down, PROBE_BUDGET).await, ProbeOutcome::Down);

        let slow = FakeBackend::healthy().with_health_delay(Duration::from_secs(5));
        assert_eq!(
            probe_backend(&slow, PROBE_BUDGET).await,
            ProbeOutcome::TimedOut
        );
    }

    #[test]
    fn test_only_up_blocks_demo() {
        assert!(!ProbeOutcome::Up.allows_demo());
        assert!(ProbeOutcome::Down.allows_demo());
        assert!(ProbeOutcome::TimedOut.allows_demo());
    }
}
