//! 로그인, 데모 모드, 로그아웃, 현재 세션 조회.

use recruit_auth::{AuthCoordinator, Navigation, NavigationLog};
use recruit_core::{Role, Session, StorageLocation};
use tracing::info;

/// 세션 요약 한 줄.
pub fn describe(session: &Session) -> String {
    let storage = session
        .storage
        .iter()
        .map(|location| match location {
            StorageLocation::Cookie => "cookie",
            StorageLocation::DurableCache => "cache",
        })
        .collect::<Vec<_>>()
        .join("+");

    format!(
        "{} <{}> role={} mode={:?} id={} storage={}",
        session.principal.display_name(),
        session.principal.email,
        session.role(),
        session.mode,
        session.principal.id,
        if storage.is_empty() { "-" } else { &storage },
    )
}

/// 이동 기록 출력용 문자열.
pub fn describe_navigation(navigation: &Navigation) -> String {
    match navigation {
        Navigation::Full(to) => format!("navigate {} (full page load)", to),
        Navigation::Push(to) => format!("navigate {}", to),
        Navigation::Replace(to) => format!("navigate {} (replace)", to),
    }
}

/// 기록된 이동 출력.
pub fn print_navigations(log: &NavigationLog) {
    for navigation in log.events() {
        println!("{}", describe_navigation(&navigation));
    }
}

/// 이메일/비밀번호 로그인.
pub async fn login(coordinator: &AuthCoordinator, email: &str, password: &str) -> anyhow::Result<()> {
    let session = coordinator.login(email, password).await?;
    info!(user_id = session.principal.id, "Login command completed");
    println!("로그인 완료: {}", describe(&session));
    Ok(())
}

/// 데모 모드 진입.
pub fn demo(coordinator: &AuthCoordinator, role: Role) {
    let session = coordinator.enable_demo_mode(role);
    println!("데모 모드: {}", describe(&session));
}

/// 로그아웃.
pub async fn logout(coordinator: &AuthCoordinator) {
    let had_session = coordinator.current_session().is_some();
    coordinator.logout().await;
    if had_session {
        println!("로그아웃 완료");
    } else {
        println!("로그인된 세션이 없습니다. 저장된 사본을 정리했습니다.");
    }
}

/// 현재 세션 조회.
pub fn whoami(coordinator: &AuthCoordinator) {
    match coordinator.current_session() {
        Some(session) => println!("{}", describe(&session)),
        None => println!("로그인되지 않음"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruit_auth::demo_principal;

    #[test]
    fn test_describe_demo_session() {
        let session = Session::demo(demo_principal(Role::Admin));
        assert_eq!(
            describe(&session),
            "Administrador Demo <admin@demo.com> role=ADMIN mode=Demo id=1 storage=cookie+cache"
        );
    }

    #[test]
    fn test_describe_navigation() {
        assert_eq!(
            describe_navigation(&Navigation::Full("/login".to_string())),
            "navigate /login (full page load)"
        );
    }
}
