//! 로컬 쿠키로 Edge Gate 판정 미리보기.

use recruit_auth::SessionStore;
use recruit_core::cookies::render_cookie_header;
use recruit_core::{classify, decide, Decision, GateInput, GatePolicy};

/// 저장된 쿠키를 `Cookie` 헤더로 만들어 판정.
pub fn evaluate(store: &SessionStore, path: &str, policy: &GatePolicy) -> Decision {
    let cookies = store.cookies().all();
    let header = render_cookie_header(cookies.iter().map(|(n, v)| (n.as_str(), v.as_str())));
    decide(&GateInput::from_cookie_header(Some(&header)), path, policy)
}

/// 판정 결과 출력.
pub fn run(store: &SessionStore, path: &str, policy: &GatePolicy) {
    let area = classify(path);
    match evaluate(store, path, policy) {
        Decision::Allow => println!("{} [{}] → allow", path, area.as_str()),
        Decision::Redirect(to) => println!("{} [{}] → redirect {}", path, area.as_str(), to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruit_auth::demo_principal;
    use recruit_core::{Principal, Role};

    #[test]
    fn test_evaluate_against_real_session() {
        let store = SessionStore::in_memory();
        let principal = Principal {
            id: 2,
            email: "rh@empresa.com".to_string(),
            name: "Raúl".to_string(),
            surname: "Gil".to_string(),
            role: Role::Recruiter,
            photo_url: None,
        };
        store.write_real(&principal, "tok");

        let policy = GatePolicy::default();
        assert_eq!(evaluate(&store, "/dashboard", &policy), Decision::Redirect("/reclutador"));
        assert_eq!(evaluate(&store, "/admin", &policy), Decision::Redirect("/reclutador"));
        assert_eq!(evaluate(&store, "/login", &policy), Decision::Redirect("/reclutador"));
        assert_eq!(evaluate(&store, "/reclutador", &policy), Decision::Allow);
    }

    #[test]
    fn test_evaluate_after_clear() {
        let store = SessionStore::in_memory();
        store.write_demo(&demo_principal(Role::Applicant));
        assert_eq!(evaluate(&store, "/admin", &GatePolicy::default()), Decision::Allow);

        store.clear();
        assert_eq!(
            evaluate(&store, "/dashboard", &GatePolicy::default()),
            Decision::Redirect("/login")
        );
    }
}
