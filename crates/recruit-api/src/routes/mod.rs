//! 라우터 구성.
//!
//! - `/health`, `/health/ready`: 게이트 밖
//! - `/metrics`: 게이트 밖, 레코더가 설치된 경우에만
//! - 그 외 모든 경로: Edge Gate를 거친 뒤 정적 페이지 (없는 경로는 index로 대체)

pub mod health;

use std::sync::Arc;

use axum::{extract::State, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::services::{ServeDir, ServeFile};

pub use health::{health_check, health_ready, HealthResponse};

use crate::gate::edge_gate;
use crate::middleware::metrics_layer;
use crate::state::AppState;

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// 게이트가 적용된 정적 페이지 라우터.
pub fn pages_router(state: &AppState) -> Router {
    let assets = &state.config.assets;
    let pages = ServeDir::new(&assets.dir).fallback(ServeFile::new(assets.index_path()));

    Router::new()
        .fallback_service(pages)
        .layer(middleware::from_fn_with_state(state.gate.clone(), edge_gate))
}

/// 전체 라우터 생성.
pub fn create_router(state: Arc<AppState>, metrics_handle: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(health_ready))
        .with_state(state.clone());

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics_handler))
                .with_state(handle),
        );
    }

    router
        .merge(pages_router(&state))
        .layer(middleware::from_fn(metrics_layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::{
        body::Body,
        http::{
            header::{COOKIE, LOCATION},
            Request, StatusCode,
        },
        response::Response,
    };
    use recruit_core::cookies::{encode_principal, render_cookie_header};
    use recruit_core::{GatePolicy, Principal, Role};
    use tower::ServiceExt;

    struct Site {
        dir: tempfile::TempDir,
        app: Router,
    }

    fn site(policy: GatePolicy) -> Site {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>portal</html>").unwrap();

        let mut config = AppConfig::default();
        config.assets.dir = dir.path().to_path_buf();
        config.gate = policy;

        let app = create_router(Arc::new(AppState::new(config)), None);
        Site { dir, app }
    }

    fn principal_cookie(role: Role) -> String {
        encode_principal(&Principal {
            id: 7,
            email: "someone@empresa.com".to_string(),
            name: "Noa".to_string(),
            surname: "Ríos".to_string(),
            role,
            photo_url: None,
        })
        .unwrap()
    }

    async fn visit(site: &Site, path: &str, cookies: &[(&str, &str)]) -> Response {
        let mut request = Request::builder().uri(path);
        if !cookies.is_empty() {
            request = request.header(COOKIE, render_cookie_header(cookies.iter().copied()));
        }
        site.app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_admin_routing() {
        let site = site(GatePolicy::default());
        let admin = principal_cookie(Role::Admin);
        let cookies = [("token", "jwt"), ("usuario", admin.as_str())];

        let dashboard = visit(&site, "/dashboard", &cookies).await;
        assert_eq!(dashboard.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&dashboard), Some("/admin"));

        let admin_home = visit(&site, "/admin", &cookies).await;
        assert_eq!(admin_home.status(), StatusCode::OK);

        // 채용 담당자 영역은 Edge Gate 보호 대상이 아님
        let recruiter = visit(&site, "/reclutador", &cookies).await;
        assert_eq!(recruiter.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_no_token_redirects_to_login() {
        let site = site(GatePolicy::default());
        let response = visit(&site, "/dashboard/x", &[]).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), Some("/login"));
    }

    #[tokio::test]
    async fn test_auth_page_with_token_redirects_home() {
        let site = site(GatePolicy::default());
        let recruiter = principal_cookie(Role::Recruiter);

        let response = visit(
            &site,
            "/login",
            &[("token", "jwt"), ("usuario", recruiter.as_str())],
        )
        .await;
        assert_eq!(location(&response), Some("/reclutador"));

        let malformed = visit(
            &site,
            "/registro",
            &[("token", "jwt"), ("usuario", "%7Bnot-json")],
        )
        .await;
        assert_eq!(location(&malformed), Some("/dashboard"));
    }

    #[tokio::test]
    async fn test_cross_role_exclusivity() {
        let site = site(GatePolicy::default());
        let applicant = principal_cookie(Role::Applicant);
        let recruiter = principal_cookie(Role::Recruiter);

        let response = visit(
            &site,
            "/admin/usuarios",
            &[("token", "jwt"), ("usuario", applicant.as_str())],
        )
        .await;
        assert_eq!(location(&response), Some("/dashboard"));

        let response = visit(
            &site,
            "/admin",
            &[("token", "jwt"), ("usuario", recruiter.as_str())],
        )
        .await;
        assert_eq!(location(&response), Some("/reclutador"));

        let response = visit(
            &site,
            "/dashboard/postulaciones",
            &[("token", "jwt"), ("usuario", recruiter.as_str())],
        )
        .await;
        assert_eq!(location(&response), Some("/reclutador"));
    }

    #[tokio::test]
    async fn test_demo_cookie_allows_everything() {
        let site = site(GatePolicy::default());
        let response = visit(&site, "/admin", &[("demoMode", "true")]).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_bypasses_gate() {
        let site = site(GatePolicy {
            guard_recruiter_area: true,
        });
        let response = visit(&site, "/health", &[]).await;
        assert_eq!(response.status(), StatusCode::OK);

        let ready = visit(&site, "/health/ready", &[]).await;
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_encoded_paths_are_gated() {
        let site = site(GatePolicy::default());
        for area in ["admin", "dashboard/x"] {
            let dir = site.dir.path().join(area);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("index.html"), "restricted").unwrap();
        }

        for path in ["/%61dmin/", "//admin/", "/%64ashboard/x/", "/./admin/"] {
            let response = visit(&site, path, &[]).await;
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
            assert_eq!(location(&response), Some("/login"), "{}", path);
        }

        let applicant = principal_cookie(Role::Applicant);
        let response = visit(
            &site,
            "/%61dmin/",
            &[("token", "jwt"), ("usuario", applicant.as_str())],
        )
        .await;
        assert_eq!(location(&response), Some("/dashboard"));
    }

    #[tokio::test]
    async fn test_guarded_recruiter_area() {
        let site = site(GatePolicy {
            guard_recruiter_area: true,
        });
        let applicant = principal_cookie(Role::Applicant);

        let response = visit(&site, "/reclutador/ofertas", &[]).await;
        assert_eq!(location(&response), Some("/login"));

        let response = visit(
            &site,
            "/reclutador",
            &[("token", "jwt"), ("usuario", applicant.as_str())],
        )
        .await;
        assert_eq!(location(&response), Some("/dashboard"));
    }
}
