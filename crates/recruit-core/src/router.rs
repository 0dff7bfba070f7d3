//! 역할 라우터.
//!
//! 경로를 영역([`RouteArea`])으로 분류하고, 인증 상태와 역할에 따라
//! 통과/리다이렉트를 결정하는 테이블입니다. Edge Gate([`decide`])와
//! 클라이언트 페이지 검사([`client_guard`])가 같은 테이블을 사용합니다.
//!
//! # Edge Gate 우선순위 (먼저 일치하는 규칙이 적용)
//!
//! 1. `demoMode` 쿠키가 `"true"` → 무조건 통과
//! 2. 토큰 없음 + 보호 경로 → `/login`
//! 3. 토큰 있음 + 인증 페이지(`/login`, `/registro`) → 역할 홈
//! 4. 토큰 있음 + 보호 경로 → 역할 간 배타성 검사

use serde::{Deserialize, Serialize};

use crate::principal::Role;
use crate::session::Session;

/// 로그인 페이지.
pub const LOGIN_PATH: &str = "/login";
/// 회원가입 페이지.
pub const REGISTER_PATH: &str = "/registro";
/// 지원자 영역.
pub const APPLICANT_HOME: &str = "/dashboard";
/// 채용 담당자 영역.
pub const RECRUITER_HOME: &str = "/reclutador";
/// 관리자 영역.
pub const ADMIN_HOME: &str = "/admin";

/// 경로가 속한 영역.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteArea {
    /// `/dashboard/*`
    Applicant,
    /// `/reclutador/*`
    Recruiter,
    /// `/admin/*`
    Admin,
    /// `/login`, `/registro`
    Auth,
    /// 그 외 (랜딩, OAuth 콜백, 정적 자원)
    Public,
}

impl RouteArea {
    /// 로그인이 필요한 역할 영역인지 확인.
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            RouteArea::Applicant | RouteArea::Recruiter | RouteArea::Admin
        )
    }

    /// 메트릭 라벨용 이름.
    pub fn as_str(self) -> &'static str {
        match self {
            RouteArea::Applicant => "applicant",
            RouteArea::Recruiter => "recruiter",
            RouteArea::Admin => "admin",
            RouteArea::Auth => "auth",
            RouteArea::Public => "public",
        }
    }
}

impl Role {
    /// 역할의 홈 경로.
    pub fn home(self) -> &'static str {
        match self {
            Role::Applicant => APPLICANT_HOME,
            Role::Recruiter => RECRUITER_HOME,
            Role::Admin => ADMIN_HOME,
        }
    }

    /// 역할이 접근할 수 있는 유일한 영역.
    pub fn area(self) -> RouteArea {
        match self {
            Role::Applicant => RouteArea::Applicant,
            Role::Recruiter => RouteArea::Recruiter,
            Role::Admin => RouteArea::Admin,
        }
    }
}

/// 경로 세그먼트 단위 접두사 비교 (`/administrator`는 `/admin`에 속하지 않음).
fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// 경로를 정규형으로 변환.
///
/// 쿼리와 프래그먼트를 떼고 퍼센트 인코딩을 한 번 해제한 뒤, 빈 세그먼트와 `.`을
/// 제거하고 `..`은 상위 세그먼트를 지웁니다. 정적 파일 서빙이 같은 규칙으로 경로를
/// 해석하므로 `/%61dmin/`, `//admin`도 `/admin`으로 분류됩니다.
pub fn normalize_path(path: &str) -> String {
    let raw = path.split(['?', '#']).next().unwrap_or_default();
    let decoded = urlencoding::decode_binary(raw.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}

/// 경로를 영역으로 분류.
///
/// 쿼리 문자열과 프래그먼트는 무시하고 [`normalize_path`]의 정규형으로 비교합니다.
pub fn classify(path: &str) -> RouteArea {
    let normalized = normalize_path(path);
    let path = normalized.as_str();

    if under(path, APPLICANT_HOME) {
        RouteArea::Applicant
    } else if under(path, RECRUITER_HOME) {
        RouteArea::Recruiter
    } else if under(path, ADMIN_HOME) {
        RouteArea::Admin
    } else if path == LOGIN_PATH || path == REGISTER_PATH {
        RouteArea::Auth
    } else {
        RouteArea::Public
    }
}

/// 쿠키에서 읽은 역할 정보.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleHint {
    /// 쿠키의 역할을 해석함
    Known(Role),
    /// 쿠키는 있으나 해석 불가
    Unreadable,
    /// 쿠키 없음
    #[default]
    Absent,
}

/// Edge Gate 판정 입력. 쿠키만으로 구성됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateInput {
    /// `demoMode=true` 쿠키 존재 여부
    pub demo: bool,
    /// 비어 있지 않은 `token` 쿠키 존재 여부
    pub token: bool,
    /// `usuario` 쿠키의 역할
    pub role: RoleHint,
}

/// Edge Gate 적용 범위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GatePolicy {
    /// `/reclutador/*`도 Edge Gate에서 보호할지 여부.
    ///
    /// 기본값은 `false`로, 채용 담당자 영역은 클라이언트 검사만 받습니다.
    #[serde(default)]
    pub guard_recruiter_area: bool,
}

impl GatePolicy {
    /// 해당 영역이 Edge Gate 매처에 포함되는지 확인.
    pub fn guards(&self, area: RouteArea) -> bool {
        match area {
            RouteArea::Applicant | RouteArea::Admin | RouteArea::Auth => true,
            RouteArea::Recruiter => self.guard_recruiter_area,
            RouteArea::Public => false,
        }
    }
}

/// 라우팅 결정.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 요청 통과
    Allow,
    /// 지정 경로로 리다이렉트
    Redirect(&'static str),
}

impl Decision {
    /// 메트릭 라벨용 이름.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Redirect(_) => "redirect",
        }
    }
}

/// 역할 간 배타성: 보호 영역은 자기 역할의 영역만 허용.
fn exclusive(role: Role, area: RouteArea) -> Decision {
    if !area.is_protected() || area == role.area() {
        Decision::Allow
    } else {
        Decision::Redirect(role.home())
    }
}

/// Edge Gate 판정.
///
/// 백엔드를 호출하지 않는 순수 함수입니다. 해석할 수 없는 역할 쿠키는
/// 인증 페이지에서는 `/dashboard`로, 보호 경로에서는 지원자 권한으로 취급합니다.
pub fn decide(input: &GateInput, path: &str, policy: &GatePolicy) -> Decision {
    let area = classify(path);
    if !policy.guards(area) {
        return Decision::Allow;
    }

    if input.demo {
        return Decision::Allow;
    }

    if !input.token {
        return if area.is_protected() {
            Decision::Redirect(LOGIN_PATH)
        } else {
            Decision::Allow
        };
    }

    let role = match input.role {
        RoleHint::Known(role) => role,
        RoleHint::Unreadable | RoleHint::Absent => Role::Applicant,
    };

    if area == RouteArea::Auth {
        return Decision::Redirect(role.home());
    }

    exclusive(role, area)
}

/// 클라이언트 페이지 단위 검사.
///
/// Edge Gate가 보호하지 않는 `/reclutador/*`를 포함해 모든 역할 영역에
/// 배타성을 적용합니다. 데모 세션도 역할 검사를 받습니다.
pub fn client_guard(session: Option<&Session>, path: &str) -> Decision {
    let area = classify(path);
    match (session, area) {
        (_, RouteArea::Public) => Decision::Allow,
        (None, RouteArea::Auth) => Decision::Allow,
        (Some(session), RouteArea::Auth) => Decision::Redirect(session.role().home()),
        (None, _) => Decision::Redirect(LOGIN_PATH),
        (Some(session), area) => exclusive(session.role(), area),
    }
}
