//! # Recruit Core
//!
//! 채용 포털의 인증 계층 전반에서 공유되는 핵심 타입을 제공합니다.
//!
//! - [`principal`]: 인증 주체(Principal)와 역할(Role), 백엔드 응답 검증
//! - [`session`]: 현재 권한을 가진 세션과 인증 모드
//! - [`router`]: 역할별 영역 판정 및 리다이렉트 결정 테이블 (Edge Gate와 클라이언트가 공유)
//! - [`cookies`]: 쿠키/영속 캐시 키 이름과 쿠키 값 인코딩
//! - [`logging`]: tracing 기반 로깅 초기화

pub mod cookies;
pub mod error;
pub mod logging;
pub mod principal;
pub mod router;
pub mod session;

pub use cookies::{decode_principal, encode_principal, parse_cookie_header, role_hint};
pub use error::DecodeError;
pub use logging::{init_logging, init_logging_from_env, LogConfig, LogFormat};
pub use principal::{Principal, PrincipalPayload, Role};
pub use router::{
    classify, client_guard, decide, normalize_path, Decision, GateInput, GatePolicy, RoleHint,
    RouteArea,
};
pub use session::{AuthMode, Session, StorageLocation};
