//! 채용 포털 세션 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 파일 기반 쿠키/캐시 프로필 관리
//! - 로그인, 데모 모드, 로그아웃, OAuth 콜백 처리
//! - 로컬 쿠키로 Edge Gate 판정 미리보기

pub mod commands;
pub mod profile;

pub use profile::Profile;
