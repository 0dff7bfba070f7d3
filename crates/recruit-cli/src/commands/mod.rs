//! CLI 명령어 구현 모듈.

pub mod gate;
pub mod oauth;
pub mod session;
