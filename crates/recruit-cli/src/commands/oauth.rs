//! OAuth 핸드셰이크 명령.
//!
//! 브라우저가 받은 콜백 URL을 붙여 넣으면 같은 핸드셰이크를 로컬 프로필에 대해 수행합니다.

use recruit_auth::{AuthCoordinator, HandshakeState, OAuthProvider};

use super::session::describe;

/// 공급자 인가 URL 출력.
pub fn start(coordinator: &AuthCoordinator, provider: OAuthProvider) {
    coordinator.login_with_oauth(provider);
    println!("브라우저에서 {} 로그인을 완료한 뒤 콜백 URL로 `recruit oauth <url>`을 실행하세요.", provider);
}

/// 콜백 URL 처리.
pub async fn complete(coordinator: &AuthCoordinator, url: &str) -> anyhow::Result<()> {
    let handshake = coordinator.oauth_handshake();
    let result = handshake.handle_redirect(url).await;

    match handshake.state() {
        HandshakeState::Redirecting { to, reason: None } => {
            println!("OAuth 로그인 완료 → {}", to);
        }
        state => {
            if let Some(reason) = state.reason() {
                eprintln!("OAuth 실패: {}", reason);
            }
        }
    }

    let session = result?;
    println!("{}", describe(&session));
    Ok(())
}
