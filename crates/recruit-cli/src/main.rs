//! 채용 포털 세션 CLI.
//!
//! 브라우저 대신 로컬 프로필 디렉터리에 쿠키와 영속 캐시를 보관하고
//! 같은 인증 흐름(로그인, 데모 모드, OAuth, 로그아웃)을 실행합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 이메일/비밀번호 로그인
//! recruit login -e ana@empresa.com -p secreto
//!
//! # 백엔드 없이 데모 모드 진입
//! recruit demo reclutador
//!
//! # OAuth 콜백 URL 처리 (토큰 전달 방식, 코드 교환 방식)
//! recruit oauth "http://localhost:3000/oauth2/success?token=eyJhbGciOi..."
//! recruit oauth "http://localhost:3000/oauth2/callback/google?code=4%2F0Ab..."
//!
//! # 저장된 쿠키로 Edge Gate 판정 확인
//! recruit gate /admin
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use recruit_auth::{ClientConfig, OAuthProvider};
use recruit_cli::commands::{gate, oauth, session};
use recruit_cli::Profile;
use recruit_core::{init_logging, GatePolicy, LogConfig, LogFormat, Role};
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "recruit")]
#[command(about = "채용 포털 세션 및 접근 제어 CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// 프로필 디렉터리 (기본: RECRUIT_PROFILE_DIR 또는 .recruit)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// 백엔드 API 주소 (기본: RECRUIT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 이메일/비밀번호 로그인 (데모 계정은 백엔드가 내려가 있을 때만 허용)
    Login {
        /// 이메일
        #[arg(short, long)]
        email: String,

        /// 비밀번호
        #[arg(short, long)]
        password: String,
    },

    /// 데모 모드 진입
    Demo {
        /// 역할 (candidato, reclutador, admin)
        #[arg(value_parser = parse_role)]
        role: Role,
    },

    /// 로그아웃
    Logout,

    /// 현재 세션 확인
    Whoami,

    /// OAuth 콜백 URL 처리 (/oauth2/callback/{provider}, /oauth2/success, /oauth2/error)
    Oauth {
        /// 브라우저가 받은 콜백 URL
        url: String,
    },

    /// OAuth 공급자 인가 URL 출력
    OauthStart {
        /// 공급자 (google, github, linkedin)
        provider: OAuthProvider,
    },

    /// 저장된 쿠키로 Edge Gate 판정 확인
    Gate {
        /// 요청 경로
        path: String,

        /// 리크루터 영역에도 역할 배타성 적용
        #[arg(long, default_value = "false")]
        guard_recruiter_area: bool,
    },
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::parse(s).ok_or_else(|| format!("알 수 없는 역할: {} (candidato, reclutador, admin)", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    init_logging(LogConfig::from_env(LogFormat::Compact))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().without_delays();
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }

    let profile = Profile::resolve(cli.profile);
    debug!(profile = %profile.dir().display(), api = %config.api_base_url, "Using profile");

    let (coordinator, store, navigations) = profile
        .coordinator(config)
        .context("프로필 초기화 실패")?;
    coordinator.bootstrap();

    let result = match cli.command {
        Commands::Login { email, password } => {
            session::login(&coordinator, &email, &password).await
        }
        Commands::Demo { role } => {
            session::demo(&coordinator, role);
            Ok(())
        }
        Commands::Logout => {
            session::logout(&coordinator).await;
            Ok(())
        }
        Commands::Whoami => {
            session::whoami(&coordinator);
            Ok(())
        }
        Commands::Oauth { url } => oauth::complete(&coordinator, &url).await,
        Commands::OauthStart { provider } => {
            oauth::start(&coordinator, provider);
            Ok(())
        }
        Commands::Gate {
            path,
            guard_recruiter_area,
        } => {
            gate::run(
                &store,
                &path,
                &GatePolicy {
                    guard_recruiter_area,
                },
            );
            Ok(())
        }
    };

    session::print_navigations(&navigations);

    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use recruit_auth::oauth::{CALLBACK_PREFIX, ERROR_PATH, SUCCESS_PATH};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_oauth_help_lists_handled_callbacks() {
        let cli = Cli::command();
        let about = cli
            .find_subcommand("oauth")
            .and_then(|cmd| cmd.get_about())
            .map(|about| about.to_string())
            .unwrap();

        for path in [CALLBACK_PREFIX, SUCCESS_PATH, ERROR_PATH] {
            assert!(about.contains(path), "{}", path);
        }
        assert!(!about.contains("/login/oauth2/code"));
    }

    #[test]
    fn test_parse_demo_role() {
        let cli = Cli::try_parse_from(["recruit", "demo", "reclutador"]).unwrap();
        assert!(matches!(cli.command, Commands::Demo { role: Role::Recruiter }));
        assert!(Cli::try_parse_from(["recruit", "demo", "empresa"]).is_err());
    }
}
