//! 인증 주체(Principal)와 역할(Role).
//!
//! 백엔드 응답, 쿠키, 영속 캐시에서 읽은 사용자 정보는 먼저 느슨한
//! [`PrincipalPayload`]로 받은 뒤 [`Principal::try_from`]에서 검증합니다.
//! 검증을 통과하지 못한 형태는 [`DecodeError`]로 거부되며 세션까지 전달되지 않습니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

/// 사용자 역할.
///
/// 세 역할은 서로 배타적이며, 각 역할은 정확히 하나의 영역만 접근할 수 있습니다.
/// 직렬화 형식은 백엔드와 동일한 `CANDIDATO` / `RECLUTADOR` / `ADMIN`입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// 지원자
    Applicant,
    /// 채용 담당자
    Recruiter,
    /// 관리자
    Admin,
}

impl Role {
    /// 모든 역할.
    pub const ALL: [Role; 3] = [Role::Applicant, Role::Recruiter, Role::Admin];

    /// 문자열에서 역할 파싱.
    ///
    /// 대소문자를 구분하지 않으며 `ROLE_` 접두사와 영문 별칭도 허용합니다.
    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        let name = lowered.strip_prefix("role_").unwrap_or(&lowered);
        match name {
            "candidato" | "applicant" | "postulante" => Some(Role::Applicant),
            "reclutador" | "recruiter" => Some(Role::Recruiter),
            "admin" | "administrador" | "administrator" => Some(Role::Admin),
            _ => None,
        }
    }

    /// 백엔드 와이어 형식 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Applicant => "CANDIDATO",
            Role::Recruiter => "RECLUTADOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::parse(&value).ok_or(DecodeError::InvalidField {
            field: "role",
            value,
        })
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// 검증을 통과한 인증 주체.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PrincipalPayload")]
pub struct Principal {
    /// 사용자 ID
    pub id: u64,
    /// 이메일
    pub email: String,
    /// 이름
    pub name: String,
    /// 성
    pub surname: String,
    /// 역할
    pub role: Role,
    /// 프로필 사진 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Principal {
    /// JSON 문자열을 검증하여 Principal로 변환.
    pub fn from_json(raw: &str) -> Result<Self, DecodeError> {
        let payload: PrincipalPayload = serde_json::from_str(raw)?;
        Principal::try_from(payload)
    }

    /// JSON 값을 검증하여 Principal로 변환.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let payload: PrincipalPayload = serde_json::from_value(value)?;
        Principal::try_from(payload)
    }

    /// 화면 표시용 전체 이름.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

/// 백엔드가 돌려주는 사용자 객체의 느슨한 형태.
///
/// 스페인어 필드명(`nombre`, `apellido`, `rol`, `fotoPerfil`)도 받아들입니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrincipalPayload {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "apellido", alias = "apellidos")]
    pub surname: Option<String>,
    #[serde(default, alias = "rol")]
    pub role: Option<String>,
    #[serde(
        default,
        rename = "photoUrl",
        alias = "fotoPerfil",
        alias = "fotoUrl",
        alias = "photo_url"
    )]
    pub photo_url: Option<String>,
}

impl TryFrom<PrincipalPayload> for Principal {
    type Error = DecodeError;

    fn try_from(payload: PrincipalPayload) -> Result<Self, Self::Error> {
        let id = parse_id(payload.id.ok_or(DecodeError::MissingField("id"))?)?;

        let email = payload
            .email
            .map(|e| e.trim().to_string())
            .ok_or(DecodeError::MissingField("email"))?;
        if !email.contains('@') {
            return Err(DecodeError::InvalidField {
                field: "email",
                value: email,
            });
        }

        let role = payload.role.ok_or(DecodeError::MissingField("role"))?;
        let role = Role::try_from(role)?;

        Ok(Self {
            id,
            email,
            name: payload.name.unwrap_or_default(),
            surname: payload.surname.unwrap_or_default(),
            role,
            photo_url: payload.photo_url.filter(|url| !url.is_empty()),
        })
    }
}

/// 숫자 또는 숫자 문자열 형태의 ID 파싱.
pub fn parse_id(value: Value) -> Result<u64, DecodeError> {
    match &value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| DecodeError::InvalidField {
        field: "id",
        value: value.to_string(),
    })
}
