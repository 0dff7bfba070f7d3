//! 디코딩 에러 타입.

use thiserror::Error;

/// 외부에서 들어온 값(백엔드 응답, 쿠키, 토큰)을 타입으로 변환하지 못했을 때의 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// JSON 구문 또는 형태 오류
    #[error("JSON 파싱 실패: {0}")]
    Json(String),

    /// 필수 필드 누락
    #[error("필수 필드 누락: {0}")]
    MissingField(&'static str),

    /// 필드 값이 허용 범위를 벗어남
    #[error("잘못된 필드 값 ({field}): {value}")]
    InvalidField { field: &'static str, value: String },

    /// 쿠키 값 URL 디코딩 실패
    #[error("URL 디코딩 실패: {0}")]
    Encoding(String),

    /// 토큰 구조 오류
    #[error("토큰 형식 오류: {0}")]
    Token(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
