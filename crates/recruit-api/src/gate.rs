//! Edge Gate 미들웨어.
//!
//! 페이지가 렌더링되기 전에 요청의 쿠키만 읽어 통과 또는 리다이렉트를 결정합니다.
//! 백엔드를 호출하지 않으며, 리다이렉트 외의 부수 효과는 없습니다.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use recruit_core::{classify, decide, Decision, GateInput, GatePolicy};
use tracing::debug;

use crate::metrics::record_gate_decision;

/// 쿠키 기반 요청 게이트.
#[derive(Debug, Clone, Default)]
pub struct EdgeGate {
    policy: GatePolicy,
}

impl EdgeGate {
    pub fn new(policy: GatePolicy) -> Self {
        Self { policy }
    }

    /// 적용 범위.
    pub fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    /// `Cookie` 헤더 값과 경로로 판정.
    pub fn evaluate(&self, cookie_header: Option<&str>, path: &str) -> Decision {
        decide(
            &GateInput::from_cookie_header(cookie_header),
            path,
            &self.policy,
        )
    }
}

/// Edge Gate 미들웨어.
///
/// HTTP/2에서 분할된 `Cookie` 헤더는 하나로 합쳐 읽습니다.
pub async fn edge_gate(
    State(gate): State<Arc<EdgeGate>>,
    request: Request,
    next: Next,
) -> Response {
    let cookie_header = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    let cookie_header = (!cookie_header.is_empty()).then_some(cookie_header);

    let path = request.uri().path();
    let area = classify(path);
    let decision = gate.evaluate(cookie_header.as_deref(), path);
    record_gate_decision(decision.label(), area.as_str());

    match decision {
        Decision::Allow => next.run(request).await,
        Decision::Redirect(to) => {
            debug!(path = %request.uri().path(), area = area.as_str(), to, "Edge gate redirect");
            Redirect::temporary(to).into_response()
        }
    }
}
