//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! 경로 라벨은 원시 경로 대신 역할 영역(`applicant`, `admin`, ...)을 사용해
//! 카디널리티를 제한합니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
        )?
        .install_recorder()
}

/// Edge Gate 판정 카운터 증가.
pub fn record_gate_decision(decision: &str, area: &str) {
    counter!(
        "gate_decisions_total",
        "decision" => decision.to_string(),
        "area" => area.to_string()
    )
    .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, area: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "area" => area.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, area: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "area" => area.to_string()
    )
    .record(duration_secs);
}
