//! HTTP 요청 metrics middleware.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use recruit_core::classify;

use crate::metrics::{record_http_duration, record_http_response};

/// 모든 요청의 응답 수와 처리 시간을 역할 영역 라벨로 기록합니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let area = classify(request.uri().path()).as_str();

    let response = next.run(request).await;

    record_http_response(&method, area, response.status().as_u16());
    record_http_duration(&method, area, start.elapsed().as_secs_f64());

    response
}
