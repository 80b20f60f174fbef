// ABOUTME: Request tracing helpers for correlation and structured logging
// ABOUTME: Generates request IDs and creates one span per HTTP request for the trace layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::body::Body;
use axum::http::{Request, Response};
use std::time::Duration;
use tracing::Span;
use uuid::Uuid;

/// Header carrying a caller-supplied request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Take the caller's request ID or generate a new one
#[must_use]
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| format!("req_{}", Uuid::new_v4().simple()), str::to_owned)
}

/// Create a tracing span for HTTP requests
pub fn create_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request),
        status_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}

/// Fill in the request span's status and latency once the response is ready
pub fn record_response(response: &Response<Body>, latency: Duration, span: &Span) {
    let status = response.status().as_u16();
    let duration_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
    span.record("status_code", status);
    span.record("duration_ms", duration_ms);
    tracing::info!(parent: span, status_code = status, duration_ms, "Request completed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_prefers_header() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "req_abc")
            .body(())
            .unwrap();
        assert_eq!(request_id(&request), "req_abc");
    }

    #[test]
    fn test_request_id_generated_when_absent() {
        let request = Request::builder().body(()).unwrap();
        let id = request_id(&request);
        assert!(id.starts_with("req_"));
        assert_eq!(id.len(), "req_".len() + 32);
    }

    #[test]
    fn test_response_fields_declared_on_span() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let request = Request::builder()
                .uri("/api/routines/from-template")
                .body(Body::empty())
                .unwrap();
            let span = create_request_span(&request);
            assert!(span.field("status_code").is_some());
            assert!(span.field("duration_ms").is_some());

            let response = Response::builder().status(201).body(Body::empty()).unwrap();
            record_response(&response, Duration::from_millis(12), &span);
        });
    }
}
