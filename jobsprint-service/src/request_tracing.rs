use axum::body::Body;
use axum::http::{Request, Response};
use tracing::{Level, Span};
use uuid::Uuid;

/// Tag every request with a fresh id so its events correlate in the logs.
pub fn make_span_with_request_id(request: &Request<Body>) -> Span {
    let request_id = Uuid::new_v4();
    tracing::span!(
        Level::INFO,
        "request",
        method = tracing::field::display(request.method()),
        uri = tracing::field::display(request.uri()),
        request_id = tracing::field::display(request_id),
    )
}

pub fn on_request(_request: &Request<Body>, _span: &Span) {
    tracing::event!(Level::INFO, "request received");
}

pub fn on_response<B>(response: &Response<B>, latency: std::time::Duration, _span: &Span) {
    tracing::event!(
        Level::INFO,
        status = response.status().as_u16(),
        latency_ms = latency.as_millis() as u64,
        "response sent"
    );
}
