//! Prometheus metrics for blog-service.
//!
//! HTTP and pool metrics are registered by the shared middleware and db-pool
//! crates; this module adds the authorization counter and the `/metrics`
//! handler that renders the default registry.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Write attempts refused because the caller does not own the resource.
    pub static ref AUTHORIZATION_DENIED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_authorization_denied_total",
        "Write attempts rejected by the ownership check, by resource type",
        &["resource"]
    )
    .expect("failed to register blog_authorization_denied_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
