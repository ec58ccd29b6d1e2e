//! Readiness probe and store-request metrics.

use std::time::Duration;

pub struct Health {
    pub ready: bool,
}

impl Health {
    pub fn readiness() -> Self {
        Self { ready: true }
    }
}

/// Record one request against the meal store.
pub fn record_store_request(endpoint: &'static str, elapsed: Duration) {
    metrics::counter!("mealstore_requests_total", "endpoint" => endpoint).increment(1);
    metrics::histogram!("mealstore_request_seconds", "endpoint" => endpoint)
        .record(elapsed.as_secs_f64());
}

/// Record one failed request against the meal store.
pub fn record_store_error(endpoint: &'static str) {
    metrics::counter!("mealstore_request_errors_total", "endpoint" => endpoint).increment(1);
}
