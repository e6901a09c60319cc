use metrics::{counter, histogram};

/// Outcome label values for upstream calls.
pub mod outcome {
    pub const SUCCESS: &str = "success";
    pub const EMPTY: &str = "empty";
    pub const INVALID_CREDENTIAL: &str = "invalid_credential";
    pub const ERROR: &str = "error";
}

/// Record one call to the generation provider.
pub fn record_upstream_call(provider: &str, outcome: &'static str, duration_secs: f64) {
    counter!(
        "upstream_requests_total",
        "provider" => provider.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("upstream_latency_seconds", "provider" => provider.to_string())
        .record(duration_secs);
}
