pub mod ask;
pub mod health;

pub use ask::{ask, method_not_allowed, not_found};
pub use health::{health_check, metrics_endpoint, readiness_check};
