pub mod cors;
pub mod metrics;
pub mod security_headers;
pub mod tracing;

pub use cors::{cors_middleware, CorsPolicy};
pub use metrics::metrics_middleware;
pub use security_headers::security_headers_middleware;
pub use tracing::{request_id_middleware, REQUEST_ID_HEADER};
