//! API middleware components

pub mod logging;
pub mod metrics;
pub mod security;

pub use logging::{REQUEST_ID_HEADER, logging_middleware, truncate_for_log};
pub use metrics::metrics_middleware;
pub use security::{MAX_BODY_SIZE, security_headers_middleware, validate_request_path};
