//! Security headers and request path validation

use axum::{
    body::Body,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::types::ApiError;

/// Maximum request body size (64 KiB); queries are short text
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Rejects suspicious paths and adds security headers to every response
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    if let Err(err) = validate_request_path(request.uri().path()) {
        return err.into_response();
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );

    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        );
    }

    response
}

/// Path traversal and null-byte checks
pub fn validate_request_path(path: &str) -> Result<(), ApiError> {
    if path.contains("..") || path.contains("//") {
        return Err(ApiError::bad_request("Invalid path: path traversal detected")
            .with_code("invalid_path"));
    }

    if path.contains('\0') || path.contains("%00") {
        return Err(ApiError::bad_request("Invalid request: prohibited characters")
            .with_code("invalid_path"));
    }

    Ok(())
}
