//! Request ID middleware for correlating pricing calls.
//!
//! Store clients may send an `x-request-id` with each pricing call; anything
//! empty, oversized or non-printable is replaced by a fresh UUID v4. The ID is
//! recorded on the request span, tagged on the Sentry scope and echoed back.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Middleware that ensures every request carries a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request_id_from(request.headers());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// The caller's request ID if usable, otherwise a new one.
fn request_id_from(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(id) {
            headers.insert(REQUEST_ID_HEADER, value);
        }
        headers
    }

    #[test]
    fn test_keeps_caller_id() {
        assert_eq!(request_id_from(&headers("cart-7f3a")), "cart-7f3a");
    }

    #[test]
    fn test_replaces_unusable_ids() {
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        for id in ["", "has space", long.as_str()] {
            let generated = request_id_from(&headers(id));
            assert_ne!(generated, id);
            assert!(Uuid::parse_str(&generated).is_ok());
        }
    }

    #[test]
    fn test_generates_when_missing() {
        let generated = request_id_from(&HeaderMap::new());
        assert!(Uuid::parse_str(&generated).is_ok());
    }
}
