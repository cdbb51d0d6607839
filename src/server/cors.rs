use axum::{
    extract::Request,
    http::{ header, HeaderValue, Method, StatusCode },
    middleware::Next,
    response::{ IntoResponse, Response },
    Json,
};
use log::warn;
use once_cell::sync::Lazy;
use serde::Serialize;
use tower_http::cors::{ AllowOrigin, CorsLayer };

/// Fixed origin allow-list. Compiled in, not environment-configurable.
pub const ALLOWED_ORIGINS: [&str; 8] = [
    "http://localhost:3002",
    "http://127.0.0.1:3002",
    "http://localhost:5500",
    "http://127.0.0.1:5500",
    "http://127.0.0.1:5501",
    "https://botadvisor-online-business.onrender.com",
    "http://127.0.0.1:5503",
    "http://localhost:5503",
];

#[derive(Serialize)]
struct CorsError {
    error: &'static str,
}

static ALLOWED_ORIGIN_VALUES: Lazy<Vec<HeaderValue>> = Lazy::new(|| {
    ALLOWED_ORIGINS
        .iter()
        .map(|origin| HeaderValue::from_static(origin))
        .collect()
});

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(ALLOWED_ORIGIN_VALUES.clone()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

fn origin_allowed(origin: &HeaderValue) -> bool {
    origin
        .to_str()
        .map(|value| ALLOWED_ORIGINS.contains(&value))
        .unwrap_or(false)
}

/// Rejects browser requests from origins outside the allow-list before they
/// reach routing. Requests without an Origin header (same-origin or
/// non-browser callers) pass through.
pub async fn origin_guard(req: Request, next: Next) -> Response {
    match req.headers().get(header::ORIGIN) {
        Some(origin) if !origin_allowed(origin) => {
            warn!("Blocked request from origin {:?}", origin);
            (StatusCode::FORBIDDEN, Json(CorsError { error: "Not allowed by CORS" }))
                .into_response()
        }
        _ => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_origin_is_allowed() {
        let origin = HeaderValue::from_static("http://localhost:5500");
        assert!(origin_allowed(&origin));
    }

    #[test]
    fn unlisted_origin_is_rejected() {
        let origin = HeaderValue::from_static("https://evil.example.com");
        assert!(!origin_allowed(&origin));
    }

    #[test]
    fn non_utf8_origin_is_rejected() {
        let origin = HeaderValue::from_bytes(b"http://\xff.example").expect("opaque header value");
        assert!(!origin_allowed(&origin));
    }
}
