use axum::{
    body::{ to_bytes, Body, Bytes },
    extract::Request,
    http::{ header, HeaderMap, HeaderValue },
    middleware::Next,
    response::Response,
};
use log::warn;
use url::form_urlencoded;

/// Upper bound on buffered request bodies. Chat messages are capped at 150
/// words client-side, so this is generous.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Best-effort request body normalization. Form-encoded bodies are converted
/// to an equivalent JSON object. A JSON body that already parses is forwarded
/// untouched; otherwise a second pass re-parses the raw text with BOM and
/// surrounding whitespace stripped. If everything fails the body degrades to
/// an empty object and no error is raised to the caller. Whenever the body is
/// rewritten the content type is set to JSON so the downstream extractor
/// accepts it.
pub async fn recover_json_body(req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();
    let raw = match to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to buffer request body: {}", e);
            Bytes::new()
        }
    };

    let repaired = if is_form_content_type(&parts.headers) {
        form_to_json(&raw)
    } else {
        repair_body(raw.clone())
    };

    if repaired != raw {
        parts.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }

    next.run(Request::from_parts(parts, Body::from(repaired))).await
}

fn is_form_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn form_to_json(raw: &[u8]) -> Bytes {
    let mut map = serde_json::Map::new();
    for (key, value) in form_urlencoded::parse(raw) {
        map.insert(key.into_owned(), serde_json::Value::String(value.into_owned()));
    }
    serde_json::to_vec(&serde_json::Value::Object(map))
        .map(Bytes::from)
        .unwrap_or_else(|_| Bytes::from_static(b"{}"))
}

fn repair_body(raw: Bytes) -> Bytes {
    if serde_json::from_slice::<serde_json::Value>(&raw).is_ok() {
        return raw;
    }

    let text = String::from_utf8_lossy(&raw);
    let candidate = text.trim_start_matches('\u{feff}').trim();
    if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
        return Bytes::from(candidate.to_owned());
    }

    if !raw.is_empty() {
        warn!("Unrecoverable request body ({} bytes), degrading to empty object", raw.len());
    }
    Bytes::from_static(b"{}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_json_is_never_altered() {
        let body = Bytes::from_static(br#"{"message": "hello"}"#);
        assert_eq!(repair_body(body.clone()), body);
    }

    #[test]
    fn bom_prefixed_json_is_repaired() {
        let body = Bytes::from("\u{feff}{\"message\": \"hello\"}".to_string());
        let repaired = repair_body(body);
        let value: serde_json::Value =
            serde_json::from_slice(&repaired).expect("repaired body should parse");
        assert_eq!(value["message"], "hello");
    }

    #[test]
    fn whitespace_wrapped_json_is_repaired() {
        let body = Bytes::from_static(b"  \n {\"message\": \"hi\"} \n");
        let repaired = repair_body(body);
        assert!(serde_json::from_slice::<serde_json::Value>(&repaired).is_ok());
    }

    #[test]
    fn form_pairs_become_a_json_object() {
        let json = form_to_json(b"message=hello%20there&x=1");
        let value: serde_json::Value =
            serde_json::from_slice(&json).expect("converted body should parse");
        assert_eq!(value["message"], "hello there");
        assert_eq!(value["x"], "1");
    }

    #[test]
    fn empty_form_body_becomes_an_empty_object() {
        assert_eq!(form_to_json(b""), Bytes::from_static(b"{}"));
    }

    #[test]
    fn form_content_type_is_detected() {
        let mut headers = HeaderMap::new();
        assert!(!is_form_content_type(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
        );
        assert!(is_form_content_type(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!is_form_content_type(&headers));
    }

    #[test]
    fn unrecoverable_body_degrades_to_empty_object() {
        let body = Bytes::from_static(b"this is not json at all");
        assert_eq!(repair_body(body), Bytes::from_static(b"{}"));
    }

    #[test]
    fn empty_body_degrades_to_empty_object() {
        assert_eq!(repair_body(Bytes::new()), Bytes::from_static(b"{}"));
    }
}
