//! Header and cookie access on inbound requests

use axum::http::{header::COOKIE, HeaderMap, Request};

/// Read-only view of the parts of a request the strategies care about
pub trait RequestAccessor: Send + Sync {
    /// Value of a named header, if present and valid UTF-8
    fn header(&self, name: &str) -> Option<&str>;

    /// Value of a named cookie, if present
    fn cookie(&self, name: &str) -> Option<&str>;
}

impl RequestAccessor for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|value| value.to_str().ok())
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .find_map(|pair| {
                let (key, value) = pair.trim().split_once('=')?;
                (key == name).then_some(value)
            })
    }
}

impl<B: Send + Sync> RequestAccessor for Request<B> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().header(name)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.headers().cookie(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; _my_session_id=abc-123; lang=en"),
        );
        assert_eq!(headers.cookie("_my_session_id"), Some("abc-123"));
        assert_eq!(headers.cookie("theme"), Some("dark"));
        assert_eq!(headers.cookie("missing"), None);
    }

    #[test]
    fn test_cookie_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("sid=xyz"));
        assert_eq!(headers.cookie("sid"), Some("xyz"));
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("sid_old=1"));
        assert_eq!(headers.cookie("sid"), None);
    }

    #[test]
    fn test_header_lookup_on_request() {
        let req = Request::builder()
            .uri("/")
            .header("Authorization", "Basic Zm9vOmJhcg==")
            .body(())
            .unwrap();
        assert_eq!(req.header("Authorization"), Some("Basic Zm9vOmJhcg=="));
        assert_eq!(req.header("X-Missing"), None);
        assert_eq!(req.cookie("sid"), None);
    }
}
