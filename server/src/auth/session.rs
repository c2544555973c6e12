//! Session cookie handling
//!
//! The session token travels as an http-only cookie. A bearer token in the
//! Authorization header is also accepted for non-browser clients.

use axum::http::{HeaderMap, header};

use super::JwtService;

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "dm_session";

/// Build the Set-Cookie value for a freshly issued session token.
///
/// Http-only so page scripts cannot read it; Max-Age matches the token
/// lifetime so cookie and token expire together.
pub fn build_session_cookie(token: &str, max_age_minutes: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        max_age_minutes * 60
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE_NAME}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

/// Pull the session token out of a request: cookie first, bearer fallback.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, SESSION_COOKIE_NAME) {
        return Some(token);
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .map(|t| t.to_string())
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            let pair = pair.trim();
            if let Some((key, val)) = pair.split_once('=')
                && key == name
                && !val.is_empty()
            {
                return Some(val.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; dm_session=abc.def.ghi; lang=en"),
        );
        assert_eq!(extract_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_missing_token() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = build_session_cookie("tok", 1440, true);
        assert!(cookie.starts_with("dm_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(cookie.contains("Secure"));

        let cleared = clear_session_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }
}
