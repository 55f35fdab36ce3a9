pub mod error;
pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod reset_password;
pub mod signup;
pub mod verify_account;

use axum::http::HeaderMap;

/// Bearer tokens travel in custom headers, not the Authorization scheme.
pub const ACCESS_TOKEN_HEADER: &str = "accesstoken";
pub const REFRESH_TOKEN_HEADER: &str = "refresh-token";
pub const REFRESH_TOKEN_HEADER_ALT: &str = "refreshtoken";

/// Both spellings of the refresh header are accepted; `HeaderMap` lookups are
/// case-insensitive on top of that.
pub(crate) fn extract_refresh_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REFRESH_TOKEN_HEADER)
        .or_else(|| headers.get(REFRESH_TOKEN_HEADER_ALT))
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_token_is_read_from_either_header() {
        let mut headers = HeaderMap::new();
        headers.insert("refresh-token", "first".parse().unwrap());
        assert_eq!(extract_refresh_token(&headers).as_deref(), Some("first"));

        let mut headers = HeaderMap::new();
        headers.insert("refreshtoken", "second".parse().unwrap());
        assert_eq!(extract_refresh_token(&headers).as_deref(), Some("second"));

        assert_eq!(extract_refresh_token(&HeaderMap::new()), None);
    }
}
