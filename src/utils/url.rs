//! URL utilities for consistent URL handling
//!
//! This module provides utilities for normalizing base URLs to prevent
//! trailing-slash issues when constructing endpoint URLs.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use chatelaine::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:4000"), "http://localhost:4000");
/// assert_eq!(normalize_base_url("http://localhost:4000/"), "http://localhost:4000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete endpoint URL from a base URL and an endpoint path,
/// with no double slashes in the result.
///
/// # Examples
///
/// ```
/// use chatelaine::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:4000", "api/chat"),
///     "http://localhost:4000/api/chat"
/// );
/// assert_eq!(
///     construct_api_url("http://localhost:4000/", "/api/chat"),
///     "http://localhost:4000/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://chat.example.org/"),
            "https://chat.example.org"
        );
        assert_eq!(
            normalize_base_url("https://chat.example.org///"),
            "https://chat.example.org"
        );
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("https://chat.example.org/v1/", "api/chat"),
            "https://chat.example.org/v1/api/chat"
        );
        assert_eq!(
            construct_api_url("https://chat.example.org", "///api/chat"),
            "https://chat.example.org/api/chat"
        );
    }
}
