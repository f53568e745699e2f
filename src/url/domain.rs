use url::Url;

/// Extracts the domain of a URL used for same-domain scoping
///
/// Returns the lowercase host, with the port appended when one is present
/// explicitly (default ports are already stripped by canonicalization), so
/// `https://example.com:8443` and `https://example.com` scope differently.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webtrail::url::extract_domain;
///
/// let url = Url::parse("https://Example.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
