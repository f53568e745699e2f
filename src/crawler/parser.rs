//! HTML link extraction
//!
//! Pulls anchor hrefs out of a fetched page and resolves them to absolute
//! URLs against the page's final URL.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable links from an HTML document
///
/// Every `<a href>` value is resolved absolute against `base_url`. Skipped:
/// `javascript:`, `mailto:`, `tel:` and `data:` schemes, fragment-only
/// anchors, and anything that does not resolve to an HTTP(S) URL.
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = resolve_link(href, base_url) {
                    links.push(absolute);
                }
            }
        }
    }

    links
}

/// Resolves an href to an absolute URL, filtering out unfollowable ones
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Same-page anchors
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) => {
            if absolute.scheme() == "http" || absolute.scheme() == "https" {
                Some(absolute.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(links, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_relative_links() {
        let html = r#"<html><body><a href="/other">A</a><a href="sub">B</a></body></html>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(
            links,
            vec!["https://example.com/other", "https://example.com/sub"]
        );
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"
            <html><body>
                <a href="javascript:void(0)">JS</a>
                <a href="mailto:test@example.com">Mail</a>
                <a href="tel:+1234567890">Call</a>
                <a href="data:text/html,<h1>x</h1>">Data</a>
            </body></html>
        "#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let html = r##"<html><body><a href="#section">Jump</a></body></html>"##;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_mixed_valid_and_invalid() {
        let html = r#"
            <html><body>
                <a href="/valid">Valid</a>
                <a href="mailto:x@example.com">Invalid</a>
                <a href="/also-valid">Valid</a>
            </body></html>
        "#;
        let links = extract_links(html, &base_url());
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<html><body><a name="top">Top</a></body></html>"#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_malformed_html_still_yields_links() {
        let html = r#"<html><body><a href="/page1">unclosed<a href="/page2">"#;
        let links = extract_links(html, &base_url());
        assert_eq!(links.len(), 2);
    }
}
