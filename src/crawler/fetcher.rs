//! HTTP fetching and redirect resolution
//!
//! The client is built with automatic redirect following disabled; redirects
//! are followed manually one hop at a time so each Location can be
//! classified against the chain before it is accepted.

use crate::config::CrawlConfig;
use crate::crawler::redirect::{detect_loop, LoopKind, RedirectLoop};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, LOCATION};
use reqwest::{redirect::Policy, Client, StatusCode};
use url::Url;

/// Terminal outcome of resolving a single URL
#[derive(Debug)]
pub enum FetchOutcome {
    /// A non-redirect response was reached
    Content {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// A network or timeout error occurred at some hop
    NetworkFailure {
        /// Error description
        error: String,
    },

    /// A redirect loop was detected
    Loop(RedirectLoop),
}

/// The result of following redirects for one URL
#[derive(Debug)]
pub struct Resolution {
    /// The last URL reached (equals the request URL when nothing redirected)
    pub final_url: String,

    /// All URLs traversed, starting with the original; one entry per
    /// accepted hop, immutable once the resolution terminates
    pub chain: Vec<String>,

    /// The terminal outcome
    pub outcome: FetchOutcome,
}

impl Resolution {
    /// Whether at least one redirect hop was followed
    pub fn redirected(&self) -> bool {
        self.chain.len() > 1
    }
}

/// Capability interface for redirect resolution, injected into the
/// orchestrator so tests can substitute an instrumented implementation
#[async_trait]
pub trait RedirectResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Resolution;
}

/// Builds the HTTP client used for all crawl requests
///
/// Redirect following is disabled; the resolver handles hops manually.
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(config.timeout())
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production resolver: issues GET requests hop by hop with loop detection
pub struct HttpResolver {
    client: Client,
    max_redirects: usize,
}

impl HttpResolver {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            max_redirects: config.max_redirects,
        })
    }

    /// Builds a resolver around an existing client, for callers that manage
    /// their own client configuration
    pub fn with_client(client: Client, max_redirects: usize) -> Self {
        Self {
            client,
            max_redirects,
        }
    }
}

#[async_trait]
impl RedirectResolver for HttpResolver {
    async fn resolve(&self, url: &str) -> Resolution {
        let mut chain = vec![url.to_string()];
        let mut current = url.to_string();

        for hop in 0..self.max_redirects {
            let response = match self.client.get(&current).send().await {
                Ok(response) => response,
                Err(e) => {
                    return Resolution {
                        final_url: current,
                        chain,
                        outcome: FetchOutcome::NetworkFailure {
                            error: describe_error(&e),
                        },
                    };
                }
            };

            let status = response.status();

            if is_redirect(status) {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v.to_string());

                let location = match location {
                    Some(l) => l,
                    // A redirect status without a usable Location header is
                    // treated as terminal content
                    None => return read_content(response, current, chain).await,
                };

                let next = match resolve_location(&current, &location) {
                    Some(next) => next,
                    None => {
                        return Resolution {
                            final_url: current,
                            chain,
                            outcome: FetchOutcome::NetworkFailure {
                                error: format!("unresolvable Location header: {}", location),
                            },
                        };
                    }
                };

                if let Some(detected) = detect_loop(&chain, &next, self.max_redirects) {
                    tracing::warn!("Redirect loop at {}: {}", current, detected);
                    return Resolution {
                        final_url: current,
                        chain,
                        outcome: FetchOutcome::Loop(detected),
                    };
                }

                tracing::debug!("Redirect {}: {} -> {}", hop + 1, current, next);
                chain.push(next.clone());
                current = next;
            } else {
                return read_content(response, current, chain).await;
            }
        }

        // Every hop in the budget was a redirect
        Resolution {
            final_url: current,
            chain,
            outcome: FetchOutcome::Loop(RedirectLoop {
                kind: LoopKind::MaxRedirects,
                description: format!("maximum redirects ({}) exceeded", self.max_redirects),
            }),
        }
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Resolves a Location header value against the current URL
fn resolve_location(current: &str, location: &str) -> Option<String> {
    let base = Url::parse(current).ok()?;
    base.join(location).ok().map(|u| u.to_string())
}

async fn read_content(response: reqwest::Response, current: String, chain: Vec<String>) -> Resolution {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => Resolution {
            final_url: current,
            chain,
            outcome: FetchOutcome::Content { status, body },
        },
        Err(e) => Resolution {
            final_url: current,
            chain,
            outcome: FetchOutcome::NetworkFailure {
                error: describe_error(&e),
            },
        },
    }
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        "connection failed".to_string()
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> CrawlConfig {
        CrawlConfig {
            delay_ms: 0,
            max_redirects: 5,
            max_concurrent: 2,
            timeout_secs: 5,
            user_agent: "TestBot/1.0".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&test_config()).is_ok());
    }

    #[test]
    fn test_is_redirect_statuses() {
        for code in [301u16, 302, 303, 307, 308] {
            assert!(is_redirect(StatusCode::from_u16(code).unwrap()));
        }
        for code in [200u16, 304, 404, 500] {
            assert!(!is_redirect(StatusCode::from_u16(code).unwrap()));
        }
    }

    #[test]
    fn test_resolve_location_relative() {
        assert_eq!(
            resolve_location("https://example.com/a/b", "/c").as_deref(),
            Some("https://example.com/c")
        );
        assert_eq!(
            resolve_location("https://example.com/a/", "c").as_deref(),
            Some("https://example.com/a/c")
        );
    }

    #[tokio::test]
    async fn test_resolve_plain_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let resolver = HttpResolver::new(&test_config()).unwrap();
        let url = format!("{}/page", server.uri());
        let resolution = resolver.resolve(&url).await;

        assert_eq!(resolution.chain, vec![url.clone()]);
        assert_eq!(resolution.final_url, url);
        assert!(!resolution.redirected());
        match resolution.outcome {
            FetchOutcome::Content { status, body } => {
                assert_eq!(status, 200);
                assert_eq!(body, "hello");
            }
            other => panic!("expected content, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_follows_redirect_chain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/b"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(ResponseTemplate::new(200).set_body_string("end"))
            .mount(&server)
            .await;

        let resolver = HttpResolver::new(&test_config()).unwrap();
        let start = format!("{}/a", server.uri());
        let resolution = resolver.resolve(&start).await;

        assert_eq!(resolution.chain.len(), 2);
        assert!(resolution.redirected());
        assert_eq!(resolution.final_url, format!("{}/b", server.uri()));
        assert!(matches!(
            resolution.outcome,
            FetchOutcome::Content { status: 200, .. }
        ));
    }

    #[tokio::test]
    async fn test_resolve_detects_reverse_loop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/b"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/a"))
            .mount(&server)
            .await;

        let resolver = HttpResolver::new(&test_config()).unwrap();
        let resolution = resolver.resolve(&format!("{}/a", server.uri())).await;

        match resolution.outcome {
            FetchOutcome::Loop(detected) => assert_eq!(detected.kind, LoopKind::Reverse),
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_redirect_without_location_is_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/odd"))
            .respond_with(ResponseTemplate::new(302).set_body_string("stuck"))
            .mount(&server)
            .await;

        let resolver = HttpResolver::new(&test_config()).unwrap();
        let resolution = resolver.resolve(&format!("{}/odd", server.uri())).await;

        assert!(matches!(
            resolution.outcome,
            FetchOutcome::Content { status: 302, .. }
        ));
    }

    #[tokio::test]
    async fn test_resolve_exhausts_hop_budget() {
        let server = MockServer::start().await;
        // Each hop goes to a fresh path, so only the budget can stop it
        for i in 0..6 {
            let next = format!("/hop{}", i + 1);
            Mock::given(method("GET"))
                .and(path(format!("/hop{}", i)))
                .respond_with(ResponseTemplate::new(302).insert_header("Location", next.as_str()))
                .mount(&server)
                .await;
        }

        let resolver = HttpResolver::new(&test_config()).unwrap();
        let resolution = resolver.resolve(&format!("{}/hop0", server.uri())).await;

        match resolution.outcome {
            FetchOutcome::Loop(detected) => assert_eq!(detected.kind, LoopKind::MaxRedirects),
            other => panic!("expected max_redirects, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_network_failure() {
        // Port from a server that has been shut down
        let server = MockServer::start().await;
        let dead_url = format!("{}/gone", server.uri());
        drop(server);

        let resolver = HttpResolver::new(&test_config()).unwrap();
        let resolution = resolver.resolve(&dead_url).await;

        assert_eq!(resolution.chain, vec![dead_url]);
        assert!(matches!(
            resolution.outcome,
            FetchOutcome::NetworkFailure { .. }
        ));
    }
}
