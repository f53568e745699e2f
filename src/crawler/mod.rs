//! Crawling engine: frontier, redirect resolution, parsing, orchestration

pub mod fetcher;
pub mod frontier;
pub mod orchestrator;
pub mod parser;
pub mod redirect;

pub use fetcher::{build_http_client, FetchOutcome, HttpResolver, RedirectResolver, Resolution};
pub use frontier::Frontier;
pub use orchestrator::{CrawlResult, Crawler};
pub use parser::extract_links;
pub use redirect::{detect_loop, LoopKind, RedirectLoop};
