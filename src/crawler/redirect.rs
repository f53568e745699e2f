//! Redirect loop classification
//!
//! A redirect chain is the ordered list of URLs traversed while resolving
//! one request. Before a new Location is appended to the chain it is
//! classified here; the first matching rule wins. The cheap positional
//! checks (reverse, circular) run before the generic membership test so a
//! two-hop ping-pong is reported as `reverse` rather than the less
//! informative `infinite`.

use std::fmt;

/// The kind of redirect loop that terminated a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    /// A -> B -> A
    Reverse,
    /// A -> B -> C -> A, or a longer cycle back to an earlier chain entry
    Circular,
    /// The candidate already appears in the chain at an unclassified position
    Infinite,
    /// The hop budget was exhausted without reaching content
    MaxRedirects,
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopKind::Reverse => "reverse",
            LoopKind::Circular => "circular",
            LoopKind::Infinite => "infinite",
            LoopKind::MaxRedirects => "max_redirects",
        };
        write!(f, "{}", name)
    }
}

/// A detected redirect loop with a human-readable description
#[derive(Debug, Clone)]
pub struct RedirectLoop {
    pub kind: LoopKind,
    pub description: String,
}

impl fmt::Display for RedirectLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} redirect loop: {}", self.kind, self.description)
    }
}

/// Classifies a redirect candidate against the current chain
///
/// Rules in precedence order, first match wins:
///
/// 1. chain length has reached `max_redirects` -> `MaxRedirects`
/// 2. candidate equals the second-to-last entry -> `Reverse`
/// 3. candidate equals the third-to-last entry -> `Circular`
/// 4. candidate equals an entry before the last three -> `Circular` at
///    that position
/// 5. candidate appears anywhere else in the chain -> `Infinite`
///
/// Returns `None` when the candidate is safe to append.
pub fn detect_loop(chain: &[String], candidate: &str, max_redirects: usize) -> Option<RedirectLoop> {
    if chain.len() >= max_redirects {
        return Some(RedirectLoop {
            kind: LoopKind::MaxRedirects,
            description: format!("maximum redirects ({}) exceeded", max_redirects),
        });
    }

    if chain.len() >= 2 && candidate == chain[chain.len() - 2] {
        return Some(RedirectLoop {
            kind: LoopKind::Reverse,
            description: format!("{} -> {}", chain[chain.len() - 1], candidate),
        });
    }

    if chain.len() >= 3 && candidate == chain[chain.len() - 3] {
        return Some(RedirectLoop {
            kind: LoopKind::Circular,
            description: format!(
                "{} -> {} -> {}",
                chain[chain.len() - 2],
                chain[chain.len() - 1],
                candidate
            ),
        });
    }

    if chain.len() >= 4 {
        for (position, entry) in chain[..chain.len() - 3].iter().enumerate() {
            if candidate == entry {
                return Some(RedirectLoop {
                    kind: LoopKind::Circular,
                    description: format!("cycle back to position {}", position),
                });
            }
        }
    }

    if chain.iter().any(|entry| entry == candidate) {
        return Some(RedirectLoop {
            kind: LoopKind::Infinite,
            description: format!("{} repeats in the chain", candidate),
        });
    }

    None
}
