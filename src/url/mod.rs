//! URL handling module for Webtrail
//!
//! This module provides URL canonicalization (the dedup key for the visited
//! set) and domain extraction for same-domain scoping.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::canonicalize;
