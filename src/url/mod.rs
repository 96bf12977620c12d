//! URL handling module for Sumi-Index
//!
//! This module provides URL normalization into the canonical identity form used
//! by the visited set, the politeness caches and index postings, plus domain
//! extraction helpers.

mod domain;
mod normalize;

pub use domain::{extract_domain, robots_authority};
pub use normalize::{canonicalize, normalize_url};
