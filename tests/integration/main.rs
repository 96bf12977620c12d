//! Integration test suite
//!
//! Each module exercises the public API end to end against wiremock servers
//! and temporary index files.

mod crawl_tests;
mod index_tests;
