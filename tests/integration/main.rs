//! Integration tests for Pagesift
//!
//! Traversal tests run against wiremock servers through the plain engine and
//! against an in-memory site for properties that need many pages.

mod crawl_tests;
mod pipeline_tests;
mod support;
