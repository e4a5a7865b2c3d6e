//! Integration tests for sitemap inspection
//!
//! These tests use wiremock to serve sitemaps, indexes and robots.txt
//! files and run full inspections against them.

mod inspect_tests;
mod robots_tests;
