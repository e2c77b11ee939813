//! Integration tests for eve-wiki-mcp
//!
//! These drive the planner, the HTTP router and the wiki client end to end
//! against stubbed or mocked wiki backends.

// Test utilities and common setup
mod common;

mod planner_tests;
mod server_tests;
mod wiki_client_tests;

pub use common::*;
