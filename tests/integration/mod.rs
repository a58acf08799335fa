//! Integration test suite for uplift
//!
//! These tests run the compiled `uplift` binary with `assert_cmd`. Release
//! feeds and artifacts are served by a local `wiremock` server, so no test
//! touches the network. No test performs a real swap: the binary under test
//! is the one cargo built, and replacing it would break the remaining tests.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: argument parsing, help output and configuration errors
//! - **upgrade**: `uplift upgrade` against a mock release server

mod common;

mod cli;
mod upgrade;
