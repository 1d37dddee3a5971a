//! Shared test utilities for the vip-core connector.
//!
//! This crate provides:
//! - Proptest generators for agency ids, rules and error codes
//! - A wiremock-backed stand-in for the vip-core service
//! - JSON fixtures with sample agencies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::VipCoreMock;

use vipcore_common::{TracingConfig, init_tracing};

/// Route tracing output to the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let config = TracingConfig::default()
        .with_log_level("debug")
        .with_test_writer();
    // Only the first call in a test binary installs the subscriber.
    let _ = init_tracing(&config);
}
