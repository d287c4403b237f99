//! Test helpers module
//!
//! Fixtures, a scripted in-memory event source and a mock GameHub API server.

#![allow(dead_code)]

pub mod api_mock;
pub mod fixtures;
pub mod scripted_source;

pub use api_mock::*;
pub use fixtures::*;
pub use scripted_source::*;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
