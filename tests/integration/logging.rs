//! Tracing subscriber setup

use serial_test::serial;

use contest_wizard::logging::{init_tracing, LOG_ENV};

/// Test: a second init is a harmless no-op
#[test]
#[serial]
fn test_init_tracing_is_idempotent() {
    std::env::set_var(LOG_ENV, "contest_wizard=debug");
    init_tracing();
    assert!(!init_tracing(), "second init should report an existing subscriber");
    tracing::debug!("subscriber installed");
}
