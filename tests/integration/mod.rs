//! Integration tests for the wizard session
//!
//! These tests drive a full session against in-memory and file-backed stores:
//! stage lifecycle, cache freshness and debouncing, remote sync failures, and
//! gated navigation.

pub mod cache_flow;
pub mod helpers;
pub mod logging;
pub mod navigation;
pub mod stage_lifecycle;
pub mod sync_failures;
