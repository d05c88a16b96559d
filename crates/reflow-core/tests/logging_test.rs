#![forbid(unsafe_code)]

//! Logging facade integration tests.
//!
//! JSON subscriber install:
//!   cargo test -p reflow-core --features tracing-json --test logging_test
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p reflow-core --test logging_test

#[test]
fn macros_accept_structured_fields() {
    let epoch = 3u64;
    let span = reflow_core::debug_span!("transition", epoch);
    let _guard = span.enter();
    reflow_core::debug!(epoch, dx = -850, "transition armed");
    reflow_core::trace!(?epoch, "phase boundary");
    reflow_core::warn!(%epoch, "layout store write failed");
}

#[cfg(feature = "tracing-json")]
#[test]
fn json_subscriber_installs_once() {
    assert!(reflow_core::logging::init_json_logging("reflow=debug"));
    reflow_core::info!(target: "reflow", "json logging ready");
    assert!(!reflow_core::logging::init_json_logging("reflow=trace"));
}
