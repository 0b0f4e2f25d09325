#![allow(dead_code)]

pub mod fixtures;

/// Installs a test subscriber once; `RUST_LOG=patchwork=trace` shows traversal steps.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
