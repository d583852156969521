//! Test helpers: a scriptable in-memory injected provider and tracing setup.

#![warn(unused_crate_dependencies, unreachable_pub)]

#[macro_use]
extern crate tracing;

mod chain;
pub use chain::{MockChain, tx_json};

mod provider;
pub use provider::{Handler, MockProvider};

/// Initializes tracing for tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
