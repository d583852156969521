use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initializes a tracing subscriber for logging, filtered by `RUST_LOG`.
pub fn subscriber() {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Loads a `.env` file from the current directory or its parents, if there is one.
///
/// Runs before the subscriber is installed so `RUST_LOG` can be set there.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Paints output only on color-capable terminals.
pub fn enable_paint() {
    let enable = yansi::Condition::os_support() && yansi::Condition::tty_and_color_live();
    yansi::whenever(yansi::Condition::cached(enable));
}
