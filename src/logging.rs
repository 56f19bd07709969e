use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "players=warn";

/// Sends log events to stderr, keeping stdout for the report. `RUST_LOG`
/// overrides the default filter if set.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
