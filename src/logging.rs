use tracing_subscriber::EnvFilter;

/// Default diagnostic level: chatty in debug builds, quiet in release builds.
fn default_level(verbose: bool) -> &'static str {
    if verbose || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    }
}

/// Install the stderr diagnostics subscriber. `RUST_LOG` overrides the default level.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
