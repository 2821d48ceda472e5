use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Output goes to stderr so rendered HTML on
/// stdout stays clean.
pub fn init_logging(level: &str) {
    // Base level from config, still overridable via RUST_LOG.
    let default = format!("warn,recent_tweets={level},reqwest=warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .try_init();
}
