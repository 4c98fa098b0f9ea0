use {std::sync::Once, tracing_subscriber::EnvFilter};

/// Initializes tracing setup that is shared between the binaries.
/// `env_filter` has similar syntax to env_logger. It is documented at
/// https://docs.rs/tracing-subscriber/0.3.19/tracing_subscriber/filter/struct.EnvFilter.html
///
/// Logs go to stderr so that stdout stays reserved for program output.
/// Calling this more than once is a no-op.
pub fn initialize(env_filter: &str) {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| set_tracing_subscriber(env_filter));
}

fn set_tracing_subscriber(env_filter: &str) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter(env_filter))
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(err) = result {
        eprintln!("tracing subscriber already initialized: {err}");
    }
}

fn filter(env_filter: &str) -> EnvFilter {
    EnvFilter::try_new(env_filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {env_filter:?}, falling back to \"info\": {err}");
        EnvFilter::new("info")
    })
}
