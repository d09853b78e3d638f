use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, writing to stderr so command output on
/// stdout stays clean. `RUST_LOG` wins over `verbosity`.
pub fn init(verbosity: u8) {
    let fallback = match verbosity {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        // Ignore error if already initialized.
        .ok();
}
