use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; `debug` can be
/// enabled via the settings file. The `RUST_LOG` environment variable is
/// only honoured when debug logging is on, so a stray variable in the
/// user's environment cannot flood the overlay with output.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
