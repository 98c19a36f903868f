use tracing_subscriber::EnvFilter;

/// Default filter when neither configuration nor `RUST_LOG` provide one.
pub const DEFAULT_FILTER: &str = "kolib=info,kolib_dynamic=info";

/// Installs a global fmt subscriber.
///
/// The filter is taken from `filter`, then `RUST_LOG`, then [`DEFAULT_FILTER`].
/// Returns false when a subscriber is already installed, which happens when the
/// engine loads the library more than once.
pub fn init_logging(filter: Option<&str>) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_ansi(false)
        .try_init()
        .is_ok()
}

fn env_filter(filter: Option<&str>) -> EnvFilter {
    match filter {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
