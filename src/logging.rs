use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "INVOCATION_SURFACE_LOG";
const DEFAULT_FILTER: &str = "info";

/// Installs a fmt subscriber. Safe to call more than once; later calls keep
/// the subscriber that is already installed.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
