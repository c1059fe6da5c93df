//! Console logging setup shared by the batch commands.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "EPOCHAL_PREP_LOG";

/// Initialize console logging for the batch commands.
///
/// Defaults to `info` so progress lines such as appended files and skipped records are
/// visible; override with `EPOCHAL_PREP_LOG`.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV_VAR)
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
