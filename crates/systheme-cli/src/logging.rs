//! Logging setup using tracing.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "SYSTHEME_LOG";

/// Installs a stderr subscriber. Stdout carries the preference values.
///
/// ```bash
/// SYSTHEME_LOG=debug systheme-watch
/// ```
pub fn init(verbose: bool) {
    let default = if verbose {
        "systheme=debug,systheme_cli=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_names(true),
        )
        .init();
}
