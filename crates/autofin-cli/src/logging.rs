use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "AUTOFIN_LOG";

/// Install the stderr subscriber. `--verbose` wins over `AUTOFIN_LOG`;
/// without either only warnings are shown.
pub fn init(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("autofin_core=debug,autofin=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .without_time(),
        )
        .init();
}
