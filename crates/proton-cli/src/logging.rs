use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

/// Environment variable controlling log verbosity (the CLI surface itself
/// takes no flags). Accepts `tracing_subscriber` filter directives, e.g.
/// `PROTONATE_LOG=debug`.
const LOG_ENV_VAR: &str = "PROTONATE_LOG";

pub fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::WARN.into()));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;
    use tracing::{debug, error, info, warn};

    static INIT: Once = Once::new();

    #[test]
    fn initialization_and_macros_work() {
        INIT.call_once(setup_logging);

        error!("This is an error");
        warn!("This is a warning");
        info!("This is info");
        debug!("This is debug");
    }
}
