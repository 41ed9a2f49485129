use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install the process-wide subscriber. `RUST_LOG` wins over `LOG_LEVEL`.
pub fn init(config: &LogConfig) {
    let default_filter = format!(
        "userlogin={level},tower_http={level},sqlx=warn",
        level = config.level.as_directive()
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

/// Log panics that escape a request task before the default hook runs.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_default();
        tracing::error!(%location, panic = %info, "Uncaught exception");
        default_hook(info);
    }));
}
