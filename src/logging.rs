use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CASHLOG_LOG";

/// Install the stderr subscriber. `CASHLOG_LOG`, then `RUST_LOG`, override
/// the default level, which only applies to this crate.
pub fn init_logger(default_level: LevelFilter) {
    let filter = match std::env::var(LOG_ENV).ok() {
        Some(directives) => EnvFilter::new(directives),
        None => match std::env::var("RUST_LOG").ok() {
            Some(_) => EnvFilter::from_default_env(),
            None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), default_level)),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
