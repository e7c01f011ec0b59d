use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;

use cashlog::config::Config;
use cashlog::logging::init_logger;
use cashlog::run;

fn main() -> Result<()> {
    init_logger(LevelFilter::WARN);

    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env()?;
    let db = config
        .open_database()
        .with_context(|| format!("Failed to open {}", config.db_path.display()))?;
    tracing::debug!("Using {} ({})", config.db_path.display(), db.policy());

    match args.len() {
        1 => run::as_shell(&db),
        2.. => run::as_cli(&args, &db),
        _ => {
            eprintln!("Usage: cashlog [command]");
            Ok(())
        }
    }
}
