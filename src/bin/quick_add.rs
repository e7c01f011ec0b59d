//! Home-screen style quick entry: records one expense and exits.

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;

use cashlog::config::Config;
use cashlog::logging::init_logger;
use cashlog::quick_add::record_expense;

fn main() -> Result<()> {
    init_logger(LevelFilter::INFO);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((amount, words)) = args.split_last() else {
        anyhow::bail!("Usage: cashlog-quick-add <description> <amount>");
    };
    let description = words.join(" ");

    let config = Config::from_env()?;
    config.ensure_data_dir()?;
    let id = record_expense(&config.db_path, &description, amount)
        .with_context(|| format!("Failed to save '{description}'"))?;
    println!("Saved expense {id}: {description} {amount}");
    Ok(())
}
