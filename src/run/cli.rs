use anyhow::{Context, Result};

use super::commands::{list_lines, summary_lines};
use super::{parse_entry_args, EntryArgs};
use crate::app::App;
use crate::db::Database;

pub fn as_cli(args: &[String], db: &Database) -> Result<()> {
    let rest: Vec<&str> = args.iter().skip(2).map(String::as_str).collect();
    match args.get(1).map(String::as_str).unwrap_or_default() {
        "list" | "l" => cli_list(db),
        "summary" | "s" => cli_summary(db),
        "add" | "a" => cli_add(&rest, db),
        "update" | "u" => cli_update(&rest, db),
        "delete" | "d" => cli_delete(&rest, db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("cashlog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Cashlog, a local income and expense ledger");
    println!();
    println!("Usage: cashlog [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch the interactive shell");
    println!("  list                                List transactions, newest first");
    println!("  summary                             Print income, expense and balance");
    println!("  add <description> <amount>          Record a transaction");
    println!("    --type <income|expense>           Type (default: expense)");
    println!("  update <id> <description> <amount>  Replace a transaction");
    println!("    --type <income|expense>           Type (default: unchanged)");
    println!("  delete <id>                         Delete a transaction");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    println!("Environment:");
    println!("  CASHLOG_DB          Database file (default: platform data dir)");
    println!("  CASHLOG_CONNECTION  singleton | per-call");
    println!("  CASHLOG_LOG         Log filter, e.g. cashlog=debug");
}

fn loaded(db: &Database) -> Result<App> {
    let mut app = App::new();
    app.start_session(db)
        .context("Failed to load transactions")?;
    Ok(app)
}

fn cli_list(db: &Database) -> Result<()> {
    let app = loaded(db)?;
    for line in list_lines(&app) {
        println!("{line}");
    }
    Ok(())
}

fn cli_summary(db: &Database) -> Result<()> {
    let app = loaded(db)?;
    println!("Cashlog");
    println!("{}", "─".repeat(40));
    for line in summary_lines(&app) {
        println!("{line}");
    }
    Ok(())
}

fn cli_add(args: &[&str], db: &Database) -> Result<()> {
    let entry = parse_entry_args(args).map_err(|msg| {
        anyhow::anyhow!("{msg}\nUsage: cashlog add <description> <amount> [--type income|expense]")
    })?;
    let mut app = loaded(db)?;
    let id = submit(&mut app, db, entry)?;
    println!("{} (id {id})", app.status_message());
    Ok(())
}

fn cli_update(args: &[&str], db: &Database) -> Result<()> {
    let usage = "Usage: cashlog update <id> <description> <amount> [--type income|expense]";
    let Some((id, rest)) = args.split_first() else {
        anyhow::bail!("{usage}");
    };
    let id: i64 = id
        .parse()
        .with_context(|| format!("Invalid id '{id}'\n{usage}"))?;
    let entry = parse_entry_args(rest).map_err(|msg| anyhow::anyhow!("{msg}\n{usage}"))?;

    let mut app = loaded(db)?;
    if !app.begin_edit(id) {
        anyhow::bail!("{}", app.status_message());
    }
    submit(&mut app, db, entry)?;
    println!("{}", app.status_message());
    Ok(())
}

fn cli_delete(args: &[&str], db: &Database) -> Result<()> {
    let id: i64 = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: cashlog delete <id>"))?
        .parse()
        .context("Usage: cashlog delete <id>")?;
    let mut app = loaded(db)?;
    app.delete(db, id)?;
    println!("{}", app.status_message());
    Ok(())
}

fn submit(app: &mut App, db: &Database, entry: EntryArgs) -> Result<i64> {
    let form = app.form_mut();
    form.description = entry.description;
    form.amount = entry.amount;
    if let Some(kind) = entry.kind {
        form.kind = kind;
    }
    Ok(app.submit(db)?)
}
