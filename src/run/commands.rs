use std::collections::HashMap;
use std::io::Write;
use std::sync::LazyLock;

use tracing::debug;

use super::parse_entry_args;
use crate::app::App;
use crate::db::Database;
use crate::models::TransactionType;
use crate::util::{format_amount, format_date, format_signed, truncate};

const DESCRIPTION_WIDTH: usize = 28;

/// Shell state around the orchestrator. Output is buffered so commands can
/// be checked without a terminal.
pub(crate) struct Session {
    pub(crate) app: App,
    pub(crate) running: bool,
    pub(crate) output: Vec<String>,
}

impl Session {
    pub(crate) fn new(app: App) -> Self {
        Self {
            app,
            running: true,
            output: Vec::new(),
        }
    }

    fn say(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    fn say_status(&mut self) {
        let status = self.app.status_message().to_string();
        if !status.is_empty() {
            self.say(status);
        }
    }

    pub(crate) fn flush(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        for line in self.output.drain(..) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut Session, &Database),
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!(
        "add",
        "Add a transaction, or save the edit in progress (add Coffee 4.50 --type expense)",
        cmd_add,
        r
    );
    register_command!("a", "Add a transaction (a Coffee 4.50)", cmd_add, r);
    register_command!("save", "Save the edit in progress (save Refund 40)", cmd_add, r);
    register_command!("edit", "Load a transaction into the form (edit 3)", cmd_edit, r);
    register_command!("e", "Load a transaction into the form (e 3)", cmd_edit, r);
    register_command!("cancel", "Abandon the edit in progress", cmd_cancel, r);
    register_command!("delete", "Delete a transaction (delete 3)", cmd_delete, r);
    register_command!("d", "Delete a transaction (d 3)", cmd_delete, r);
    register_command!("list", "Show all transactions, newest first", cmd_list, r);
    register_command!("l", "Show all transactions, newest first", cmd_list, r);
    register_command!("summary", "Show income, expense and balance", cmd_summary, r);
    register_command!("s", "Show income, expense and balance", cmd_summary, r);
    register_command!("resume", "Reload from the database", cmd_resume, r);
    register_command!("r", "Reload from the database", cmd_resume, r);
    register_command!(
        "type",
        "Set the type new entries start with (type income)",
        cmd_type,
        r
    );
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("q", "Quit", cmd_quit, r);

    r
});

pub(crate) fn handle_command(input: &str, session: &mut Session, db: &Database) {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, session, db);
    } else {
        let suggestion = find_closest(cmd_name);
        session.say(format!(
            "Unknown command: {cmd_name}. Did you mean {suggestion}?"
        ));
    }
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn parse_id(args: &str, session: &mut Session, usage: &str) -> Option<i64> {
    match args.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            session.say(format!("Usage: {usage}"));
            None
        }
    }
}

// ── Commands ──────────────────────────────────────────────────

fn cmd_add(args: &str, session: &mut Session, db: &Database) {
    let words: Vec<&str> = args.split_whitespace().collect();
    let entry = match parse_entry_args(&words) {
        Ok(entry) => entry,
        Err(msg) => {
            session.say(msg);
            return;
        }
    };

    let form = session.app.form_mut();
    form.description = entry.description;
    form.amount = entry.amount;
    if let Some(kind) = entry.kind {
        form.kind = kind;
    }
    // The status line already carries any failure
    if let Err(e) = session.app.submit(db) {
        debug!("Submit rejected: {e}");
    }
    session.say_status();
}

fn cmd_edit(args: &str, session: &mut Session, _db: &Database) {
    let Some(id) = parse_id(args, session, "edit <id>") else {
        return;
    };
    session.app.begin_edit(id);
    session.say_status();
    if session.app.editing().is_some() {
        let form = session.app.form();
        let line = format!(
            "  {} | {} | {}  (finish with: save <description> <amount> [--type ...])",
            form.description, form.amount, form.kind
        );
        session.say(line);
    }
}

fn cmd_cancel(_args: &str, session: &mut Session, _db: &Database) {
    if session.app.editing().is_none() {
        session.say("Nothing to cancel");
        return;
    }
    session.app.cancel_edit();
    session.say("Edit cancelled");
}

fn cmd_delete(args: &str, session: &mut Session, db: &Database) {
    let Some(id) = parse_id(args, session, "delete <id>") else {
        return;
    };
    if let Err(e) = session.app.delete(db, id) {
        debug!("Delete failed: {e}");
    }
    session.say_status();
}

fn cmd_list(_args: &str, session: &mut Session, _db: &Database) {
    print_list(session);
}

fn cmd_summary(_args: &str, session: &mut Session, _db: &Database) {
    for line in summary_lines(&session.app) {
        session.say(line);
    }
}

fn cmd_resume(_args: &str, session: &mut Session, db: &Database) {
    match session.app.on_resume(db) {
        Ok(()) => {
            let count = session.app.records().len();
            session.say(format!("Loaded {count} transactions"));
        }
        Err(_) => session.say_status(),
    }
}

fn cmd_type(args: &str, session: &mut Session, _db: &Database) {
    match TransactionType::parse(args) {
        Some(kind) => {
            session.app.set_default_type(kind);
            session.say(format!("New entries start as {kind}"));
        }
        None => session.say("Usage: type <income|expense>"),
    }
}

fn cmd_help(_args: &str, session: &mut Session, _db: &Database) {
    let mut names: Vec<(&&str, &Command)> =
        COMMANDS.iter().filter(|(name, _)| name.len() > 1).collect();
    names.sort_by_key(|(name, _)| **name);
    for (name, cmd) in names {
        session.say(format!("  {name:<10} {}", cmd.description));
    }
}

fn cmd_quit(_args: &str, session: &mut Session, _db: &Database) {
    session.running = false;
}

// ── Rendering ─────────────────────────────────────────────────

pub(crate) fn print_list(session: &mut Session) {
    let lines = list_lines(&session.app);
    for line in lines {
        session.say(line);
    }
}

pub(crate) fn list_lines(app: &App) -> Vec<String> {
    if app.records().is_empty() {
        return vec!["No transactions".into()];
    }
    let mut lines = vec![
        format!(
            "{:<5} {:<16} {:<w$} {:>14}",
            "ID",
            "Date",
            "Description",
            "Amount",
            w = DESCRIPTION_WIDTH
        ),
        "─".repeat(38 + DESCRIPTION_WIDTH),
    ];
    for txn in app.records() {
        lines.push(format!(
            "{:<5} {:<16} {:<w$} {:>14}",
            txn.id,
            format_date(&txn.date),
            truncate(&txn.description, DESCRIPTION_WIDTH),
            format_signed(txn),
            w = DESCRIPTION_WIDTH
        ));
    }
    lines
}

pub(crate) fn summary_lines(app: &App) -> Vec<String> {
    let totals = app.totals();
    vec![
        format!("  Income:     {}", format_amount(totals.income)),
        format!("  Expenses:   {}", format_amount(totals.expense)),
        format!("  Balance:    {}", format_amount(totals.balance)),
        format!("  Total Txns: {}", app.records().len()),
    ]
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
