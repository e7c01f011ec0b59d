mod cli;
mod commands;

use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::app::App;
use crate::db::Database;
use crate::models::TransactionType;

pub use cli::as_cli;
use commands::Session;

/// Interactive line shell: one command per line until `quit` or EOF.
pub fn as_shell(db: &Database) -> Result<()> {
    let mut session = Session::new(App::new());
    if session.app.start_session(db).is_err() {
        // Still usable: `resume` retries the load
        println!("{}", session.app.status_message());
    }
    commands::print_list(&mut session);
    session.flush(&mut io::stdout())?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while session.running {
        print!("{}> ", prompt(&session.app));
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        commands::handle_command(&line, &mut session, db);
        session.flush(&mut io::stdout())?;
    }
    Ok(())
}

fn prompt(app: &App) -> String {
    match app.editing() {
        Some(id) => format!("cashlog [edit {id}]"),
        None => format!("cashlog [{}]", app.default_type()),
    }
}

/// `<description words...> <amount> [--type income|expense]`
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct EntryArgs {
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) kind: Option<TransactionType>,
}

pub(crate) fn parse_entry_args(args: &[&str]) -> std::result::Result<EntryArgs, String> {
    let kind = match args.windows(2).find(|w| w[0] == "--type" || w[0] == "-t") {
        Some(w) => Some(TransactionType::parse(w[1]).ok_or_else(|| {
            format!("Unknown type '{}' (expected income or expense)", w[1])
        })?),
        None => None,
    };

    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if *arg == "--type" || *arg == "-t" {
            iter.next();
        } else {
            rest.push(*arg);
        }
    }

    let Some((amount, words)) = rest.split_last() else {
        return Err("Expected <description> <amount>".into());
    };
    Ok(EntryArgs {
        description: words.join(" "),
        amount: (*amount).to_string(),
        kind,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_entry_args_multiword_description() {
        let parsed = parse_entry_args(&["Coffee", "beans", "12.50"]).unwrap();
        assert_eq!(parsed.description, "Coffee beans");
        assert_eq!(parsed.amount, "12.50");
        assert_eq!(parsed.kind, None);
    }

    #[test]
    fn test_parse_entry_args_type_flag_anywhere() {
        let parsed = parse_entry_args(&["--type", "income", "Salary", "2000"]).unwrap();
        assert_eq!(parsed.description, "Salary");
        assert_eq!(parsed.kind, Some(TransactionType::Income));

        let parsed = parse_entry_args(&["Refund", "40", "-t", "i"]).unwrap();
        assert_eq!(parsed.amount, "40");
        assert_eq!(parsed.kind, Some(TransactionType::Income));
    }

    #[test]
    fn test_parse_entry_args_errors() {
        assert!(parse_entry_args(&[]).is_err());
        let err = parse_entry_args(&["Coffee", "4", "--type", "gift"]).unwrap_err();
        assert!(err.contains("gift"));
    }

    #[test]
    fn test_parse_entry_args_amount_only_leaves_description_empty() {
        // Validation reports the missing description
        let parsed = parse_entry_args(&["4.50"]).unwrap();
        assert!(parsed.description.is_empty());
        assert_eq!(parsed.amount, "4.50");
    }

    #[test]
    fn test_prompt_shows_mode() {
        let app = App::new();
        assert_eq!(prompt(&app), "cashlog [expense]");
    }
}
