#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::TransactionType;

fn session() -> (Session, Database) {
    let db = Database::open_in_memory();
    let mut session = Session::new(App::new());
    session.app.start_session(&db).unwrap();
    (session, db)
}

fn run(session: &mut Session, db: &Database, input: &str) -> Vec<String> {
    handle_command(input, session, db);
    std::mem::take(&mut session.output)
}

#[test]
fn test_all_commands_have_descriptions() {
    for (name, cmd) in COMMANDS.iter() {
        assert!(!cmd.description.is_empty(), "{name} has no description");
    }
}

#[test]
fn test_add_and_summary() {
    let (mut s, db) = session();
    assert_eq!(run(&mut s, &db, "add Coffee 4.50"), vec!["Added 'Coffee'"]);
    run(&mut s, &db, "add Salary 2000 --type income");

    let out = run(&mut s, &db, "summary");
    assert_eq!(out[0], "  Income:     $2,000.00");
    assert_eq!(out[1], "  Expenses:   $4.50");
    assert_eq!(out[2], "  Balance:    $1,995.50");
    assert_eq!(out[3], "  Total Txns: 2");
}

#[test]
fn test_add_invalid_amount_reports_and_keeps_form() {
    let (mut s, db) = session();
    let out = run(&mut s, &db, "add Coffee abc");
    assert_eq!(out.len(), 1);
    assert!(out[0].contains("abc"));
    assert_eq!(s.app.form().description, "Coffee");
    assert!(s.app.records().is_empty());
}

#[test]
fn test_add_without_arguments() {
    let (mut s, db) = session();
    let out = run(&mut s, &db, "add");
    assert_eq!(out, vec!["Expected <description> <amount>"]);
}

#[test]
fn test_edit_then_save_updates() {
    let (mut s, db) = session();
    run(&mut s, &db, "add Refund 40");
    let id = s.app.records()[0].id;

    let out = run(&mut s, &db, &format!("edit {id}"));
    assert_eq!(out[0], "Editing 'Refund'");
    assert_eq!(s.app.editing(), Some(id));

    let out = run(&mut s, &db, "save Refund 40 --type income");
    assert_eq!(out, vec!["Updated 'Refund'"]);
    assert_eq!(s.app.records().len(), 1);
    assert_eq!(s.app.records()[0].kind, TransactionType::Income);
    assert_eq!(s.app.totals().balance, dec!(40));
}

#[test]
fn test_edit_bad_id() {
    let (mut s, db) = session();
    assert_eq!(run(&mut s, &db, "edit x"), vec!["Usage: edit <id>"]);
    assert_eq!(run(&mut s, &db, "edit 9"), vec!["No transaction with id 9"]);
}

#[test]
fn test_cancel() {
    let (mut s, db) = session();
    assert_eq!(run(&mut s, &db, "cancel"), vec!["Nothing to cancel"]);
    run(&mut s, &db, "add Coffee 4");
    let id = s.app.records()[0].id;
    run(&mut s, &db, &format!("e {id}"));
    assert_eq!(run(&mut s, &db, "cancel"), vec!["Edit cancelled"]);
    assert_eq!(s.app.editing(), None);
}

#[test]
fn test_delete() {
    let (mut s, db) = session();
    run(&mut s, &db, "add Coffee 4");
    let id = s.app.records()[0].id;
    assert_eq!(
        run(&mut s, &db, &format!("delete {id}")),
        vec![format!("Deleted transaction {id}")]
    );
    assert!(s.app.records().is_empty());
}

#[test]
fn test_list_rows() {
    let (mut s, db) = session();
    assert_eq!(run(&mut s, &db, "list"), vec!["No transactions"]);

    run(&mut s, &db, "add Coffee 4.5");
    run(&mut s, &db, "add Salary 2000 -t income");
    let out = run(&mut s, &db, "l");
    assert_eq!(out.len(), 4);
    assert!(out[2].contains("Salary"));
    assert!(out[2].ends_with("+$2,000.00"));
    assert!(out[3].contains("Coffee"));
    assert!(out[3].ends_with("-$4.50"));
}

#[test]
fn test_type_sets_default() {
    let (mut s, db) = session();
    assert_eq!(
        run(&mut s, &db, "type income"),
        vec!["New entries start as income"]
    );
    run(&mut s, &db, "add Gift 50");
    assert!(s.app.records()[0].is_income());
    assert_eq!(
        run(&mut s, &db, "type later"),
        vec!["Usage: type <income|expense>"]
    );
}

#[test]
fn test_resume_reports_count() {
    let (mut s, db) = session();
    db.insert("Bus", dec!(3), "2024-01-15T09:30:00.000Z", TransactionType::Expense)
        .unwrap();
    assert_eq!(run(&mut s, &db, "resume"), vec!["Loaded 1 transactions"]);
}

#[test]
fn test_quit_stops_session() {
    let (mut s, db) = session();
    run(&mut s, &db, "q");
    assert!(!s.running);
}

#[test]
fn test_unknown_command_suggests() {
    let (mut s, db) = session();
    let out = run(&mut s, &db, "summray");
    assert_eq!(out, vec!["Unknown command: summray. Did you mean summary?"]);
}

#[test]
fn test_help_lists_long_names_only() {
    let (mut s, db) = session();
    let out = run(&mut s, &db, "help");
    assert!(out.iter().any(|l| l.trim_start().starts_with("add ")));
    assert!(!out.iter().any(|l| l.trim_start().starts_with("q ")));
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("list", "list"), 0);
    assert_eq!(levenshtein("lsit", "list"), 2);
}

#[test]
fn test_flush_drains_output() {
    let (mut s, db) = session();
    run(&mut s, &db, "add Coffee 4");
    handle_command("summary", &mut s, &db);
    let mut buf = Vec::new();
    s.flush(&mut buf).unwrap();
    assert!(s.output.is_empty());
    assert!(String::from_utf8(buf).unwrap().contains("Expenses:   $4.00"));
}
