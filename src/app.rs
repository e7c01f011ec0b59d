//! In-memory view state kept in step with the store.
//!
//! Every change to the record list goes through [`App::load`], which swaps
//! the records and their totals in one assignment. A failed load leaves the
//! last good list on screen.

use tracing::{debug, error, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{timestamp_now, Totals, Transaction, TransactionForm, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Loading,
    Ready,
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Loading => write!(f, "LOADING"),
            Self::Ready => write!(f, "READY"),
        }
    }
}

/// Why a reload was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reload {
    SessionStart,
    Resume,
    AfterMutation,
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    records: Vec<Transaction>,
    totals: Totals,
}

pub struct App {
    state: SyncState,
    snapshot: Snapshot,
    status_message: String,

    // Add/edit form
    form: TransactionForm,
    default_type: TransactionType,
    editing: Option<i64>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            state: SyncState::Idle,
            snapshot: Snapshot {
                records: Vec::new(),
                totals: Totals::default(),
            },
            status_message: String::new(),
            form: TransactionForm::default(),
            default_type: TransactionType::default(),
            editing: None,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Newest first.
    pub fn records(&self) -> &[Transaction] {
        &self.snapshot.records
    }

    pub fn totals(&self) -> Totals {
        self.snapshot.totals
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn form(&self) -> &TransactionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TransactionForm {
        &mut self.form
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    pub fn default_type(&self) -> TransactionType {
        self.default_type
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    // ── Loading ───────────────────────────────────────────────

    /// Session lead-in: ensure the schema, then load. A failed migration is
    /// logged and the load goes ahead.
    pub fn start_session(&mut self, db: &Database) -> Result<()> {
        match db.ensure_schema() {
            Ok(_) => {}
            Err(Error::Migration(e)) => {
                warn!("Continuing with legacy schema, all rows read as expense: {e}");
            }
            Err(e) => return Err(self.load_failed(Reload::SessionStart, self.state, e)),
        }
        self.load(db, Reload::SessionStart)
    }

    /// The host came back to the foreground.
    pub fn on_resume(&mut self, db: &Database) -> Result<()> {
        self.load(db, Reload::Resume)
    }

    pub fn load(&mut self, db: &Database, reason: Reload) -> Result<()> {
        let previous = self.state;
        self.state = SyncState::Loading;
        match db.list_all() {
            Ok(records) => {
                let totals = Totals::from_records(&records);
                self.snapshot = Snapshot { records, totals };
                self.state = SyncState::Ready;
                debug!("Loaded {} transactions ({reason:?})", self.snapshot.records.len());
                Ok(())
            }
            Err(e) => Err(self.load_failed(reason, previous, e)),
        }
    }

    fn load_failed(&mut self, reason: Reload, previous: SyncState, e: Error) -> Error {
        // Loading is never a resting state
        self.state = match previous {
            SyncState::Loading => SyncState::Idle,
            other => other,
        };
        error!("Reload ({reason:?}) failed: {e}");
        self.set_status(format!("Could not load transactions: {e}"));
        e
    }

    // ── Form ──────────────────────────────────────────────────

    /// Prefill type chosen by an external entry point. Only applies while
    /// not editing.
    pub fn set_default_type(&mut self, kind: TransactionType) {
        self.default_type = kind;
        if self.editing.is_none() {
            self.form.kind = kind;
        }
    }

    pub fn begin_edit(&mut self, id: i64) -> bool {
        let Some(txn) = self.snapshot.records.iter().find(|t| t.id == id) else {
            self.set_status(format!("No transaction with id {id}"));
            return false;
        };
        let form = TransactionForm::from_transaction(txn);
        let msg = format!("Editing '{}'", txn.description);
        self.form = form;
        self.editing = Some(id);
        self.set_status(msg);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.clear(self.default_type);
    }

    /// Insert, or update when editing. The form is only cleared once the
    /// write succeeds. `Ok` means the write is committed even if the reload
    /// after it failed.
    pub fn submit(&mut self, db: &Database) -> Result<i64> {
        let entry = match self.form.validate() {
            Ok(entry) => entry,
            Err(e) => {
                self.set_status(e.to_string());
                return Err(e.into());
            }
        };

        let date = timestamp_now();
        let written = match self.editing {
            Some(id) => db
                .update(id, &entry.description, entry.amount, &date, entry.kind)
                .map(|()| id),
            None => db.insert(&entry.description, entry.amount, &date, entry.kind),
        };
        let id = match written {
            Ok(id) => id,
            Err(e) => {
                error!("Saving transaction failed: {e}");
                self.set_status(format!("Could not save: {e}"));
                return Err(e);
            }
        };

        let verb = if self.editing.is_some() { "Updated" } else { "Added" };
        self.editing = None;
        self.form.clear(self.default_type);
        self.refresh_after_write(db, format!("{verb} '{}'", entry.description));
        Ok(id)
    }

    pub fn delete(&mut self, db: &Database, id: i64) -> Result<()> {
        if let Err(e) = db.delete(id) {
            error!("Deleting transaction {id} failed: {e}");
            self.set_status(format!("Could not delete: {e}"));
            return Err(e);
        }
        if self.editing == Some(id) {
            self.cancel_edit();
        }
        self.refresh_after_write(db, format!("Deleted transaction {id}"));
        Ok(())
    }

    /// The write is already committed; a failed reload only shows up in the
    /// status line.
    fn refresh_after_write(&mut self, db: &Database, done: String) {
        match self.load(db, Reload::AfterMutation) {
            Ok(()) => self.set_status(done),
            Err(e) => {
                self.set_status(format!("{done}, but the list could not be refreshed: {e}"));
            }
        }
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
