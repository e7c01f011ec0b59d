//! Persistence core for Cashlog: a single SQLite table of income and expense
//! records, the connection policy around it, and the view state that keeps a
//! list and its totals in step with the file.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod quick_add;
pub mod run;
mod util;


pub use app::{App, SyncState};
pub use db::{ConnectionPolicy, Database};
pub use error::{Error, Result, ValidationError};
