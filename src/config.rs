//! Where the database lives and how it is opened.
//!
//! Both binaries resolve the file through here so the quick-add path can
//! never end up writing to a second copy of the data.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::db::{ConnectionPolicy, Database};

pub const DATABASE_NAME: &str = "cashlog.db";
pub const DB_ENV: &str = "CASHLOG_DB";
pub const CONNECTION_ENV: &str = "CASHLOG_CONNECTION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub policy: ConnectionPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            std::env::var(DB_ENV).ok(),
            std::env::var(CONNECTION_ENV).ok(),
        )
    }

    pub(crate) fn resolve(db_path: Option<String>, policy: Option<String>) -> Result<Self> {
        let db_path = match db_path.filter(|p| !p.trim().is_empty()) {
            Some(p) => expand_home(p.trim()),
            None => default_db_path()?,
        };
        let policy = match policy.filter(|p| !p.trim().is_empty()) {
            Some(p) => ConnectionPolicy::parse(&p).ok_or_else(|| {
                anyhow::anyhow!("{CONNECTION_ENV} must be 'singleton' or 'per-call', got '{p}'")
            })?,
            None => ConnectionPolicy::default(),
        };
        Ok(Self { db_path, policy })
    }

    pub fn ensure_data_dir(&self) -> Result<()> {
        if let Some(dir) = self.db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Make sure the parent directory exists, then hand back a lazily opened store.
    pub fn open_database(&self) -> Result<Database> {
        self.ensure_data_dir()?;
        Ok(Database::open(&self.db_path, self.policy))
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "cashlog", "Cashlog")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().join(DATABASE_NAME))
}

pub(crate) fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(rest)
        }
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_explicit_values() {
        let config =
            Config::resolve(Some("/tmp/ledger.db".into()), Some("per-call".into())).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/ledger.db"));
        assert_eq!(config.policy, ConnectionPolicy::PerCall);
    }

    #[test]
    fn test_resolve_defaults_to_singleton() {
        let config = Config::resolve(Some("/tmp/ledger.db".into()), None).unwrap();
        assert_eq!(config.policy, ConnectionPolicy::Singleton);
        let config = Config::resolve(Some("/tmp/ledger.db".into()), Some("  ".into())).unwrap();
        assert_eq!(config.policy, ConnectionPolicy::Singleton);
    }

    #[test]
    fn test_resolve_rejects_unknown_policy() {
        let err = Config::resolve(Some("/tmp/ledger.db".into()), Some("pool".into())).unwrap_err();
        assert!(err.to_string().contains(CONNECTION_ENV));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path.db"), PathBuf::from("/abs/path.db"));
        assert!(expand_home("~/cashlog.db").ends_with("cashlog.db"));
        assert!(!expand_home("~/cashlog.db").starts_with("~"));
    }

    #[test]
    fn test_open_database_creates_parent_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join(DATABASE_NAME);
        let config = Config {
            db_path: path.clone(),
            policy: ConnectionPolicy::PerCall,
        };
        let db = config.open_database().unwrap();
        assert!(path.parent().unwrap().is_dir());
        assert!(db.list_all().unwrap().is_empty());
        assert!(path.is_file());
    }
}
