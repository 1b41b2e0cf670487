//! Ledger CLI - a terminal purchase ledger
//!
//! Tracks providers (each located at a city, neighborhood and street), the
//! products they offer, and the acquisitions bought from them. Every record
//! lives in an ordered collection keyed by its identifying fields; changing
//! one of those fields re-keys the record and carries its dependents along.
//!
//! # Architecture
//!
//! - `collection`: keyed, ordered AVL collection
//! - `models`: providers, offers, acquisitions, addresses, money
//! - `ledger`: the three collections and the cascades between them
//! - `config`: paths and settings
//! - `storage`: JSON persistence
//! - `audit`: JSON-lines audit log
//! - `services`: validation, persistence and auditing around the ledger
//! - `cli`, `display`, `export`: the command-line surface
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_cli::config::{LedgerPaths, Settings};
//! use ledger_cli::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?.with_audit(settings.audit_enabled);
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod collection;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
