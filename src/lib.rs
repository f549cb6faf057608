//! SFD Ledger - account state transitions over a key-value world state
//!
//! # Architecture
//!
//! ## Ledger Core
//! - [`ledger`] - create / query / credit / debit and operation dispatch
//! - [`account`] - The account record and its status
//!
//! ## State Management
//! - [`store`] - Account encoding plus keyed load/save
//! - [`persistence`] - World-state backends (SQLite, in-memory)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Ledger Core
// ============================================================================
pub mod account;
pub mod ledger;

// ============================================================================
// State Management
// ============================================================================
pub mod persistence;
pub mod store;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

pub use account::{Account, AccountStatus};
pub use error::{LedgerError, Result};
pub use ledger::{AccountLedger, Operation};
pub use persistence::{InMemoryStore, KeyValueStore, SqliteStore};
