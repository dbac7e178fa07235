//! # wakeshift-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `RuleRepository` and `OutcomeStore` ports from `wakeshift-app`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations under `migrations/`)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `wakeshift-app` (for port traits) and `wakeshift-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod outcome_store;
pub mod pool;
pub mod rule_repo;

pub use outcome_store::SqliteOutcomeStore;
pub use pool::{Config, Database};
pub use rule_repo::SqliteRuleRepository;
