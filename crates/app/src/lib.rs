//! # wakeshift-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RuleRepository`: CRUD for condition rules, in registration order
//!   - `OutcomeStore`: record alarm outcomes with their score updates, and query them
//! - Define **driving/inbound ports** as use-case structs:
//!   - `RuleService`: create, edit, enable/disable, delete, templates, review list
//!   - `AdjustmentEngine`: evaluate a context snapshot into a wake plan
//!   - `EffectivenessTracker` / `OutcomeQueue`: fold outcomes into rule scores,
//!     one outcome at a time
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `wakeshift-domain` only, plus `tokio`: `sync` for the outcome
//! queue channels and `rt` for the `tokio::spawn` in `OutcomeQueue::spawn`.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod adjustment_engine;
pub mod effectiveness_tracker;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
