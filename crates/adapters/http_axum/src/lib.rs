//! # wakeshift-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for rule management (`/api/rules`, `/api/templates`),
//!   wake-time evaluation (`/api/adjustments`) and outcome feedback
//!   (`/api/outcomes`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `wakeshift-app` (for port traits and services) and
//! `wakeshift-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod testing;
