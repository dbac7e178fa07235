//! # wakeshift-domain
//!
//! Pure domain model for the wakeshift wake-time adjustment engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Condition rules** (condition → adjustment pairs with a priority)
//! - Define **Contextual data** (weather, calendar, sleep, exercise, stress,
//!   screen-time signals supplied by the caller)
//! - Hold rules in an explicit, ordered [`registry::RuleRegistry`]
//! - **Evaluate** rules against a context snapshot ([`evaluation`])
//! - **Aggregate** firing rules into one bounded shift ([`aggregation`])
//! - Track per-rule **effectiveness** from alarm outcomes ([`effectiveness`])
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod aggregation;
pub mod context;
pub mod effectiveness;
pub mod evaluation;
pub mod outcome;
pub mod plan;
pub mod registry;
pub mod rule;
pub mod template;
