//! # opsdeck-domain
//!
//! Pure domain model for the opsdeck automation console.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Automations** (bots, scripts, pipelines, integrations, transfers)
//! - Define **Config sections** and their typed **entries**
//! - Read-side queries: filtering, the scheduling view, dashboard aggregates
//! - Contain all invariant enforcement and per-record mutation logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! Identifier allocation is expressed as a trait in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod config;
pub mod query;
pub mod summary;

mod serde_util;
