//! # opsdeck-app
//!
//! Application layer: the automation store and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that callers can swap out:
//!   - `IdGenerator`: mints automation, section, and entry ids
//! - Provide in-process implementations that need no IO
//!   (`SequentialIdGenerator`, `UuidIdGenerator`)
//! - Own the authoritative collection of automations (`AutomationStore`) and
//!   serialise concurrent access to it (`AutomationService`)
//!
//! ## Dependency rule
//! Depends on `opsdeck-domain` only (plus `uuid` for random ids).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod id_generator;
pub mod ports;
pub mod services;
