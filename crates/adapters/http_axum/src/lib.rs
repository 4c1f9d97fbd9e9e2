//! # opsdeck-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** exposing every automation store operation
//!   (`/api/automations`, `/api/automations/{id}/sections`, …) plus the
//!   read-side views (`/api/dashboard`, `/api/schedules`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `opsdeck-app` (for the service and port traits) and
//! `opsdeck-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
