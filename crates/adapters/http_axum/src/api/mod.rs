//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod automations;
#[allow(clippy::missing_errors_doc)]
pub mod dashboard;
#[allow(clippy::missing_errors_doc)]
pub mod sections;

use axum::Router;
use axum::routing::{get, patch, post, put};

use opsdeck_app::ports::IdGenerator;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<G>() -> Router<AppState<G>>
where
    G: IdGenerator + Send + 'static,
{
    Router::new()
        // Automations
        .route(
            "/automations",
            get(automations::list::<G>).post(automations::create::<G>),
        )
        .route(
            "/automations/disable-all",
            post(automations::disable_all::<G>),
        )
        .route(
            "/automations/{id}",
            get(automations::get::<G>)
                .patch(automations::update::<G>)
                .delete(automations::delete::<G>),
        )
        .route(
            "/automations/{id}/duplicate",
            post(automations::duplicate::<G>),
        )
        .route("/automations/{id}/status", put(automations::set_status::<G>))
        .route(
            "/automations/{id}/enabled",
            put(automations::set_enabled::<G>),
        )
        .route(
            "/automations/{id}/schedule",
            put(automations::set_schedule::<G>),
        )
        // Config sections
        .route(
            "/automations/{id}/sections",
            post(sections::create_section::<G>),
        )
        .route(
            "/automations/{id}/sections/{section_id}",
            patch(sections::update_section::<G>).delete(sections::delete_section::<G>),
        )
        // Config entries
        .route(
            "/automations/{id}/sections/{section_id}/entries",
            post(sections::create_entry::<G>),
        )
        .route(
            "/automations/{id}/sections/{section_id}/entries/{entry_id}",
            axum::routing::delete(sections::delete_entry::<G>),
        )
        .route(
            "/automations/{id}/sections/{section_id}/entries/{entry_id}/value",
            put(sections::set_entry_value::<G>),
        )
        // Read-side views
        .route("/dashboard", get(dashboard::summary::<G>))
        .route("/schedules", get(dashboard::schedules::<G>))
}
