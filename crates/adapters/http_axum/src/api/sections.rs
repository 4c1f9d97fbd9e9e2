//! JSON REST handlers for configuration sections and entries.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use opsdeck_app::ports::IdGenerator;
use opsdeck_domain::config::{
    ConfigEntry, ConfigSection, ConfigValue, NewConfigEntry, NewConfigSection, SectionPatch,
};
use opsdeck_domain::id::{AutomationId, EntryId, SectionId};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from section endpoints.
pub enum SectionResponse {
    Ok(Json<ConfigSection>),
    Created(Json<ConfigSection>),
    NoContent,
}

impl IntoResponse for SectionResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from entry endpoints.
pub enum EntryResponse {
    Ok(Json<ConfigEntry>),
    Created(Json<ConfigEntry>),
    NoContent,
}

impl IntoResponse for EntryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/automations/{id}/sections`
pub async fn create_section<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<AutomationId>,
    Json(req): Json<NewConfigSection>,
) -> Result<SectionResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let section = state.automation_service.add_config_section(&id, req)?;
    Ok(SectionResponse::Created(Json(section)))
}

/// `PATCH /api/automations/{id}/sections/{section_id}`
pub async fn update_section<G>(
    State(state): State<AppState<G>>,
    Path((id, section_id)): Path<(AutomationId, SectionId)>,
    Json(patch): Json<SectionPatch>,
) -> Result<SectionResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let section = state
        .automation_service
        .update_config_section(&id, &section_id, patch)?;
    Ok(SectionResponse::Ok(Json(section)))
}

/// `DELETE /api/automations/{id}/sections/{section_id}`: removes the
/// section and all of its entries.
pub async fn delete_section<G>(
    State(state): State<AppState<G>>,
    Path((id, section_id)): Path<(AutomationId, SectionId)>,
) -> Result<SectionResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    state
        .automation_service
        .remove_config_section(&id, &section_id)?;
    Ok(SectionResponse::NoContent)
}

/// `POST /api/automations/{id}/sections/{section_id}/entries`
///
/// The body carries either a `type` with an optional `value`, or a `format`
/// whose default value is used.
pub async fn create_entry<G>(
    State(state): State<AppState<G>>,
    Path((id, section_id)): Path<(AutomationId, SectionId)>,
    Json(req): Json<NewConfigEntry>,
) -> Result<EntryResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let entry = state
        .automation_service
        .add_config_entry(&id, &section_id, req)?;
    Ok(EntryResponse::Created(Json(entry)))
}

/// `DELETE /api/automations/{id}/sections/{section_id}/entries/{entry_id}`
pub async fn delete_entry<G>(
    State(state): State<AppState<G>>,
    Path((id, section_id, entry_id)): Path<(AutomationId, SectionId, EntryId)>,
) -> Result<EntryResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    state
        .automation_service
        .remove_config_entry(&id, &section_id, &entry_id)?;
    Ok(EntryResponse::NoContent)
}

/// `PUT /api/automations/{id}/sections/{section_id}/entries/{entry_id}/value`
///
/// The body is a tagged value such as `{"type": "number", "value": 5432}`;
/// its type must match the entry's.
pub async fn set_entry_value<G>(
    State(state): State<AppState<G>>,
    Path((id, section_id, entry_id)): Path<(AutomationId, SectionId, EntryId)>,
    Json(value): Json<ConfigValue>,
) -> Result<EntryResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let entry = state
        .automation_service
        .update_config_entry_value(&id, &section_id, &entry_id, value)?;
    Ok(EntryResponse::Ok(Json(entry)))
}
