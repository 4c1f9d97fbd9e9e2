//! JSON REST handlers for automations.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use opsdeck_app::ports::IdGenerator;
use opsdeck_domain::automation::{Automation, AutomationPatch, AutomationStatus, NewAutomation};
use opsdeck_domain::id::AutomationId;
use opsdeck_domain::query::AutomationFilter;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `PUT /api/automations/{id}/status`.
#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: AutomationStatus,
}

/// Request body for `PUT /api/automations/{id}/enabled`.
#[derive(Deserialize)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

/// Request body for `PUT /api/automations/{id}/schedule`.
///
/// A missing, `null`, or blank `cronExpression` unschedules the automation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScheduleRequest {
    #[serde(default)]
    pub cron_expression: Option<String>,
}

/// Response body for `POST /api/automations/disable-all`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisableAllResponse {
    pub disabled: usize,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Automation>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from endpoints returning a single automation.
pub enum GetResponse {
    Ok(Json<Automation>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create and duplicate endpoints.
pub enum CreateResponse {
    Created(Json<Automation>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/automations`: list automations, optionally filtered by
/// `search`, `status`, `type`, and `environment`.
pub async fn list<G>(
    State(state): State<AppState<G>>,
    Query(filter): Query<AutomationFilter>,
) -> ListResponse
where
    G: IdGenerator + Send + 'static,
{
    ListResponse::Ok(Json(state.automation_service.list_filtered(&filter)))
}

/// `GET /api/automations/{id}`: get automation by id.
pub async fn get<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<AutomationId>,
) -> Result<GetResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let automation = state.automation_service.get(&id)?;
    Ok(GetResponse::Ok(Json(automation)))
}

/// `POST /api/automations`: create a new draft automation.
pub async fn create<G>(
    State(state): State<AppState<G>>,
    Json(req): Json<NewAutomation>,
) -> Result<CreateResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let created = state.automation_service.create(req)?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PATCH /api/automations/{id}`: partial update.
///
/// The body is checked for protected fields before it is decoded, so
/// `{"id": …}` is reported as such rather than as an unknown field.
pub async fn update<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<AutomationId>,
    Json(body): Json<serde_json::Value>,
) -> Result<GetResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let patch = AutomationPatch::from_json(body)?;
    let updated = state.automation_service.update(&id, patch)?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/automations/{id}`: delete an automation and its config.
pub async fn delete<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<AutomationId>,
) -> Result<DeleteResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    state.automation_service.delete(&id)?;
    Ok(DeleteResponse::NoContent)
}

/// `POST /api/automations/{id}/duplicate`: deep copy with fresh ids.
pub async fn duplicate<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<AutomationId>,
) -> Result<CreateResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let copy = state.automation_service.duplicate(&id)?;
    Ok(CreateResponse::Created(Json(copy)))
}

/// `PUT /api/automations/{id}/status`
pub async fn set_status<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<AutomationId>,
    Json(req): Json<SetStatusRequest>,
) -> Result<GetResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let updated = state.automation_service.set_status(&id, req.status)?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `PUT /api/automations/{id}/enabled`: scheduling toggle.
pub async fn set_enabled<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<AutomationId>,
    Json(req): Json<SetEnabledRequest>,
) -> Result<GetResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let updated = state.automation_service.set_enabled(&id, req.enabled)?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `PUT /api/automations/{id}/schedule`
pub async fn set_schedule<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<AutomationId>,
    Json(req): Json<SetScheduleRequest>,
) -> Result<GetResponse, ApiError>
where
    G: IdGenerator + Send + 'static,
{
    let updated = state
        .automation_service
        .set_cron_expression(&id, req.cron_expression)?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `POST /api/automations/disable-all`
pub async fn disable_all<G>(State(state): State<AppState<G>>) -> Json<DisableAllResponse>
where
    G: IdGenerator + Send + 'static,
{
    let disabled = state.automation_service.disable_all();
    Json(DisableAllResponse { disabled })
}
