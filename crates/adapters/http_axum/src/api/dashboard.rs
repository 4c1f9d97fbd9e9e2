//! Read-side views: dashboard summary and scheduling rows.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use opsdeck_app::ports::IdGenerator;
use opsdeck_domain::query::{AutomationFilter, ScheduleEntry};
use opsdeck_domain::summary::{DEFAULT_RECENT_LIMIT, DashboardSummary};

use crate::state::AppState;

/// Query parameters for `GET /api/dashboard`.
#[derive(Deserialize)]
pub struct SummaryQuery {
    /// How many recently modified automations to include.
    pub limit: Option<usize>,
}

/// `GET /api/dashboard`
pub async fn summary<G>(
    State(state): State<AppState<G>>,
    Query(query): Query<SummaryQuery>,
) -> Json<DashboardSummary>
where
    G: IdGenerator + Send + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    Json(state.automation_service.summary(limit))
}

/// `GET /api/schedules`: accepts the same filters as the automation list.
pub async fn schedules<G>(
    State(state): State<AppState<G>>,
    Query(filter): Query<AutomationFilter>,
) -> Json<Vec<ScheduleEntry>>
where
    G: IdGenerator + Send + 'static,
{
    Json(state.automation_service.schedules(&filter))
}
