use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{map_query_rejection, AppResult};
use crate::model::AlertEntry;
use crate::services::store::SensorStore;
use crate::state::AppState;
use crate::validation::{FieldProblem, ValidationErrors};

#[derive(Debug, Clone, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct AlertsQuery {
    /// Unit whose out-of-range readings to return.
    #[serde(rename = "unitId")]
    unit_id: Option<String>,
}

/// Up to ten out-of-range readings for a unit, newest first. Unknown units return `[]`.
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "alerts",
    params(AlertsQuery),
    responses(
        (status = 200, description = "Problematic readings", body = Vec<AlertEntry>),
        (status = 422, description = "Missing unitId", body = crate::error::ErrorBody)
    )
)]
pub(crate) async fn get_alerts(
    State(store): State<SensorStore>,
    query: Result<Query<AlertsQuery>, QueryRejection>,
) -> AppResult<Json<Vec<AlertEntry>>> {
    let Query(query) = query.map_err(map_query_rejection)?;
    let Some(unit_id) = query.unit_id else {
        return Err(ValidationErrors::single("query.unitId", FieldProblem::Missing).into());
    };

    let alerts = store.alerts_for(&unit_id).await;
    tracing::debug!(unit_id = %unit_id, alerts = alerts.len(), "alert query");
    Ok(Json(alerts))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/alerts", get(get_alerts))
}
