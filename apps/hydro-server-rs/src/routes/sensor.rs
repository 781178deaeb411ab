use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value as JsonValue;

use crate::error::{map_json_rejection, AppError, AppResult};
use crate::model::Unit;
use crate::services::store::SensorStore;
use crate::state::AppState;
use crate::validation::validate_units;

/// Accepts a batch of unit submissions, classifies each from its latest reading and echoes the
/// batch back with `classification` filled in (left `null` for units without readings).
#[utoipa::path(
    post,
    path = "/api/sensor",
    tag = "sensor",
    request_body = Vec<Unit>,
    responses(
        (status = 200, description = "Submitted units with classification", body = Vec<Unit>),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody)
    )
)]
pub(crate) async fn post_units(
    State(store): State<SensorStore>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> AppResult<Json<Vec<Unit>>> {
    let Json(body) = payload.map_err(map_json_rejection)?;
    let units = validate_units(&body).map_err(|errors| {
        tracing::warn!(invalid_fields = errors.0.len(), "rejected sensor batch");
        AppError::from(errors)
    })?;

    let submitted = units.len();
    let (units, stats) = store.ingest(units).await;
    let classified = units
        .iter()
        .filter(|unit| unit.classification.is_some())
        .count();
    tracing::info!(
        submitted,
        classified,
        records_total = stats.records,
        snapshots_total = stats.snapshots,
        "ingested sensor batch"
    );
    Ok(Json(units))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/sensor", post(post_units))
}
