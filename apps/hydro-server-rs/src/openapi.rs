use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value as JsonValue;
use utoipa::OpenApi;

use crate::error::{internal_error, AppResult};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "hydro-server-rs",
        description = "Sensor batch ingest with last-reading pH classification and alert lookup"
    ),
    paths(
        crate::routes::health::healthz_handler,
        crate::routes::sensor::post_units,
        crate::routes::alerts::get_alerts,
    ),
    components(schemas(
        crate::routes::health::HealthResponse,
        crate::model::Unit,
        crate::model::Pod,
        crate::model::Reading,
        crate::model::Classification,
        crate::model::HealthLabel,
        crate::model::AlertEntry,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "sensor", description = "Unit sensor batch ingest"),
        (name = "alerts", description = "Out-of-range pH readings")
    )
)]
pub struct ApiDoc;

pub fn openapi_json() -> anyhow::Result<JsonValue> {
    Ok(serde_json::to_value(ApiDoc::openapi())?)
}

async fn openapi_handler() -> AppResult<Json<JsonValue>> {
    let doc = serde_json::to_value(ApiDoc::openapi()).map_err(internal_error)?;
    Ok(Json(doc))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_handler))
}
