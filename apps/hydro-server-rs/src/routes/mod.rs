pub mod alerts;
pub mod health;
pub mod sensor;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsOrigins;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allow_origins);
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .merge(health::router())
        .nest(
            "/api",
            Router::new()
                .merge(sensor::router())
                .merge(alerts::router())
                .merge(crate::openapi::router()),
        )
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}

/// Any method and header; credentials are never allowed so a wildcard origin stays valid.
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(err) => {
                        tracing::warn!(origin = %origin, error = %err, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value as JsonValue};
    use tower::ServiceExt;

    use crate::test_support::{test_config, test_state};

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, JsonValue) {
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: &JsonValue) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let (status, body) = send(router(test_state()), get("/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn post_sensor_returns_classification() {
        let payload = json!([{
            "id": "unit1",
            "pods": [{"id": "pod1", "age": 3}],
            "readings": [{"id": "r1", "pH": 6.5, "temp": 22.3, "ec": 1.5, "timestamp": "2025-06-05T12:00:00"}]
        }]);
        let (status, body) = send(router(test_state()), post_json("/api/sensor", &payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body[0]["classification"],
            json!({"status": "OK", "classification": "Healthy"})
        );
        assert_eq!(body[0]["readings"][0]["pH"], json!(6.5));
        assert_eq!(body[0]["pods"][0]["age"], json!(3));
    }

    #[tokio::test]
    async fn post_sensor_unit_without_readings_has_null_classification() {
        let payload = json!([{"id": "bare", "pods": [], "readings": []}]);
        let (status, body) = send(router(test_state()), post_json("/api/sensor", &payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["classification"], JsonValue::Null);
    }

    #[tokio::test]
    async fn post_sensor_rejects_invalid_fields_with_details() {
        let payload = json!([{"id": "u", "pods": [], "readings": [{"id": "r", "pH": "x"}]}]);
        let (status, body) = send(router(test_state()), post_json("/api/sensor", &payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], json!("Validation failed"));
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|detail| detail["field"].as_str().unwrap())
            .collect();
        assert_eq!(
            fields,
            vec![
                "body[0].readings[0].pH",
                "body[0].readings[0].temp",
                "body[0].readings[0].ec",
                "body[0].readings[0].timestamp",
            ]
        );
    }

    #[tokio::test]
    async fn post_sensor_rejects_malformed_json() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/sensor")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("[{"))
            .unwrap();
        let (status, body) = send(router(test_state()), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn post_sensor_rejects_oversized_body() {
        let mut config = test_config();
        config.max_body_bytes = 16;
        let state = AppState::new(config);
        let payload = json!([{"id": "a-long-unit-identifier", "pods": [], "readings": []}]);
        let (status, _) = send(router(state), post_json("/api/sensor", &payload)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn alerts_require_unit_id_but_accept_empty_value() {
        let app = router(test_state());
        let (status, body) = send(app.clone(), get("/api/alerts")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["details"][0]["field"], json!("query.unitId"));

        let (status, body) = send(app, get("/api/alerts?unitId=")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn alerts_for_unknown_unit_is_empty_list() {
        let (status, body) = send(router(test_state()), get("/api/alerts?unitId=unknown")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn cors_allows_any_origin_by_default() {
        let request = Request::builder()
            .uri("/healthz")
            .header(header::ORIGIN, "http://dashboard.local")
            .body(Body::empty())
            .unwrap();
        let resp = router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn cors_restricts_to_configured_origins() {
        let mut config = test_config();
        config.cors_allow_origins = CorsOrigins::List(vec!["http://allowed.local".to_string()]);
        let app = router(AppState::new(config));

        let allowed = Request::builder()
            .uri("/healthz")
            .header(header::ORIGIN, "http://allowed.local")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(allowed).await.unwrap();
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some("http://allowed.local")
        );

        let denied = Request::builder()
            .uri("/healthz")
            .header(header::ORIGIN, "http://other.local")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(denied).await.unwrap();
        assert!(resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let (status, body) = send(router(test_state()), get("/api/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/sensor"]["post"].is_object());
        assert!(body["paths"]["/api/alerts"]["get"].is_object());
        assert!(body["paths"]["/healthz"]["get"].is_object());
    }
}
