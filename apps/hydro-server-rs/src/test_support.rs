use crate::config::{Config, CorsOrigins};
use crate::state::AppState;

pub fn test_config() -> Config {
    Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 0,
        cors_allow_origins: CorsOrigins::Any,
        max_body_bytes: 64 * 1024,
    }
}

pub fn test_state() -> AppState {
    AppState::new(test_config())
}
