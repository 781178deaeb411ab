use crate::config::Config;
use crate::services::store::SensorStore;
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: SensorStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: SensorStore::new(),
        }
    }
}

impl FromRef<AppState> for SensorStore {
    fn from_ref(state: &AppState) -> SensorStore {
        state.store.clone()
    }
}
