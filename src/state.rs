use crate::config::Config;
use crate::models::PlayerSnapshot;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub snapshot: Arc<RwLock<PlayerSnapshot>>,
}

impl AppState {
    pub fn new(config: Config, snapshot: PlayerSnapshot) -> Self {
        Self {
            config: Arc::new(config),
            snapshot: Arc::new(RwLock::new(snapshot)),
        }
    }
}
