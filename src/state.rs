use std::sync::Arc;

use crate::config::Config;
use crate::session::SessionStore;
use crate::source::DataSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DataSource>,
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>, config: Config) -> Self {
        Self {
            source,
            sessions: Arc::new(SessionStore::new(config.session_ttl)),
            config,
        }
    }
}
