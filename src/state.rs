use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::upstream::Upstream;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub upstream: Upstream,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self> {
        let upstream = Upstream::new(&config.backend_url, config.request_timeout())?;
        Ok(Self { config, upstream })
    }
}
