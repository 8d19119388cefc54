use crate::errors::FetchError;
use crate::helpers::http::{redact, Fetch, HttpClient};
use crate::types::Config;

use std::sync::Arc;

use url::Url;

/// Everything an action creator needs to talk to the outside world
#[derive(Clone)]
pub struct ApiContext {
    http: Arc<dyn Fetch>,
    config: Arc<Config>,
}

impl ApiContext {
    pub fn new(http: Arc<dyn Fetch>, config: Config) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    pub fn from_config(config: Config) -> Result<Self, FetchError> {
        let http = HttpClient::new(&config.http, config.secrets())?;
        Ok(Self::new(Arc::new(http), config))
    }

    pub fn http(&self) -> &dyn Fetch {
        self.http.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The URL with every configured API key masked
    pub fn redact(&self, url: &Url) -> String {
        redact(url, &self.config.secrets())
    }
}
