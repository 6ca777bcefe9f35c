//! HTTP transport backed by `ureq`

use std::time::Duration;

use ureq::Agent;

use super::Transport;
use crate::error::{Result, fetch_failed};

/// Blocking HTTP GET with a global per-request timeout
pub struct HttpTransport {
    agent: Agent,
    max_body_bytes: u64,
}

impl HttpTransport {
    /// Create a transport with a timeout and a cap on downloaded body size
    pub fn new(timeout: Duration, max_body_bytes: u64) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: Agent::new_with_config(config),
            max_body_bytes,
        }
    }

    fn get(&self, url: &str) -> Result<ureq::http::Response<ureq::Body>> {
        tracing::debug!(url, "GET");
        // Non-2xx statuses surface as errors from `call`
        self.agent.get(url).call().map_err(|e| fetch_failed(url, e))
    }
}

impl Transport for HttpTransport {
    fn get_text(&self, url: &str) -> Result<String> {
        let mut response = self.get(url)?;
        response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_string()
            .map_err(|e| fetch_failed(url, e))
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let mut response = self.get(url)?;
        response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_vec()
            .map_err(|e| fetch_failed(url, e))
    }
}
