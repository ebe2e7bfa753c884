//! # Reqwest Transport
//!
//! `Transport` implementation over `reqwest`. All configured-once state
//! (base URL, authorization header, timeouts) lives here; everything
//! per-call arrives in the `RequestSpec`, so one instance can be shared
//! across concurrent tasks.

use crate::config::BingaConfig;
use async_trait::async_trait;
use binga_core::{BingaError, BingaResult, Method, RawResponse, RequestSpec, Transport};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// HTTP transport for the Binga gateway
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    authorization: String,
}

impl ReqwestTransport {
    /// Create a transport for a base endpoint URL and a ready-made
    /// `Authorization` header value
    pub fn new(
        base_url: impl Into<String>,
        authorization: impl Into<String>,
    ) -> BingaResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                BingaError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            authorization: authorization.into(),
        })
    }

    /// Create a transport from a client configuration
    pub fn from_config(config: &BingaConfig) -> BingaResult<Self> {
        Self::new(&config.api_base_url, config.basic_auth_header())
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, spec: &RequestSpec) -> BingaResult<RawResponse> {
        let method = match spec.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let url = self.url_for(&spec.path);

        let mut request = self
            .client
            .request(method, &url)
            .header(ACCEPT, spec.accept.mime())
            .header(AUTHORIZATION, self.authorization.as_str());

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if !spec.form.is_empty() {
            request = request.form(&spec.form);
        }
        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let started = Instant::now();

        // A failure to complete the call at all is a Transport error.
        // Error statuses come back as regular responses and are
        // classified after decoding.
        let response = request.send().await.map_err(|e| BingaError::Transport {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let effective_url = response.url().to_string();

        let mut headers: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers
                    .entry(name.as_str().to_ascii_lowercase())
                    .or_default()
                    .push(value.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BingaError::Transport {
                message: e.to_string(),
            })?
            .to_vec();

        let elapsed = started.elapsed();
        debug!(
            method = spec.method.as_str(),
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            effective_url = %effective_url,
            "gateway call completed"
        );

        Ok(RawResponse {
            status,
            headers,
            body,
            elapsed,
            effective_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn test_base_url_normalization() {
        let transport = ReqwestTransport::new("http://preprod.binga.ma/", "Basic abc").unwrap();
        assert_eq!(
            transport.url_for("/bingaApi/api/orders"),
            "http://preprod.binga.ma/bingaApi/api/orders"
        );
    }

    #[test]
    fn test_from_config_uses_environment_endpoint() {
        let config = BingaConfig::dev_sandbox();
        let transport = ReqwestTransport::from_config(&config).unwrap();
        assert_eq!(transport.base_url, Environment::Dev.base_url());
        assert_eq!(transport.authorization, config.basic_auth_header());
    }
}
