//! # Binga Configuration
//!
//! Credential and environment configuration for the gateway client.
//! Credentials come from explicit values, environment variables, or the
//! documented sandbox set.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use binga_core::{BingaError, BingaResult};
use std::env;
use std::fmt;

/// Version tag injected into every charge payload
pub const API_VERSION: &str = "1.1";

/// Base path for every order operation
pub const ORDERS_PATH: &str = "/bingaApi/api/orders";

/// Path for submitting a `pay` charge
pub const PAY_PATH: &str = "/bingaApi/api/orders/pay";

/// Path for submitting a `prepay` charge. The gateway routes both charge
/// kinds through the same endpoint; the constant is kept separate because
/// the payment type still changes the signed payload.
pub const PREPAY_PATH: &str = "/bingaApi/api/orders/pay";

/// Path for one order looked up by code
pub fn order_path(code: &str) -> String {
    format!("{ORDERS_PATH}/{code}")
}

/// Path for the orders of one store
pub fn store_orders_path(store_id: &str) -> String {
    format!("{ORDERS_PATH}/store/{store_id}")
}

/// Gateway environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Pre-production sandbox
    Dev,
    /// Live gateway
    Prod,
}

impl Environment {
    /// Base endpoint URL for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Dev => "http://preprod.binga.ma",
            Environment::Prod => "https://api.binga.ma",
        }
    }

    /// Parse an environment name; anything other than `prod` is `Dev`
    pub fn from_name(name: &str) -> Self {
        match name {
            "prod" | "production" => Environment::Prod,
            _ => Environment::Dev,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Dev => write!(f, "dev"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

/// Binga API configuration
#[derive(Debug, Clone)]
pub struct BingaConfig {
    /// Merchant storefront identifier
    pub store_id: String,

    /// Private key used for payload checksums
    pub private_key: String,

    /// Basic-auth username
    pub username: String,

    /// Basic-auth password
    pub password: String,

    /// Gateway environment
    pub environment: Environment,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

impl BingaConfig {
    /// Create a config with explicit credentials
    pub fn new(
        store_id: impl Into<String>,
        private_key: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            private_key: private_key.into(),
            username: username.into(),
            password: password.into(),
            environment,
            api_base_url: environment.base_url().to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `BINGA_STORE_ID`
    /// - `BINGA_PRIVATE_KEY`
    /// - `BINGA_USERNAME`
    /// - `BINGA_PASSWORD`
    pub fn from_env(environment: Environment) -> BingaResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_id = env::var("BINGA_STORE_ID")
            .map_err(|_| BingaError::Configuration("BINGA_STORE_ID not set".to_string()))?;
        let private_key = env::var("BINGA_PRIVATE_KEY")
            .map_err(|_| BingaError::Configuration("BINGA_PRIVATE_KEY not set".to_string()))?;
        let username = env::var("BINGA_USERNAME")
            .map_err(|_| BingaError::Configuration("BINGA_USERNAME not set".to_string()))?;
        let password = env::var("BINGA_PASSWORD")
            .map_err(|_| BingaError::Configuration("BINGA_PASSWORD not set".to_string()))?;

        let config = Self::new(store_id, private_key, username, password, environment);
        config.validate()?;

        Ok(config)
    }

    /// Sandbox credentials published for the `dev` environment
    pub fn dev_sandbox() -> Self {
        Self::new(
            "4010",
            "4010653ddd7e9b8cece2779bbed423ce",
            "Binga.ma",
            "Binga",
            Environment::Dev,
        )
    }

    /// Check that every credential field is present. A missing credential
    /// is fatal at construction, never at call time.
    pub fn validate(&self) -> BingaResult<()> {
        if self.store_id.is_empty() {
            return Err(BingaError::Configuration(
                "the 'Store ID' is not defined".to_string(),
            ));
        }
        if self.private_key.is_empty() {
            return Err(BingaError::Configuration(
                "the 'Private Key' is not defined".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(BingaError::Configuration(
                "the 'Username' is not defined".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(BingaError::Configuration(
                "the 'Password' is not defined".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the Basic authorization header value
    pub fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}
