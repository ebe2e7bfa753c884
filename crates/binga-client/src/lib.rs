//! # binga-client
//!
//! Client for the Binga payment-gateway HTTP API.
//!
//! The pipeline behind every operation: a validated [`BingaConfig`], an
//! immutable per-call request spec executed on a reusable transport, a
//! content-type-driven decoder (JSON or XML) and a `result` discriminator
//! check that hydrates [`binga_core::Order`] entities or surfaces a typed
//! error.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use binga_client::{BingaClient, BingaConfig, Environment, Format, ListParams};
//! use binga_core::ChargeRequest;
//!
//! // Credentials from BINGA_* environment variables
//! let config = BingaConfig::from_env(Environment::Prod)?;
//! let client = BingaClient::new(config)?;
//!
//! // Retrieve one order
//! let order = client.order("CTN000000123", Format::Json).await?;
//!
//! // List the store's orders
//! let orders = client.store_orders(ListParams::default(), Format::Json).await?;
//!
//! // Bill a customer
//! let request = ChargeRequest::new("ORD-1001", 199.99, "client@example.com")
//!     .with_buyer_name("Amine", "Idrissi");
//! let order = client.pay(&request, Format::Json, 7).await?;
//! ```
//!
//! ## Signing
//!
//! Charge payloads carry an MD5 checksum over the formatted amount, the
//! merchant identity fields and the store's private key; see
//! [`checksum::generate_check_sum`]. Amounts and expiration timestamps are
//! normalized by [`format`] so the signed shapes match what the gateway
//! recomputes.

pub mod checksum;
pub mod client;
pub mod config;
pub mod decode;
pub mod format;
pub mod transport;

// Re-exports
pub use checksum::{generate_check_sum, ChargeType};
pub use client::{BingaClient, ListParams};
pub use config::{BingaConfig, Environment, API_VERSION};
pub use decode::{decode, Payload};
pub use format::{format_amount, format_expiration_date, format_expiration_date_with};
pub use transport::ReqwestTransport;

// Core types, re-exported so most callers need only this crate
pub use binga_core::{
    BingaError, BingaResult, ChargeRequest, Format, Order, RawResponse, RequestSpec, Transport,
};
