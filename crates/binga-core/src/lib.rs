//! # binga-core
//!
//! Core types and the transport seam for the binga-rs gateway client.
//!
//! This crate provides:
//! - `Transport` trait plus `RequestSpec`/`RawResponse` for the HTTP seam
//! - `Order` entity hydrated from decoded gateway responses
//! - `ChargeRequest` for submitting pay/prepay orders
//! - `BingaError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use binga_core::{ChargeRequest, Format, RequestSpec};
//!
//! // Assemble an immutable per-call request
//! let spec = RequestSpec::get("/bingaApi/api/orders/CTN000000123")
//!     .with_accept(Format::Json);
//!
//! // Describe a charge
//! let charge = ChargeRequest::new("ORD-1001", 199.99, "client@example.com")
//!     .with_buyer_name("Amine", "Idrissi");
//! ```

pub mod error;
pub mod order;
pub mod transport;

// Re-exports for convenience
pub use error::{reason_phrase, BingaError, BingaResult};
pub use order::{parse_gateway_datetime, ChargeRequest, Order};
pub use transport::{BoxedTransport, Format, Method, RawResponse, RequestSpec, Transport};
