//! # Transport Seam
//!
//! The capability the gateway client needs from an HTTP transport: execute
//! one immutable `RequestSpec`, hand back one buffered `RawResponse`.
//!
//! Every call builds its own `RequestSpec`, so a single transport instance
//! holds only configured-once state (base URL, default headers) and may be
//! shared across concurrent tasks.

use crate::error::BingaResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Response formats the gateway can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Jsonp,
    Xml,
}

impl Format {
    /// MIME type sent in the `Accept` header
    pub fn mime(&self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Jsonp => "application/javascript",
            Format::Xml => "application/xml",
        }
    }

    /// Detect the decode format from a `Content-Type` header value,
    /// ignoring any parameters after `;`. Anything that is not XML decodes
    /// as JSON, the gateway's default.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let media_type = content_type
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .unwrap_or("");

        match media_type {
            "application/xml" | "text/xml" => Format::Xml,
            _ => Format::Json,
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::Json
    }
}

/// HTTP methods the gateway API uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One fully-assembled gateway request.
///
/// Built fresh per call with the `with_*` methods and never mutated after
/// submission. Replaces the shared-client setter chains of earlier designs
/// that were unsafe to reuse concurrently.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub accept: Format,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    /// Start a GET request spec for a path relative to the base URL
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Start a POST request spec for a path relative to the base URL
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            accept: Format::default(),
            query: Vec::new(),
            form: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Set the response format negotiated via `Accept`
    pub fn with_accept(mut self, accept: Format) -> Self {
        self.accept = accept;
        self
    }

    /// Append one query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Replace the form-encoded body
    pub fn with_form(mut self, form: Vec<(String, String)>) -> Self {
        self.form = form;
        self
    }

    /// Append one request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// One buffered gateway response, owned for the duration of a single call
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers, lowercased names
    pub headers: HashMap<String, Vec<String>>,

    /// Buffered body bytes
    pub body: Vec<u8>,

    /// Transfer duration, for observability
    pub elapsed: Duration,

    /// Final URL after redirects, for observability
    pub effective_url: String,
}

impl RawResponse {
    /// The `Content-Type` header value, if any
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get("content-type")
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport capability the gateway client is built on.
///
/// Implementations own the connection machinery; an HTTP error status is
/// still a successful execution here. Only a failure to complete the call
/// at all (connect, timeout, protocol) is an `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request and buffer the full response
    async fn execute(&self, spec: &RequestSpec) -> BingaResult<RawResponse>;
}

/// Type alias for a shared transport (dynamic dispatch)
pub type BoxedTransport = Arc<dyn Transport>;
