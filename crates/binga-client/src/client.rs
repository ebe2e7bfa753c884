//! # Binga Gateway Client
//!
//! Facade orchestrating the request/response pipeline: build an immutable
//! per-call `RequestSpec`, execute it on the transport, decode the body,
//! inspect the `result` discriminator and hydrate `Order` entities.
//!
//! One client may be shared across concurrent tasks; it holds only the
//! immutable configuration and a reusable transport.

use crate::checksum::{generate_check_sum, ChargeType};
use crate::config::{self, BingaConfig};
use crate::decode::{decode, Payload};
use crate::format::{format_amount, format_expiration_date};
use crate::transport::ReqwestTransport;
use binga_core::{
    BingaError, BingaResult, BoxedTransport, ChargeRequest, Format, Order, RequestSpec,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Pagination for the listing operations.
///
/// The gateway accepts both long and short parameter names for limit and
/// offset; both are always sent for compatibility.
#[derive(Debug, Clone, Copy)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            offset: 0,
        }
    }
}

impl ListParams {
    /// Set the page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the offset
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// Client for the Binga payment-gateway API
pub struct BingaClient {
    config: BingaConfig,
    transport: BoxedTransport,
}

impl BingaClient {
    /// Create a client, validating the configuration and building the
    /// default `reqwest` transport for the configured environment.
    pub fn new(config: BingaConfig) -> BingaResult<Self> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::from_config(&config)?);
        Ok(Self { config, transport })
    }

    /// Create a client over an explicitly constructed transport
    pub fn with_transport(config: BingaConfig, transport: BoxedTransport) -> BingaResult<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &BingaConfig {
        &self.config
    }

    /// Retrieve one order by its gateway code
    #[instrument(skip(self))]
    pub async fn order(&self, code: &str, format: Format) -> BingaResult<Order> {
        let spec = RequestSpec::get(config::order_path(code)).with_accept(format);
        let record = self.fetch_single(&spec).await?;
        Ok(Order::from_payload(&record))
    }

    /// List the merchant's orders
    #[instrument(skip(self, params))]
    pub async fn merchant_orders(
        &self,
        params: ListParams,
        format: Format,
    ) -> BingaResult<Vec<Order>> {
        let spec = Self::list_spec(config::ORDERS_PATH.to_string(), params, format);
        self.fetch_list(&spec).await
    }

    /// List the orders of the configured store
    #[instrument(skip(self, params))]
    pub async fn store_orders(
        &self,
        params: ListParams,
        format: Format,
    ) -> BingaResult<Vec<Order>> {
        let path = config::store_orders_path(&self.config.store_id);
        let spec = Self::list_spec(path, params, format);
        self.fetch_list(&spec).await
    }

    /// Bill a customer immediately
    pub async fn pay(
        &self,
        request: &ChargeRequest,
        format: Format,
        expire_days: i64,
    ) -> BingaResult<Order> {
        self.charge(request, ChargeType::Pay, format, expire_days).await
    }

    /// Book a customer order (prepay reservation)
    pub async fn book(
        &self,
        request: &ChargeRequest,
        format: Format,
        expire_days: i64,
    ) -> BingaResult<Order> {
        self.charge(request, ChargeType::Prepay, format, expire_days)
            .await
    }

    /// Submit a charge of the given type
    #[instrument(skip(self, request), fields(external_id = %request.external_id))]
    pub async fn charge(
        &self,
        request: &ChargeRequest,
        charge_type: ChargeType,
        format: Format,
        expire_days: i64,
    ) -> BingaResult<Order> {
        let form = self.build_charge_form(request, charge_type, expire_days)?;
        let path = match charge_type {
            ChargeType::Pay => config::PAY_PATH,
            ChargeType::Prepay => config::PREPAY_PATH,
        };
        let spec = RequestSpec::post(path).with_accept(format).with_form(form);

        debug!(%charge_type, "submitting charge");
        let record = self.fetch_single(&spec).await?;
        let order = Order::from_payload(&record);
        info!(code = order.code.as_deref().unwrap_or(""), "charge accepted");

        Ok(order)
    }

    /// Assemble the signed form body for a charge.
    ///
    /// The checksum covers the formatted amount and the caller's identity
    /// fields only, before the injected defaults are merged in. Caller
    /// fields win over defaults on key collision.
    fn build_charge_form(
        &self,
        request: &ChargeRequest,
        charge_type: ChargeType,
        expire_days: i64,
    ) -> BingaResult<Vec<(String, String)>> {
        let amount = format_amount(request.amount)?;
        let check_sum = generate_check_sum(
            charge_type,
            &amount,
            &self.config.store_id,
            &request.external_id,
            &request.buyer_email,
            &self.config.private_key,
        );

        let mut form: BTreeMap<String, String> = BTreeMap::new();
        form.insert("storeId".to_string(), self.config.store_id.clone());
        form.insert("apiVersion".to_string(), config::API_VERSION.to_string());
        form.insert(
            "expirationDate".to_string(),
            format_expiration_date(expire_days)?,
        );
        form.insert("orderCheckSum".to_string(), check_sum);

        form.insert("amount".to_string(), amount);
        form.insert("externalId".to_string(), request.external_id.clone());
        form.insert("buyerEmail".to_string(), request.buyer_email.clone());
        if let Some(value) = &request.buyer_first_name {
            form.insert("buyerFirstName".to_string(), value.clone());
        }
        if let Some(value) = &request.buyer_last_name {
            form.insert("buyerLastName".to_string(), value.clone());
        }
        if let Some(value) = &request.buyer_phone {
            form.insert("buyerPhone".to_string(), value.clone());
        }
        if let Some(value) = &request.buyer_address {
            form.insert("buyerAddress".to_string(), value.clone());
        }
        if let Some(value) = &request.success_url {
            form.insert("successUrl".to_string(), value.clone());
        }
        if let Some(value) = &request.failure_url {
            form.insert("failureUrl".to_string(), value.clone());
        }
        for (key, value) in &request.extra {
            form.insert(key.clone(), value.clone());
        }

        Ok(form.into_iter().collect())
    }

    fn list_spec(path: String, params: ListParams, format: Format) -> RequestSpec {
        RequestSpec::get(path)
            .with_accept(format)
            .with_query("page", params.page.to_string())
            .with_query("limit", params.limit.to_string())
            .with_query("l", params.limit.to_string())
            .with_query("offset", params.offset.to_string())
            .with_query("o", params.offset.to_string())
    }

    /// Execute a spec expecting a single `orders.order` record
    async fn fetch_single(&self, spec: &RequestSpec) -> BingaResult<Value> {
        let response = self.transport.execute(spec).await?;
        let payload = decode(&response, spec.accept)?;
        let value = Self::check_result(payload, response.status)?;

        match value.pointer("/orders/order") {
            Some(record @ Value::Object(_)) => Ok(record.clone()),
            Some(Value::Array(items)) if items.iter().any(Value::is_object) => Ok(items
                .iter()
                .find(|item| item.is_object())
                .cloned()
                .unwrap_or(Value::Null)),
            _ => Err(BingaError::Decode {
                message: "success response carries no order record".to_string(),
                body: String::from_utf8_lossy(&response.body).into_owned(),
            }),
        }
    }

    /// Execute a spec expecting an `orders.order` sequence
    async fn fetch_list(&self, spec: &RequestSpec) -> BingaResult<Vec<Order>> {
        let response = self.transport.execute(spec).await?;
        let payload = decode(&response, spec.accept)?;

        // An empty 2xx body on a listing means no orders, not a failure.
        if payload.is_no_content() && response.is_success() {
            return Ok(Vec::new());
        }

        let value = Self::check_result(payload, response.status)?;
        let orders = match value.pointer("/orders/order") {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|item| item.is_object())
                .map(Order::from_payload)
                .collect(),
            Some(record @ Value::Object(_)) => vec![Order::from_payload(record)],
            _ => Vec::new(),
        };

        Ok(orders)
    }

    /// Classify a decoded payload: a `result` of `success` passes the
    /// mapping through, anything else becomes a `Gateway` error — the
    /// decoded error object when the body carries one, the HTTP status
    /// and its reason phrase otherwise.
    fn check_result(payload: Payload, status: u16) -> BingaResult<Value> {
        let value = match payload {
            Payload::NoContent => return Err(BingaError::gateway_from_status(status)),
            Payload::Value(value) => value,
        };

        if value.get("result").and_then(Value::as_str) == Some("success") {
            return Ok(value);
        }

        Err(Self::gateway_error(&value, status))
    }

    fn gateway_error(value: &Value, status: u16) -> BingaError {
        let error = value.get("error");
        let code = error.and_then(|e| e.get("code")).and_then(|code| match code {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);

        BingaError::Gateway {
            code: code.unwrap_or(i64::from(status)),
            message: message
                .unwrap_or_else(|| binga_core::reason_phrase(status).to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> BingaClient {
        BingaClient::new(BingaConfig::dev_sandbox()).unwrap()
    }

    fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_charge_form_injects_defaults() {
        let request = ChargeRequest::new("ORD-1001", 199.99, "client@example.com");
        let form = client()
            .build_charge_form(&request, ChargeType::Pay, 7)
            .unwrap();

        assert_eq!(form_value(&form, "storeId"), Some("4010"));
        assert_eq!(form_value(&form, "apiVersion"), Some("1.1"));
        assert_eq!(form_value(&form, "amount"), Some("199.99"));
        assert_eq!(form_value(&form, "externalId"), Some("ORD-1001"));
        // md5("PAY199.994010ORD-1001client@example.com<sandbox key>")
        assert_eq!(
            form_value(&form, "orderCheckSum"),
            Some("691e97366414d31a51e83c87b40dd445")
        );
        assert!(form_value(&form, "expirationDate")
            .is_some_and(|value| value.ends_with("GMT")));
    }

    #[test]
    fn test_charge_form_formats_amount() {
        let request = ChargeRequest::new("ORD-2002", 49.5, "buyer@example.com");
        let form = client()
            .build_charge_form(&request, ChargeType::Prepay, 7)
            .unwrap();

        assert_eq!(form_value(&form, "amount"), Some("49.50"));
        // md5("PRE-PAY49.504010ORD-2002buyer@example.com<sandbox key>")
        assert_eq!(
            form_value(&form, "orderCheckSum"),
            Some("cb699fb62c5fce814d517eb4b4869d3a")
        );
    }

    #[test]
    fn test_charge_form_caller_fields_win() {
        let request = ChargeRequest::new("ORD-1001", 10.0, "client@example.com")
            .with_field("apiVersion", "1.0");
        let form = client()
            .build_charge_form(&request, ChargeType::Pay, 7)
            .unwrap();

        assert_eq!(form_value(&form, "apiVersion"), Some("1.0"));
    }

    #[test]
    fn test_check_result_error_body_wins_over_status() {
        let payload = Payload::Value(json!({
            "result": "error",
            "error": {"code": 404, "message": "Not Found"}
        }));
        // HTTP said 200, the gateway's own discriminator decides
        let err = BingaClient::check_result(payload, 200).unwrap_err();
        match err {
            BingaError::Gateway { code, message } => {
                assert_eq!(code, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected Gateway error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_result_string_code() {
        let payload = Payload::Value(json!({
            "result": "error",
            "error": {"code": "412", "message": "Precondition Failed"}
        }));
        let err = BingaClient::check_result(payload, 200).unwrap_err();
        assert_eq!(err.gateway_code(), Some(412));
    }

    #[test]
    fn test_check_result_empty_body_uses_reason_phrase() {
        let err = BingaClient::check_result(Payload::NoContent, 502).unwrap_err();
        match err {
            BingaError::Gateway { code, message } => {
                assert_eq!(code, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected Gateway error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_result_missing_discriminator_falls_back_to_status() {
        let payload = Payload::Value(json!({"unexpected": true}));
        let err = BingaClient::check_result(payload, 500).unwrap_err();
        match err {
            BingaError::Gateway { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Gateway error, got {other:?}"),
        }
    }

    #[test]
    fn test_list_params_defaults() {
        let params = ListParams::default();
        assert_eq!((params.page, params.limit, params.offset), (1, 20, 0));

        let params = ListParams::default().with_page(3).with_limit(50);
        assert_eq!((params.page, params.limit, params.offset), (3, 50, 0));
    }

    #[test]
    fn test_list_spec_sends_long_and_short_names() {
        let spec = BingaClient::list_spec(
            config::ORDERS_PATH.to_string(),
            ListParams::default(),
            Format::Json,
        );
        let keys: Vec<&str> = spec.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["page", "limit", "l", "offset", "o"]);
    }
}
