//! # Order Types
//!
//! The `Order` entity hydrated from gateway responses, and the
//! `ChargeRequest` payload submitted when billing a customer.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

/// One payment order resource on the gateway.
///
/// Hydrated field-by-field from a decoded response record; any key absent
/// from the source mapping stays `None`, so callers must treat every field
/// as optional. Constructed once, never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Order {
    /// Gateway order code (primary lookup key)
    pub code: Option<String>,

    /// Merchant-side order identifier
    pub external_id: Option<String>,

    /// Gateway internal id
    pub id: Option<String>,

    /// Order status as reported by the gateway
    pub status: Option<String>,

    /// API version the order was created with
    pub api_version: Option<String>,

    /// Order amount
    pub amount: Option<f64>,

    /// Total amount including charges
    pub total_amount: Option<f64>,

    /// Stamp duty charged to the merchant
    pub stamp_duty: Option<f64>,

    /// Stamp duty charged to the client
    pub client_stamp_duty: Option<f64>,

    /// Service charge billed to the merchant
    pub service_charge: Option<f64>,

    /// Service charge billed to the client
    pub client_service_charge: Option<f64>,

    /// URL for booking (prepay) the order
    pub book_url: Option<String>,

    /// URL for paying the order
    pub pay_url: Option<String>,

    /// Redirect after a successful payment
    pub success_url: Option<String>,

    /// Redirect after a failed payment
    pub failure_url: Option<String>,

    /// Buyer postal address
    pub buyer_address: Option<String>,

    /// Buyer email
    pub buyer_email: Option<String>,

    /// Buyer first name
    pub buyer_first_name: Option<String>,

    /// Buyer last name
    pub buyer_last_name: Option<String>,

    /// Buyer phone number
    pub buyer_phone: Option<String>,

    /// Whether the order is archived
    pub archived: Option<bool>,

    /// Whether the order was taken offline
    pub offline: Option<bool>,

    /// When the order was created (GMT)
    pub creation_date: Option<DateTime<Utc>>,

    /// When the order expires (GMT)
    pub expiration_date: Option<DateTime<Utc>>,

    /// When the order was last modified (GMT)
    pub modification_date: Option<DateTime<Utc>>,
}

impl Order {
    /// Hydrate an order from one decoded `orders.order` record.
    ///
    /// Only known fields are mapped; unknown keys are a no-op. Monetary
    /// fields accept decimal strings or JSON numbers, booleans are true
    /// only for the literal `"true"` (or a JSON `true`), and timestamps
    /// are interpreted in GMT.
    pub fn from_payload(record: &Value) -> Self {
        Self {
            code: string_field(record, "code"),
            external_id: string_field(record, "externalId"),
            id: string_field(record, "id"),
            status: string_field(record, "status"),
            api_version: string_field(record, "apiVersion"),
            amount: float_field(record, "amount"),
            total_amount: float_field(record, "totalAmount"),
            stamp_duty: float_field(record, "stampDuty"),
            client_stamp_duty: float_field(record, "clientStampDuty"),
            service_charge: float_field(record, "serviceCharge"),
            client_service_charge: float_field(record, "clientServiceCharge"),
            book_url: string_field(record, "bookUrl"),
            pay_url: string_field(record, "payUrl"),
            success_url: string_field(record, "successUrl"),
            failure_url: string_field(record, "failureUrl"),
            buyer_address: string_field(record, "buyerAddress"),
            buyer_email: string_field(record, "buyerEmail"),
            buyer_first_name: string_field(record, "buyerFirstName"),
            buyer_last_name: string_field(record, "buyerLastName"),
            buyer_phone: string_field(record, "buyerPhone"),
            archived: bool_field(record, "archived"),
            offline: bool_field(record, "offline"),
            creation_date: date_field(record, "creationDate"),
            expiration_date: date_field(record, "expirationDate"),
            modification_date: date_field(record, "modificationDate"),
        }
    }
}

fn string_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn float_field(record: &Value, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn bool_field(record: &Value, key: &str) -> Option<bool> {
    match record.get(key)? {
        Value::String(s) => Some(s == "true"),
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

fn date_field(record: &Value, key: &str) -> Option<DateTime<Utc>> {
    match record.get(key)? {
        Value::String(s) => parse_gateway_datetime(s),
        _ => None,
    }
}

/// Parse a timestamp as transmitted by the gateway.
///
/// The gateway emits `2019-02-26T09:42:11GMT` (its expiration shape) as
/// well as RFC 3339 variants; all are interpreted in the fixed GMT zone.
pub fn parse_gateway_datetime(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }

    let bare = s
        .trim_end_matches("GMT")
        .trim_end_matches("UTC")
        .trim_end();
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(bare, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    None
}

/// An order submitted for billing (`pay` or `book`).
///
/// The three identity fields (`external_id`, `amount`, `buyer_email`) feed
/// the payload checksum; everything else rides along in the form body.
/// Fields set here win over the client's injected defaults on key
/// collision.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    /// Merchant-side order identifier
    pub external_id: String,

    /// Amount to bill, in the store currency
    pub amount: f64,

    /// Buyer email
    pub buyer_email: String,

    /// Buyer first name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_first_name: Option<String>,

    /// Buyer last name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_last_name: Option<String>,

    /// Buyer phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_phone: Option<String>,

    /// Buyer postal address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_address: Option<String>,

    /// Redirect after a successful payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,

    /// Redirect after a failed payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_url: Option<String>,

    /// Extra form fields passed through verbatim
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, String)>,
}

impl ChargeRequest {
    /// Create a charge request with the required identity fields
    pub fn new(
        external_id: impl Into<String>,
        amount: f64,
        buyer_email: impl Into<String>,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            amount,
            buyer_email: buyer_email.into(),
            buyer_first_name: None,
            buyer_last_name: None,
            buyer_phone: None,
            buyer_address: None,
            success_url: None,
            failure_url: None,
            extra: Vec::new(),
        }
    }

    /// Set the buyer's first and last name
    pub fn with_buyer_name(
        mut self,
        first: impl Into<String>,
        last: impl Into<String>,
    ) -> Self {
        self.buyer_first_name = Some(first.into());
        self.buyer_last_name = Some(last.into());
        self
    }

    /// Set the buyer's phone number
    pub fn with_buyer_phone(mut self, phone: impl Into<String>) -> Self {
        self.buyer_phone = Some(phone.into());
        self
    }

    /// Set the buyer's postal address
    pub fn with_buyer_address(mut self, address: impl Into<String>) -> Self {
        self.buyer_address = Some(address.into());
        self
    }

    /// Set the post-payment redirect URLs
    pub fn with_redirects(
        mut self,
        success_url: impl Into<String>,
        failure_url: impl Into<String>,
    ) -> Self {
        self.success_url = Some(success_url.into());
        self.failure_url = Some(failure_url.into());
        self
    }

    /// Add an extra form field, overriding any injected default of the
    /// same name
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hydration_round_trip() {
        let record = json!({
            "code": "CTN000000123",
            "externalId": "ORD-1001",
            "id": "123",
            "status": "payed",
            "apiVersion": "1.1",
            "amount": "199.99",
            "totalAmount": "205.49",
            "stampDuty": "0.25",
            "serviceCharge": "5.25",
            "payUrl": "https://api.binga.ma/pay/CTN000000123",
            "buyerEmail": "client@example.com",
            "buyerFirstName": "Amine",
            "archived": "false",
            "offline": "true",
            "creationDate": "2019-02-26T09:42:11GMT",
        });

        let order = Order::from_payload(&record);
        assert_eq!(order.code.as_deref(), Some("CTN000000123"));
        assert_eq!(order.external_id.as_deref(), Some("ORD-1001"));
        assert_eq!(order.amount, Some(199.99));
        assert_eq!(order.total_amount, Some(205.49));
        assert_eq!(order.stamp_duty, Some(0.25));
        assert_eq!(order.archived, Some(false));
        assert_eq!(order.offline, Some(true));
        assert_eq!(
            order.creation_date,
            Some(Utc.with_ymd_and_hms(2019, 2, 26, 9, 42, 11).unwrap())
        );
        // keys absent from the record stay unset
        assert_eq!(order.buyer_phone, None);
        assert_eq!(order.modification_date, None);
    }

    #[test]
    fn test_boolean_only_literal_true() {
        let record = json!({ "archived": "TRUE", "offline": "1" });
        let order = Order::from_payload(&record);
        assert_eq!(order.archived, Some(false));
        assert_eq!(order.offline, Some(false));
    }

    #[test]
    fn test_numeric_amounts_accepted() {
        let record = json!({ "amount": 42.5, "totalAmount": 43 });
        let order = Order::from_payload(&record);
        assert_eq!(order.amount, Some(42.5));
        assert_eq!(order.total_amount, Some(43.0));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let record = json!({ "code": "C1", "somethingNew": "x" });
        let order = Order::from_payload(&record);
        assert_eq!(order.code.as_deref(), Some("C1"));
    }

    #[test]
    fn test_parse_gateway_datetime_variants() {
        let expected = Utc.with_ymd_and_hms(2019, 2, 26, 9, 42, 11).unwrap();
        assert_eq!(
            parse_gateway_datetime("2019-02-26T09:42:11GMT"),
            Some(expected)
        );
        assert_eq!(
            parse_gateway_datetime("2019-02-26T09:42:11+00:00"),
            Some(expected)
        );
        assert_eq!(
            parse_gateway_datetime("2019-02-26 09:42:11"),
            Some(expected)
        );
        assert_eq!(parse_gateway_datetime("not a date"), None);
    }

    #[test]
    fn test_charge_request_builder() {
        let req = ChargeRequest::new("ORD-1001", 199.99, "client@example.com")
            .with_buyer_name("Amine", "Idrissi")
            .with_buyer_phone("0600000000")
            .with_field("apiVersion", "1.0");

        assert_eq!(req.external_id, "ORD-1001");
        assert_eq!(req.buyer_first_name.as_deref(), Some("Amine"));
        assert_eq!(req.extra, vec![("apiVersion".into(), "1.0".into())]);
    }
}
