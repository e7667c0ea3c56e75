//! JSON shapes exchanged with the middleware.
//!
//! The middleware is loose about identifier types: the same field arrives
//! as a number from one endpoint and as a string from another. Identifiers
//! are therefore decoded with [`string_or_number`] and kept as strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Decode a JSON string or number into a `String`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Optional variant of [`string_or_number`]; `null` and absent map to `None`.
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Decode an integer that may arrive as a JSON number or a numeric string.
pub fn opt_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match opt_string_or_number(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected integer, got '{s}'"))),
    }
}

/// Body of `POST /api/v1/auth/verify-api-key`.
#[derive(Debug, Serialize)]
pub struct VerifyKeyRequest<'a> {
    pub api_key: &'a str,
}

/// Response of `POST /api/v1/auth/verify-api-key`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyKeyResponse {
    #[serde(default)]
    pub uen_no: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub client_number: Option<String>,
    #[serde(default)]
    pub peppol_id: Option<String>,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Response of `POST /api/v1/auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Response of the invoice / credit note creation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedInvoice {
    pub status: String,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub sales_invoice_uuid: String,
}

/// Response of `GET /api/v1/invoice/detail`.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceDetail {
    pub status: String,
}

/// Response of `POST /api/v1/invoice/update/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdateAck {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub sales_invoice_uuid: Option<String>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// A purchase invoice received through the network.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseInvoice {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_integer")]
    pub creditor_id: Option<i64>,
    #[serde(default)]
    pub purchase_invoice_number: Option<String>,
    #[serde(default)]
    pub purchase_invoice_date: Option<String>,
    #[serde(default)]
    pub purchase_invoice_due_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub purchase_invoice_uuid: Option<String>,
    pub status: String,
    #[serde(default)]
    pub invoice_lines: Vec<PurchaseLine>,
}

/// A line of a received purchase invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseLine {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub service_description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub service_quantity: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub service_price: Option<Decimal>,
}

/// A creditor (vendor) as known to the middleware.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditorRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub creditor_number: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default, deserialize_with = "opt_integer")]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub legal_entity_trn: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response of `POST /api/v1/debtors`.
#[derive(Debug, Clone, Deserialize)]
pub struct DebtorCreated {
    #[serde(default, deserialize_with = "opt_integer")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub debtor_number: Option<String>,
    #[serde(default, deserialize_with = "opt_integer")]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub peppol_id: Option<String>,
    #[serde(default)]
    pub legal_entity_trn: Option<String>,
}
