//! Request bodies built from host records.
//!
//! Amounts go over the wire as JSON numbers, dates as midnight UTC
//! timestamps (`2024-06-01T00:00:00Z`).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::client::EdiConfig;
use crate::core::{Move, Partner, PeppolError, RecordStore};

const DELIVERY_CHANNEL: &str = "openpeppol";
const SERVICE_UNIT: &str = "Unit";
const DEBTOR_TYPE: &str = "residential";
const DEFAULT_LANGUAGE: &str = "EN";

/// Format a date the way the middleware expects it.
pub fn wire_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%dT00:00:00Z").to_string()
}

/// Parse the numeric client number the payloads carry.
pub fn numeric_client_number(client_number: &str) -> Result<i64, PeppolError> {
    client_number.trim().parse().map_err(|_| {
        PeppolError::validation(format!(
            "client number '{client_number}' is not numeric"
        ))
    })
}

/// Parse a stored middleware invoice id.
pub fn numeric_invoice_id(mv: &Move) -> Result<i64, PeppolError> {
    let raw = mv
        .external_invoice_id
        .as_deref()
        .ok_or_else(|| PeppolError::validation("No PEPPOL Invoice ID Found!"))?;
    raw.trim().parse().map_err(|_| {
        PeppolError::Access(format!("PEPPOL invoice id '{raw}' is not numeric"))
    })
}

/// Body of the invoice and credit note creation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoicePayload {
    pub sales_invoice_number: String,
    pub client_number: i64,
    pub platform_id: i64,
    pub currency_code: String,
    pub sales_invoice_date: String,
    pub sales_invoice_due_date: String,
    pub delivery_channel: &'static str,
    pub debtor_id: Option<i64>,
    pub client_id: Option<i64>,
    pub invoice_lines: Vec<InvoiceLinePayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLinePayload {
    pub id: u64,
    pub service_name: Option<String>,
    pub service_description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_vat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_subtotal: Decimal,
    pub service_discount_perc: u32,
    pub service_discount: u32,
    pub service_unit: &'static str,
}

/// Build the creation payload for `mv`.
///
/// The debtor and client ids come from the invoiced partner, the service
/// name of each line from its product.
pub fn invoice_payload<S: RecordStore + ?Sized>(
    store: &S,
    mv: &Move,
    platform_id: i64,
) -> Result<InvoicePayload, PeppolError> {
    let company = store.company();
    let client_number = company.client_number.as_deref().ok_or_else(|| {
        PeppolError::validation(format!(
            "Warning! Your company \"{}\" does not have Client Number.",
            company.name
        ))
    })?;
    let invoice_date = mv.invoice_date.ok_or_else(|| {
        PeppolError::validation(
            "Warning! You must enter the \"Invoice Date\" before sending via peppol.",
        )
    })?;
    let due_date = mv.invoice_date_due.ok_or_else(|| {
        PeppolError::validation("Warning! You must enter the \"Due Date\" before sending via peppol.")
    })?;
    let partner = mv.partner_id.and_then(|id| store.get_partner(id));

    let invoice_lines = mv
        .lines
        .iter()
        .map(|line| InvoiceLinePayload {
            id: line.id,
            service_name: line
                .product_id
                .and_then(|id| store.product_name(id))
                .map(str::to_string),
            service_description: line.description.clone(),
            service_quantity: line.quantity,
            service_price: line.price_unit,
            service_vat: line.tax_amount(),
            service_subtotal: line.price_subtotal,
            service_discount_perc: 0,
            service_discount: 0,
            service_unit: SERVICE_UNIT,
        })
        .collect();

    Ok(InvoicePayload {
        sales_invoice_number: mv.name.clone(),
        client_number: numeric_client_number(client_number)?,
        platform_id,
        currency_code: mv.currency_code.clone(),
        sales_invoice_date: wire_date(invoice_date),
        sales_invoice_due_date: wire_date(due_date),
        delivery_channel: DELIVERY_CHANNEL,
        debtor_id: partner.and_then(|p| p.debtor_id),
        client_id: partner.and_then(|p| p.client_id),
        invoice_lines,
    })
}

/// Status change requested through `POST /api/v1/invoice/update/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateType {
    Send,
    MarkAsPaid,
    MarkAsPartiallyPaid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    #[serde(rename = "type")]
    pub kind: UpdateType,
    #[serde(rename = "invoiceId")]
    pub invoice_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<PaymentDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentDetails {
    #[serde(with = "rust_decimal::serde::float")]
    pub payment_amount_paid: Decimal,
    pub payment_date: String,
}

/// Decide how a payment is reported.
///
/// Fully settled documents are marked paid, anything with a residual left
/// is partially paid. A document with nothing paid has no payment to report.
pub fn payment_type(total: Decimal, residual: Decimal) -> Result<UpdateType, PeppolError> {
    if total - residual <= Decimal::ZERO {
        return Err(PeppolError::validation(
            "Sorry, there is no paid amount to register on PEPPOL.",
        ));
    }
    if residual > Decimal::ZERO {
        Ok(UpdateType::MarkAsPartiallyPaid)
    } else {
        Ok(UpdateType::MarkAsPaid)
    }
}

/// Build the payment status update for `mv`.
pub fn payment_update(mv: &Move, payment_date: NaiveDate) -> Result<StatusUpdate, PeppolError> {
    let kind = payment_type(mv.amount_total, mv.amount_residual)?;
    Ok(StatusUpdate {
        kind,
        invoice_id: numeric_invoice_id(mv)?,
        payload: Some(PaymentDetails {
            payment_amount_paid: mv.amount_paid(),
            payment_date: wire_date(payment_date),
        }),
    })
}

/// Body of `POST /api/v1/debtors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebtorPayload {
    pub platform_id: i64,
    pub client_number: i64,
    pub name: String,
    pub country_code: String,
    pub language_code: String,
    pub debtor_type: &'static str,
    pub preferred_channel: &'static str,
    pub address: String,
    pub zip_code: String,
    pub city: String,
    pub email: String,
    pub phone_number: String,
    pub debtor_reference: String,
    pub legal_entity_trn: String,
}

/// Build the debtor registration payload for `partner`.
pub fn debtor_payload(
    partner: &Partner,
    country_code: &str,
    client_number: &str,
    config: &EdiConfig,
) -> Result<DebtorPayload, PeppolError> {
    let language_code = partner
        .lang
        .as_deref()
        .and_then(|lang| lang.split('_').next())
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string();
    let address = partner
        .street
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(partner.street2.as_deref())
        .unwrap_or_default()
        .to_string();

    Ok(DebtorPayload {
        platform_id: config.platform_id,
        client_number: numeric_client_number(client_number)?,
        name: partner.name.clone(),
        country_code: country_code.to_string(),
        language_code,
        debtor_type: DEBTOR_TYPE,
        preferred_channel: DELIVERY_CHANNEL,
        address,
        zip_code: partner.zip.clone().unwrap_or_default(),
        city: partner.city.clone().unwrap_or_default(),
        email: partner.email.clone().unwrap_or_default(),
        phone_number: partner.phone.clone().unwrap_or_default(),
        debtor_reference: config.debtor_reference.clone(),
        legal_entity_trn: partner.unique_entity_number.clone().unwrap_or_default(),
    })
}
