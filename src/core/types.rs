use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::EdiStatus;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Host identifier of an invoice, credit note, or vendor bill.
    MoveId
);
record_id!(
    /// Host identifier of a customer or vendor.
    PartnerId
);
record_id!(
    /// Host identifier of a product.
    ProductId
);
record_id!(
    /// Host identifier of a country.
    CountryId
);
record_id!(
    /// Host identifier of a country subdivision.
    StateId
);

/// Middleware environment the company is registered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Sandbox middleware.
    Test,
    /// Live middleware.
    Prod,
}

impl Mode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Prod => "prod",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "test" => Some(Self::Test),
            "prod" => Some(Self::Prod),
            _ => None,
        }
    }
}

/// Whether the company's API key has been accepted by the middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    NotVerified,
    Verified,
}

/// The company that owns the middleware credentials.
///
/// `edi_url`, `access_token` and `refresh_token` are only meaningful once
/// `verification_status` is [`VerificationStatus::Verified`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub email: Option<String>,
    /// Legal entity identifier cross-checked during verification.
    pub unique_entity_number: Option<String>,
    /// Company-level switch for PEPPOL e-invoicing.
    pub peppol_enabled: bool,
    pub client_id: Option<String>,
    pub client_number: Option<String>,
    /// The company's own PEPPOL participant id.
    pub peppol_endpoint: Option<String>,
    pub api_key: Option<String>,
    pub mode: Option<Mode>,
    pub edi_url: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub verification_status: VerificationStatus,
}

impl Company {
    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }

    /// PEPPOL actions are available only when enabled and verified.
    pub fn is_peppol_enabled(&self) -> bool {
        self.peppol_enabled && self.is_verified()
    }
}

/// Kind of accounting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    /// Customer invoice.
    #[default]
    OutInvoice,
    /// Customer credit note.
    OutRefund,
    /// Vendor bill.
    InInvoice,
    /// Vendor credit note.
    InRefund,
}

impl MoveType {
    pub fn is_outbound(&self) -> bool {
        matches!(self, Self::OutInvoice | Self::OutRefund)
    }
}

/// Which middleware creation endpoint a document goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Invoice,
    CreditNote,
}

impl DocumentKind {
    /// Path of the creation endpoint, relative to the middleware URL.
    pub fn create_path(&self) -> &'static str {
        match self {
            Self::Invoice => "/api/v1/invoice/create",
            Self::CreditNote => "/api/v1/creditnote/create",
        }
    }

    pub fn for_move_type(move_type: MoveType) -> Self {
        match move_type {
            MoveType::OutRefund | MoveType::InRefund => Self::CreditNote,
            MoveType::OutInvoice | MoveType::InInvoice => Self::Invoice,
        }
    }
}

/// An invoice, credit note, or vendor bill as held by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Move {
    pub id: MoveId,
    /// Document number (e.g. "INV/2024/0001").
    pub name: String,
    pub move_type: MoveType,
    pub partner_id: Option<PartnerId>,
    /// ISO 4217 currency code.
    pub currency_code: String,
    pub invoice_date: Option<NaiveDate>,
    pub invoice_date_due: Option<NaiveDate>,
    /// Total including tax.
    pub amount_total: Decimal,
    /// Amount still to be paid.
    pub amount_residual: Decimal,
    pub lines: Vec<MoveLine>,
    /// Status as last reported by the middleware.
    pub edi_status: Option<EdiStatus>,
    pub external_invoice_id: Option<String>,
    pub external_invoice_uuid: Option<String>,
    /// Set once the middleware accepted a SEND request.
    pub sent_via_peppol: bool,
    /// Chatter messages logged against the record.
    pub messages: Vec<String>,
}

impl Move {
    /// Amount already paid (total minus residual).
    pub fn amount_paid(&self) -> Decimal {
        self.amount_total - self.amount_residual
    }

    pub fn log_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}

/// A single invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveLine {
    pub id: u64,
    pub product_id: Option<ProductId>,
    /// Line label.
    pub description: String,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    /// Line amount excluding tax.
    pub price_subtotal: Decimal,
    /// Line amount including tax.
    pub price_total: Decimal,
}

impl MoveLine {
    /// Tax amount carried by the line.
    pub fn tax_amount(&self) -> Decimal {
        self.price_total - self.price_subtotal
    }
}

/// A customer (debtor) or vendor (creditor).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    /// Archived partners keep participating in UEN uniqueness checks.
    pub active: bool,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub country_id: Option<CountryId>,
    pub state_id: Option<StateId>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Locale such as "en_US".
    pub lang: Option<String>,
    pub unique_entity_number: Option<String>,
    pub supplier_rank: u32,
    pub debtor_id: Option<i64>,
    pub debtor_number: Option<String>,
    pub creditor_id: Option<i64>,
    pub creditor_number: Option<String>,
    pub client_id: Option<i64>,
    pub peppol_endpoint: Option<String>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryState {
    pub id: StateId,
    pub country_id: CountryId,
    pub code: String,
    pub name: String,
}
