//! # peppol-edi
//!
//! PEPPOL e-invoicing through a middleware access point: API key
//! verification, token lifecycle, invoice and credit note submission,
//! status and payment synchronization, and inbound purchase invoices.
//!
//! All monetary values use [`rust_decimal::Decimal`]. Amounts are only
//! converted to JSON numbers at the wire boundary.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use peppol_edi::core::*;
//! use rust_decimal_macros::dec;
//!
//! let company = CompanyBuilder::new("ACME Pte Ltd")
//!     .verified("1001", "access-token", "refresh-token")
//!     .build();
//! let invoice = MoveBuilder::new("INV/2024/0001")
//!     .invoice_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
//!     .due_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
//!     .add_line(MoveLineBuilder::new(1, "Consulting", dec!(10), dec!(150)).tax(dec!(135)).build())
//!     .build();
//!
//! assert!(check_invoice_fields(&invoice, &company).is_empty());
//! assert_eq!(invoice.amount_total, dec!(1635));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Host record types, middleware status, preconditions, record store |
//! | `client` | Middleware HTTP client, configuration, token lifecycle |
//! | `sync` (default) | Invoice, payment, creditor and debtor workflows |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "sync")]
pub mod sync;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
