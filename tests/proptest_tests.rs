//! Property-based tests for status handling, payments, and wire decoding.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "sync")]

use chrono::NaiveDate;
use peppol_edi::client::wire::{Page, PurchaseInvoice};
use peppol_edi::core::*;
use peppol_edi::sync::payload::{UpdateType, payment_type, wire_date};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Generate a positive amount (0.01 to 99999.99).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Generate a total and a residual strictly between zero and the total.
fn arb_partial() -> impl Strategy<Value = (Decimal, Decimal)> {
    (2u64..10_000_000u64).prop_flat_map(|total| {
        (1..total).prop_map(move |residual| {
            (Decimal::new(total as i64, 2), Decimal::new(residual as i64, 2))
        })
    })
}

fn arb_status() -> impl Strategy<Value = EdiStatus> {
    prop::sample::select(EdiStatus::ALL.to_vec())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

// ── Property Tests ──────────────────────────────────────────────────────────

proptest! {
    /// Settled documents are always reported as paid.
    #[test]
    fn settled_is_paid(total in arb_amount()) {
        prop_assert_eq!(payment_type(total, Decimal::ZERO), Ok(UpdateType::MarkAsPaid));
    }

    /// Any residual left means a partial payment.
    #[test]
    fn residual_is_partial((total, residual) in arb_partial()) {
        prop_assert_eq!(
            payment_type(total, residual),
            Ok(UpdateType::MarkAsPartiallyPaid)
        );
    }

    /// Nothing paid means nothing to report.
    #[test]
    fn untouched_is_rejected(total in arb_amount()) {
        prop_assert!(payment_type(total, total).unwrap_err().is_validation());
    }

    /// Status codes survive whitespace the middleware may add.
    #[test]
    fn remote_status_accepts_padding(status in arb_status(), pad in " {0,3}") {
        let raw = format!("{pad}{}{pad}", status.code());
        prop_assert_eq!(EdiStatus::from_remote(&raw), Ok(status));
    }

    /// Anything outside the whitelist is rejected as an access error.
    #[test]
    fn remote_status_rejects_unknown(raw in "[a-z_]{1,24}") {
        let known = EdiStatus::ALL.iter().any(|s| s.code() == raw);
        match EdiStatus::from_remote(&raw) {
            Ok(status) => prop_assert!(known && status.code() == raw),
            Err(err) => prop_assert!(!known && err.is_access()),
        }
    }

    /// Only unpaid and partially paid documents accept payments.
    #[test]
    fn payment_gate(status in arb_status()) {
        prop_assert_eq!(
            status.accepts_payment(),
            matches!(status, EdiStatus::Unpaid | EdiStatus::PartiallyPaid)
        );
    }

    /// Wire dates are midnight UTC timestamps of the same calendar day.
    #[test]
    fn wire_dates(date in arb_date()) {
        let wire = wire_date(date);
        prop_assert!(wire.ends_with("T00:00:00Z"));
        prop_assert_eq!(NaiveDate::parse_from_str(&wire[..10], "%Y-%m-%d").unwrap(), date);
    }

    /// Listing pages decode whatever their size.
    #[test]
    fn pages_decode(ids in prop::collection::vec(1u32..100_000, 0..60)) {
        let results: Vec<_> = ids
            .iter()
            .map(|id| serde_json::json!({"id": id, "status": "incoming"}))
            .collect();
        let body = serde_json::json!({ "results": results }).to_string();
        let page: Page<PurchaseInvoice> = serde_json::from_str(&body).unwrap();
        prop_assert_eq!(page.results.len(), ids.len());
        for (decoded, id) in page.results.iter().zip(&ids) {
            prop_assert_eq!(&decoded.id, &id.to_string());
        }
    }
}

// ── Edge Cases ──────────────────────────────────────────────────────────────

#[test]
fn overpaid_document_is_rejected() {
    let total = Decimal::new(100, 0);
    assert!(payment_type(total, Decimal::new(150, 0)).is_err());
}

#[test]
fn status_codes_are_unique() {
    let mut codes: Vec<_> = EdiStatus::ALL.iter().map(|s| s.code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), EdiStatus::ALL.len());
}
