//! Middleware-reported document status.
//!
//! The middleware owns the document lifecycle. Locally the status is only
//! ever overwritten with whatever the middleware last reported, so there is
//! no transition table here, only a whitelist of the states the middleware
//! is known to emit.

use serde::{Deserialize, Serialize};

use super::error::PeppolError;

/// Document status as reported by the middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdiStatus {
    /// The sales invoice is being processed.
    Uploaded,
    /// Not yet sent to the customer; the invoice can still be updated.
    Unconfirmed,
    /// Nothing paid yet.
    Unpaid,
    /// Part of the amount is paid.
    PartiallyPaid,
    /// Fully paid.
    Paid,
    /// Archived (deleted) manually on the middleware UI.
    DirectlyArchived,
    /// Marked as "will not be paid" on the middleware UI.
    WillNotBePaid,
    /// Delivered to the print partner, waiting to be printed.
    PrintAndPostReady,
    /// In the process of being delivered.
    DeliveryPending,
    /// Currently being sent to the customer.
    DeliveryRequested,
    /// A delivery attempt failed.
    DeliveryFailed,
    /// The uploaded invoice failed initial validation.
    ValidationFailed,
    /// Being archived.
    Archiving,
    /// Received via the archive connector but not archived yet.
    ToBeArchived,
    /// Waiting for approval.
    Incoming,
    /// Deleted.
    RecycleBin,
}

impl EdiStatus {
    /// Every status, in middleware documentation order.
    pub const ALL: [EdiStatus; 16] = [
        Self::Uploaded,
        Self::Unconfirmed,
        Self::Unpaid,
        Self::PartiallyPaid,
        Self::Paid,
        Self::DirectlyArchived,
        Self::WillNotBePaid,
        Self::PrintAndPostReady,
        Self::DeliveryPending,
        Self::DeliveryRequested,
        Self::DeliveryFailed,
        Self::ValidationFailed,
        Self::Archiving,
        Self::ToBeArchived,
        Self::Incoming,
        Self::RecycleBin,
    ];

    /// Wire code used by the middleware.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Unconfirmed => "unconfirmed",
            Self::Unpaid => "unpaid",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::DirectlyArchived => "directly_archived",
            Self::WillNotBePaid => "will_not_be_paid",
            Self::PrintAndPostReady => "print_and_post_ready",
            Self::DeliveryPending => "delivery_pending",
            Self::DeliveryRequested => "delivery_requested",
            Self::DeliveryFailed => "delivery_failed",
            Self::ValidationFailed => "validation_failed",
            Self::Archiving => "archiving",
            Self::ToBeArchived => "to_be_archived",
            Self::Incoming => "incoming",
            Self::RecycleBin => "recycle_bin",
        }
    }

    /// Parse from the middleware wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Uploaded => "Uploaded",
            Self::Unconfirmed => "Unconfirmed",
            Self::Unpaid => "Unpaid",
            Self::PartiallyPaid => "Partially Paid",
            Self::Paid => "Paid",
            Self::DirectlyArchived => "Directly Archived",
            Self::WillNotBePaid => "Will Not Be Paid",
            Self::PrintAndPostReady => "Print and Post Ready",
            Self::DeliveryPending => "Delivery Pending",
            Self::DeliveryRequested => "Delivery Requested",
            Self::DeliveryFailed => "Delivery Failed",
            Self::ValidationFailed => "Validation Failed",
            Self::Archiving => "Archiving",
            Self::ToBeArchived => "Archived",
            Self::Incoming => "Incoming",
            Self::RecycleBin => "Recycle Bin",
        }
    }

    /// Accept a status reported by the middleware.
    ///
    /// Only the whitelisted codes are accepted; anything else is treated
    /// as a malformed middleware response.
    pub fn from_remote(code: &str) -> Result<Self, PeppolError> {
        Self::from_code(code.trim()).ok_or_else(|| {
            PeppolError::Access(format!("middleware reported unknown status '{code}'"))
        })
    }

    /// Whether a payment can be registered against a document in this status.
    pub fn accepts_payment(&self) -> bool {
        matches!(self, Self::Unpaid | Self::PartiallyPaid)
    }
}

impl std::fmt::Display for EdiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
