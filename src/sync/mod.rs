//! Synchronization workflows between host records and the middleware.
//!
//! [`EdiService`] ties an [`ApiClient`](crate::client::ApiClient) to a
//! [`RecordStore`](crate::core::RecordStore). Workflows read the host
//! records they need, call the middleware, and write back only what the
//! middleware decided.
//!
//! | Direction | Operations |
//! |-----------|------------|
//! | Outbound | [`create_invoice`](EdiService::create_invoice), [`create_credit_note`](EdiService::create_credit_note), [`send_invoice`](EdiService::send_invoice) |
//! | Status | [`fetch_status`](EdiService::fetch_status), [`fetch_all_statuses`](EdiService::fetch_all_statuses) |
//! | Payments | [`record_payment`](EdiService::record_payment), [`register_payments`](EdiService::register_payments) |
//! | Inbound | [`fetch_purchase_invoices`](EdiService::fetch_purchase_invoices), [`fetch_creditors`](EdiService::fetch_creditors) |
//! | Partners | [`register_debtor`](EdiService::register_debtor), [`ensure_unique_uen`](EdiService::ensure_unique_uen) |

mod debtors;
mod inbound;
mod invoices;
pub mod payload;
mod payments;
mod service;

pub use debtors::DEBTORS_PATH;
pub use inbound::{CREDITORS_PATH, LAST_PAGE_THRESHOLD, PAGE_SIZE, PURCHASE_INVOICES_PATH};
pub use invoices::{DETAIL_PATH, UPDATE_STATUS_PATH};
pub use service::EdiService;
