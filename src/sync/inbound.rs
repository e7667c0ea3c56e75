//! Inbound records: purchase invoices and creditors pulled from the middleware.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::service::EdiService;
use crate::client::wire::{CreditorRecord, Page, PurchaseInvoice};
use crate::client::{ApiRequest, Transport};
use crate::core::{
    EdiStatus, MoveBuilder, MoveId, MoveLineBuilder, MoveType, PartnerBuilder, PartnerId,
    PeppolError, RecordStore,
};

pub const PURCHASE_INVOICES_PATH: &str = "/api/v1/invoice/purchase";
pub const CREDITORS_PATH: &str = "/api/v1/creditor";

/// Page size requested from listing endpoints.
pub const PAGE_SIZE: u32 = 49;

/// A page with fewer results than this ends the listing.
pub const LAST_PAGE_THRESHOLD: usize = 10;

impl<T: Transport, S: RecordStore> EdiService<T, S> {
    /// Pull received purchase invoices and turn them into vendor bills.
    pub async fn fetch_purchase_invoices(&mut self) -> Result<Vec<MoveId>, PeppolError> {
        let records: Vec<PurchaseInvoice> = self.fetch_pages(PURCHASE_INVOICES_PATH).await?;
        let mut bills = Vec::with_capacity(records.len());
        for record in &records {
            bills.push(self.create_vendor_bill(record).await?);
        }
        info!(received = records.len(), "purchase invoices synchronized");
        Ok(bills)
    }

    /// Pull the creditors known to the middleware into the partner records.
    pub async fn fetch_creditors(&mut self) -> Result<Vec<PartnerId>, PeppolError> {
        let records: Vec<CreditorRecord> = self.fetch_pages(CREDITORS_PATH).await?;
        let partners = records
            .iter()
            .map(|record| self.create_creditor(record))
            .collect::<Result<Vec<_>, _>>()?;
        info!(received = records.len(), "creditors synchronized");
        Ok(partners)
    }

    /// Collect every page of a listing endpoint.
    async fn fetch_pages<R: DeserializeOwned>(&mut self, path: &str) -> Result<Vec<R>, PeppolError> {
        let client_number = self.client_number()?;
        let mut all = Vec::new();
        let mut page = 0u32;
        loop {
            let request = ApiRequest::get(path)
                .query("client_number", &client_number)
                .query("page", page)
                .query("size", PAGE_SIZE);
            let resp = self.call(&request).await?;
            if resp.status != 200 {
                return Err(PeppolError::Access(format!("Error occurred: {}", resp.body)));
            }
            let batch: Page<R> = resp.json()?;
            let received = batch.results.len();
            all.extend(batch.results);
            debug!(path, page, received, "listing page fetched");

            if received < LAST_PAGE_THRESHOLD {
                break;
            }
            page += 1;
        }
        Ok(all)
    }

    /// Record a received purchase invoice as a vendor bill.
    ///
    /// A bill that already exists (same middleware id) only gets its status
    /// updated. Otherwise the creditor is resolved, fetching it from the
    /// middleware if needed, and a new bill is created.
    pub async fn create_vendor_bill(&mut self, data: &PurchaseInvoice) -> Result<MoveId, PeppolError> {
        let status = EdiStatus::from_remote(&data.status)?;

        if let Some(id) = self.store().move_by_external_id(&data.id) {
            let bill = self.find_move_mut(id)?;
            bill.edi_status = Some(status);
            debug!(bill = %bill.name, %status, "existing vendor bill status updated");
            return Ok(id);
        }

        let partner = match data.creditor_id {
            Some(creditor_id) => match self.store().partner_by_creditor_id(creditor_id) {
                Some(partner) => Some(partner),
                None => Some(self.resolve_creditor_details(creditor_id).await?),
            },
            None => None,
        };

        let mut builder = MoveBuilder::new(data.purchase_invoice_number.clone().unwrap_or_default())
            .move_type(MoveType::InInvoice)
            .status(status)
            .external_id(data.id.clone());
        if let Some(partner) = partner {
            builder = builder.partner(partner);
        }
        if let Some(date) = remote_date(data.purchase_invoice_date.as_deref())? {
            builder = builder.invoice_date(date);
        }
        if let Some(date) = remote_date(data.purchase_invoice_due_date.as_deref())? {
            builder = builder.due_date(date);
        }
        if let Some(uuid) = &data.purchase_invoice_uuid {
            builder = builder.external_uuid(uuid.clone());
        }
        for (index, line) in data.invoice_lines.iter().enumerate() {
            let mut line_builder = MoveLineBuilder::new(
                index as u64 + 1,
                line.service_description.clone().unwrap_or_default(),
                line.service_quantity.unwrap_or(Decimal::ZERO),
                line.service_price.unwrap_or(Decimal::ZERO),
            );
            if let Some(product) = line
                .service_name
                .as_deref()
                .and_then(|name| self.store().product_by_name(name))
            {
                line_builder = line_builder.product(product);
            }
            let built = line_builder.checked_build().ok_or_else(|| {
                PeppolError::Access(format!(
                    "purchase invoice {} line {} amount is out of range",
                    data.id,
                    index + 1
                ))
            })?;
            builder = builder.add_line(built);
        }
        let bill = builder.checked_build().ok_or_else(|| {
            PeppolError::Access(format!("purchase invoice {} total is out of range", data.id))
        })?;

        let id = self.store_mut().insert_move(bill);
        info!(move_id = %id, external_id = %data.id, "vendor bill created from PEPPOL");
        Ok(id)
    }

    /// Find the partner for a middleware creditor, creating it if needed.
    ///
    /// Partners are matched on UEN, archived ones included. Country and
    /// state are looked up best-effort and left empty when unknown.
    pub fn create_creditor(&mut self, data: &CreditorRecord) -> Result<PartnerId, PeppolError> {
        let uen = data.legal_entity_trn.as_deref().filter(|u| !u.is_empty());
        if let Some(existing) = uen.and_then(|u| self.store().partner_by_uen(u)) {
            return Ok(existing);
        }

        let creditor_id: i64 = data.id.trim().parse().map_err(|_| {
            PeppolError::Access(format!("creditor id '{}' is not numeric", data.id))
        })?;
        let store = self.store();
        let mut partner = PartnerBuilder::new(data.name.clone())
            .creditor_id(creditor_id)
            .build();
        partner.street = data.address.clone();
        partner.zip = data.zip_code.clone();
        partner.city = data.city.clone();
        partner.email = data.email.clone();
        partner.unique_entity_number = uen.map(str::to_string);
        partner.country_id = data
            .country_code
            .as_deref()
            .and_then(|code| store.country_by_code(code));
        partner.state_id = data.state.as_deref().and_then(|name| store.state_by_name(name));
        partner.creditor_number = data.creditor_number.clone();
        partner.client_id = data.client_id;
        partner.supplier_rank = 1;

        let id = self.store_mut().insert_partner(partner);
        info!(partner_id = %id, creditor_id, "creditor created from PEPPOL");
        Ok(id)
    }

    /// Fetch one creditor from the middleware and record it.
    pub async fn resolve_creditor_details(&mut self, creditor_id: i64) -> Result<PartnerId, PeppolError> {
        let request = ApiRequest::get(format!("/api/v1/creditors/{creditor_id}"));
        let record: CreditorRecord = self.call(&request).await?.error_for_status()?.json()?;
        self.create_creditor(&record)
    }
}

/// Parse the date part of a middleware timestamp (`2024-06-01T00:00:00Z`).
fn remote_date(raw: Option<&str>) -> Result<Option<NaiveDate>, PeppolError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| PeppolError::Access(format!("unexpected date '{raw}' from middleware")))
}
