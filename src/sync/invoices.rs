//! Outbound documents: creation, status refresh, and sending.

use tracing::{debug, info};

use super::payload::{StatusUpdate, UpdateType, invoice_payload, numeric_invoice_id};
use super::service::EdiService;
use crate::client::wire::{CreatedInvoice, InvoiceDetail, StatusUpdateAck};
use crate::client::{ApiRequest, ApiResponse, Transport};
use crate::core::{
    DocumentKind, EdiStatus, MoveId, PeppolError, RecordStore, check_invoice_fields,
    first_failure,
};

pub const DETAIL_PATH: &str = "/api/v1/invoice/detail";
pub const UPDATE_STATUS_PATH: &str = "/api/v1/invoice/update/status";

impl<T: Transport, S: RecordStore> EdiService<T, S> {
    /// Create the document on the middleware as an invoice.
    pub async fn create_invoice(&mut self, id: MoveId) -> Result<(), PeppolError> {
        self.create_document(id, DocumentKind::Invoice).await
    }

    /// Create the document on the middleware as a credit note.
    pub async fn create_credit_note(&mut self, id: MoveId) -> Result<(), PeppolError> {
        self.create_document(id, DocumentKind::CreditNote).await
    }

    /// Create the document against the endpoint matching its move type.
    pub async fn push_document(&mut self, id: MoveId) -> Result<(), PeppolError> {
        let kind = DocumentKind::for_move_type(self.find_move(id)?.move_type);
        self.create_document(id, kind).await
    }

    async fn create_document(&mut self, id: MoveId, kind: DocumentKind) -> Result<(), PeppolError> {
        let mv = self.find_move(id)?;
        first_failure(check_invoice_fields(mv, self.store().company()))?;
        let payload = invoice_payload(self.store(), mv, self.client().config().platform_id)?;
        let body = serde_json::to_value(&payload).map_err(|e| PeppolError::Access(e.to_string()))?;

        let request = ApiRequest::post(kind.create_path(), body).client_number(self.client_number()?);
        let created: CreatedInvoice = self.call(&request).await?.error_for_status()?.json()?;
        let status = EdiStatus::from_remote(&created.status)?;

        let mv = self.find_move_mut(id)?;
        mv.edi_status = Some(status);
        mv.external_invoice_id = Some(created.id);
        mv.external_invoice_uuid = Some(created.sales_invoice_uuid);
        mv.log_message("Invoice has been created on PEPPOL Access Point.");
        info!(
            document = %mv.name,
            kind = ?kind,
            external_id = mv.external_invoice_id.as_deref().unwrap_or_default(),
            %status,
            "document created on PEPPOL middleware"
        );
        Ok(())
    }

    /// Refresh the middleware status of one document.
    pub async fn fetch_status(&mut self, id: MoveId) -> Result<EdiStatus, PeppolError> {
        let external_id = self
            .find_move(id)?
            .external_invoice_id
            .clone()
            .ok_or_else(|| PeppolError::validation("No PEPPOL Invoice ID Found!"))?;

        let request = ApiRequest::get(DETAIL_PATH).query("invoiceId", &external_id);
        let detail: InvoiceDetail = self.call(&request).await?.error_for_status()?.json()?;
        let status = EdiStatus::from_remote(&detail.status)?;

        let mv = self.find_move_mut(id)?;
        mv.edi_status = Some(status);
        debug!(document = %mv.name, %external_id, %status, "PEPPOL status refreshed");
        Ok(status)
    }

    /// Refresh every document that has been pushed to the middleware.
    ///
    /// Documents are processed one after the other; the first failure
    /// aborts the run.
    pub async fn fetch_all_statuses(&mut self) -> Result<usize, PeppolError> {
        let ids = self.store().moves_with_external_id();
        for id in &ids {
            self.fetch_status(*id).await?;
        }
        info!(documents = ids.len(), "PEPPOL statuses refreshed");
        Ok(ids.len())
    }

    /// Ask the middleware to deliver the document.
    ///
    /// Returns whether the middleware accepted the send (HTTP 201); only
    /// then is the document flagged as sent.
    pub async fn send_invoice(&mut self, id: MoveId) -> Result<bool, PeppolError> {
        let update = StatusUpdate {
            kind: UpdateType::Send,
            invoice_id: numeric_invoice_id(self.find_move(id)?)?,
            payload: None,
        };
        let resp = self.update_status(id, &update).await?;
        if resp.status != 201 {
            debug!(move_id = %id, status = resp.status, "send not confirmed by middleware");
            return Ok(false);
        }

        let mv = self.find_move_mut(id)?;
        mv.sent_via_peppol = true;
        mv.log_message("Invoice has been sent to the PEPPOL Access Point for processing.");
        info!(document = %mv.name, "document sent via PEPPOL");
        Ok(true)
    }

    /// Post a status update and pick up a changed document uuid.
    pub(crate) async fn update_status(
        &mut self,
        id: MoveId,
        update: &StatusUpdate,
    ) -> Result<ApiResponse, PeppolError> {
        let body = serde_json::to_value(update).map_err(|e| PeppolError::Access(e.to_string()))?;
        let resp = self
            .call(&ApiRequest::post(UPDATE_STATUS_PATH, body))
            .await?
            .error_for_status()?;
        let ack: StatusUpdateAck = resp.json()?;

        if let Some(uuid) = ack.sales_invoice_uuid.filter(|u| !u.is_empty()) {
            let mv = self.find_move_mut(id)?;
            if mv.external_invoice_uuid.as_deref() != Some(uuid.as_str()) {
                debug!(document = %mv.name, %uuid, "PEPPOL uuid changed");
                mv.external_invoice_uuid = Some(uuid);
            }
        }
        Ok(resp)
    }
}
