//! Payment registration.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::payload::payment_update;
use super::service::EdiService;
use crate::client::Transport;
use crate::core::{MoveId, PeppolError, RecordStore};

impl<T: Transport, S: RecordStore> EdiService<T, S> {
    /// Report the payment state of a document to the middleware.
    ///
    /// Only documents the middleware last reported as unpaid or partially
    /// paid accept a payment; anything else means the local status is stale.
    pub async fn record_payment(
        &mut self,
        id: MoveId,
        payment_date: NaiveDate,
    ) -> Result<(), PeppolError> {
        let mv = self.find_move(id)?;
        if !mv.edi_status.is_some_and(|s| s.accepts_payment()) {
            return Err(PeppolError::validation(format!(
                "Sorry, you can not make the payment for \"{}\" as PEPPOL status is not up to \
                 date. Please update the PEPPOL status.",
                mv.name
            )));
        }
        let update = payment_update(mv, payment_date)?;

        self.update_status(id, &update).await?;
        info!(
            move_id = %id,
            kind = ?update.kind,
            date = %payment_date,
            "payment registered on PEPPOL middleware"
        );
        Ok(())
    }

    /// Register payments for a batch of documents.
    ///
    /// Documents that were never pushed to the middleware are skipped. The
    /// first failure aborts the batch; earlier documents stay registered.
    pub async fn register_payments(
        &mut self,
        ids: &[MoveId],
        payment_date: NaiveDate,
    ) -> Result<usize, PeppolError> {
        let mut registered = 0;
        for &id in ids {
            if self.find_move(id)?.external_invoice_id.is_none() {
                debug!(move_id = %id, "no PEPPOL invoice id, skipping payment");
                continue;
            }
            self.record_payment(id, payment_date).await?;
            registered += 1;
        }
        Ok(registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedTransport;
    use crate::client::{ApiClient, EdiConfig};
    use crate::core::*;
    use rust_decimal_macros::dec;

    fn service(transport: ScriptedTransport) -> EdiService<ScriptedTransport, MemoryStore> {
        let company = CompanyBuilder::new("ACME")
            .edi_url("https://mw.test")
            .verified("1001", "access", "refresh")
            .build();
        EdiService::new(
            ApiClient::new(transport, EdiConfig::default()),
            MemoryStore::new(company),
        )
    }

    fn invoice(status: EdiStatus, residual: rust_decimal::Decimal) -> Move {
        MoveBuilder::new("INV/7")
            .add_line(MoveLineBuilder::new(1, "x", dec!(1), dec!(100)).build())
            .residual(residual)
            .status(status)
            .external_id("77")
            .build()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    #[tokio::test]
    async fn stale_status_blocks_payment() {
        let mut svc = service(ScriptedTransport::new());
        let id = svc.store_mut().insert_move(invoice(EdiStatus::Uploaded, dec!(0)));

        let err = svc.record_payment(id, date()).await.unwrap_err();

        assert!(err.is_validation());
        assert!(err.message().contains("\"INV/7\""));
        assert!(svc.client().transport().requests().is_empty());
    }

    #[tokio::test]
    async fn full_payment_is_marked_paid() {
        let mut svc = service(ScriptedTransport::new().respond(200, "{}"));
        let id = svc.store_mut().insert_move(invoice(EdiStatus::Unpaid, dec!(0)));

        svc.record_payment(id, date()).await.unwrap();

        let body = svc.client().transport().requests()[0].body.clone().unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["type"], "MARK_AS_PAID");
        assert_eq!(value["payload"]["payment_amount_paid"], 100.0);
    }

    #[tokio::test]
    async fn batch_skips_documents_without_external_id() {
        let mut svc = service(ScriptedTransport::new().respond(200, "{}"));
        let pushed = svc
            .store_mut()
            .insert_move(invoice(EdiStatus::PartiallyPaid, dec!(30)));
        let local = svc
            .store_mut()
            .insert_move(MoveBuilder::new("INV/8").status(EdiStatus::Paid).build());

        let registered = svc.register_payments(&[local, pushed], date()).await.unwrap();

        assert_eq!(registered, 1);
        assert_eq!(svc.client().transport().requests().len(), 1);
    }
}
