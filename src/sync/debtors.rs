//! Customer registration and partner identity checks.

use tracing::info;

use super::payload::debtor_payload;
use super::service::EdiService;
use crate::client::wire::DebtorCreated;
use crate::client::{ApiRequest, Transport};
use crate::core::{
    PartnerId, PeppolError, RecordStore, check_debtor_fields, check_unique_uen, first_failure,
};

pub const DEBTORS_PATH: &str = "/api/v1/debtors";

/// Middleware messages that get a friendlier wording.
fn debtor_error(message: Option<String>, status: u16) -> PeppolError {
    match message.as_deref() {
        Some("Invalid legal_entity_trn") => {
            PeppolError::access("Sorry, you have entered an invalid UEN Number.")
        }
        Some("legal_entity_trn is duplicated") => PeppolError::access(
            "Sorry, you have entered an UEN Number that already exists in Peppol.",
        ),
        Some(other) => PeppolError::access(other),
        None => PeppolError::Access(format!("middleware returned HTTP {status}")),
    }
}

impl<T: Transport, S: RecordStore> EdiService<T, S> {
    /// Register a customer as a debtor on the middleware.
    ///
    /// Stores the debtor identifiers and PEPPOL endpoint the middleware
    /// assigns, together with the UEN it normalized. The UEN must be unique
    /// locally both before the call and after normalization.
    pub async fn register_debtor(&mut self, id: PartnerId) -> Result<(), PeppolError> {
        let partner = self.find_partner(id)?;
        first_failure(check_debtor_fields(partner))?;
        self.ensure_unique_uen(id)?;
        let partner = self.find_partner(id)?;
        let country_code = partner
            .country_id
            .and_then(|c| self.store().country_code(c))
            .ok_or_else(|| PeppolError::NotFound(format!("country of partner {id}")))?;
        let client_number = self.client_number()?;
        let payload = debtor_payload(partner, country_code, &client_number, self.client().config())?;
        let body = serde_json::to_value(&payload).map_err(|e| PeppolError::Access(e.to_string()))?;

        let request = ApiRequest::post(DEBTORS_PATH, body).client_number(client_number);
        let resp = self.call(&request).await?;
        if !resp.is_success() {
            return Err(debtor_error(resp.message(), resp.status));
        }
        let created: DebtorCreated = resp.json()?;

        let uen = created
            .legal_entity_trn
            .filter(|u| !u.is_empty())
            .or(Some(payload.legal_entity_trn));
        if let Some(uen) = &uen {
            first_failure(check_unique_uen(self.store(), id, uen))?;
        }

        let partner = self.find_partner_mut(id)?;
        partner.debtor_id = created.id;
        partner.debtor_number = created.debtor_number;
        partner.client_id = created.client_id;
        partner.peppol_endpoint = created.peppol_id;
        partner.unique_entity_number = uen;
        partner.messages.push("The debtor has been created on PEPPOL.".to_string());
        info!(
            partner = %partner.name,
            debtor_id = partner.debtor_id.unwrap_or_default(),
            "debtor registered on PEPPOL"
        );
        Ok(())
    }

    /// Fail if another partner, archived ones included, has the same UEN.
    pub fn ensure_unique_uen(&self, id: PartnerId) -> Result<(), PeppolError> {
        let partner = self.find_partner(id)?;
        match partner.unique_entity_number.as_deref() {
            Some(uen) => first_failure(check_unique_uen(self.store(), id, uen)),
            None => Ok(()),
        }
    }

    /// Partners whose name or UEN contains `query`, ignoring case.
    pub fn search_partners(&self, query: &str) -> Vec<PartnerId> {
        self.store().search_partners(query)
    }
}
