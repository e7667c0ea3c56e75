use tracing::info;

use crate::client::{ApiClient, ApiRequest, ApiResponse, Transport};
use crate::core::{Move, MoveId, Partner, PartnerId, PeppolError, RecordStore};

/// Runs the middleware workflows against a host record store.
///
/// The service owns the store for the duration of a workflow. Every call
/// borrows the company mutably, so token refreshes for the same company
/// are serialized by construction.
pub struct EdiService<T, S> {
    client: ApiClient<T>,
    store: S,
}

impl<T: Transport, S: RecordStore> EdiService<T, S> {
    pub fn new(client: ApiClient<T>, store: S) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Verify the company's API key; see [`ApiClient::validate`].
    pub async fn validate_company(&mut self) -> Result<(), PeppolError> {
        self.client.validate(self.store.company_mut()).await
    }

    /// Exchange the refresh token for a new pair; see [`ApiClient::refresh`].
    pub async fn refresh_tokens(&mut self) -> Result<(), PeppolError> {
        self.client.refresh(self.store.company_mut()).await
    }

    /// Pick the middleware environment and resolve its URL from configuration.
    ///
    /// Changing the mode drops the existing session; the company has to be
    /// validated again against the new environment.
    pub fn set_mode(&mut self, mode: crate::core::Mode) -> Result<(), PeppolError> {
        let url = self.client.config().url_for(mode).map(str::to_string).ok_or_else(|| {
            PeppolError::access(
                "Sorry, PEPPOL URL is not set in the system. Please contact your administrator.",
            )
        })?;
        let company = self.store.company_mut();
        if company.mode != Some(mode) {
            company.access_token = None;
            company.refresh_token = None;
            company.verification_status = crate::core::VerificationStatus::NotVerified;
        }
        company.mode = Some(mode);
        company.edi_url = Some(url);
        info!(company = %company.name, mode = mode.code(), "PEPPOL mode selected");
        Ok(())
    }

    /// Whether PEPPOL actions are available for the company.
    pub fn is_peppol_enabled(&self) -> bool {
        self.store.company().is_peppol_enabled()
    }

    /// Per-document flag; mirrors the owning company.
    pub fn is_move_peppol_enabled(&self, id: MoveId) -> bool {
        self.store.get_move(id).is_some() && self.is_peppol_enabled()
    }

    /// Issue an authenticated request with the company's session.
    pub(crate) async fn call(&mut self, request: &ApiRequest) -> Result<ApiResponse, PeppolError> {
        self.client.send(self.store.company_mut(), request).await
    }

    /// The company's client number, required by most middleware calls.
    pub(crate) fn client_number(&self) -> Result<String, PeppolError> {
        let company = self.store.company();
        company
            .client_number
            .clone()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                PeppolError::validation(format!(
                    "Warning! Your company \"{}\" does not have Client Number.",
                    company.name
                ))
            })
    }

    pub(crate) fn find_move(&self, id: MoveId) -> Result<&Move, PeppolError> {
        self.store
            .get_move(id)
            .ok_or_else(|| PeppolError::NotFound(format!("move {id}")))
    }

    pub(crate) fn find_move_mut(&mut self, id: MoveId) -> Result<&mut Move, PeppolError> {
        self.store
            .get_move_mut(id)
            .ok_or_else(|| PeppolError::NotFound(format!("move {id}")))
    }

    pub(crate) fn find_partner(&self, id: PartnerId) -> Result<&Partner, PeppolError> {
        self.store
            .get_partner(id)
            .ok_or_else(|| PeppolError::NotFound(format!("partner {id}")))
    }

    pub(crate) fn find_partner_mut(&mut self, id: PartnerId) -> Result<&mut Partner, PeppolError> {
        self.store
            .get_partner_mut(id)
            .ok_or_else(|| PeppolError::NotFound(format!("partner {id}")))
    }
}
