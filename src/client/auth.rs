//! API key verification and access token refresh.

use serde_json::json;
use tracing::{info, warn};

use super::request::{ApiClient, ApiRequest};
use super::transport::Transport;
use super::wire::{TokenPair, VerifyKeyRequest, VerifyKeyResponse};
use crate::core::{Company, PeppolError, VerificationStatus};

pub const VERIFY_KEY_PATH: &str = "/api/v1/auth/verify-api-key";
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

const INVALID_API_KEY: &str = "INVALID_API_KEY";

impl<T: Transport> ApiClient<T> {
    /// Verify the company's API key and store the session it grants.
    ///
    /// The returned UEN and email must match the company record. On any
    /// failure the company is left untouched.
    pub async fn validate(&self, company: &mut Company) -> Result<(), PeppolError> {
        let api_key = company
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                PeppolError::validation(
                    "Sorry! You have not inputted any API Key. Please contact your service \
                     provider for the API Key to access PEPPOL Network.",
                )
            })?;
        if company.mode.is_none() {
            return Err(PeppolError::validation(
                "Sorry! You have not chosen PEPPOL Electronic Document Mode (Test/Live).",
            ));
        }
        let base_url = self.middleware_url(company)?;

        let body = serde_json::to_value(VerifyKeyRequest { api_key: &api_key })
            .map_err(|e| PeppolError::Access(e.to_string()))?;
        let request = ApiRequest::post(VERIFY_KEY_PATH, body).to_http(&base_url, None)?;
        let resp = self.send_raw(request).await?;

        if !resp.is_success() {
            return Err(match resp.message() {
                Some(m) if m == INVALID_API_KEY => PeppolError::access(
                    "Sorry! you have inputted an invalid API Key. Please contact your service \
                     provider for the API Key to access PEPPOL Network.",
                ),
                Some(m) => PeppolError::Access(m),
                None => PeppolError::Access(format!("middleware returned HTTP {}", resp.status)),
            });
        }
        let granted: VerifyKeyResponse = resp.json()?;

        if !same_identity(&company.unique_entity_number, &granted.uen_no) {
            return Err(PeppolError::validation(
                "Sorry, Company UEN No. does not match. Use proper Company UEN No. to validate.",
            ));
        }
        if !same_identity(&company.email, &granted.email) {
            return Err(PeppolError::validation(
                "Sorry, Company Email does not match. Use proper Company Email to validate.",
            ));
        }

        company.client_id = granted.client_id;
        company.client_number = granted.client_number;
        company.peppol_endpoint = granted.peppol_id;
        company.edi_url = Some(base_url);
        company.access_token = Some(granted.access_token);
        company.refresh_token = Some(granted.refresh_token);
        company.verification_status = VerificationStatus::Verified;

        info!(company = %company.name, "company verified with PEPPOL middleware");
        Ok(())
    }

    /// Exchange the refresh token for a new token pair.
    ///
    /// A rejected (HTTP 400) or missing refresh token falls back to
    /// [`ApiClient::validate`], which needs the API key to still be stored.
    pub async fn refresh(&self, company: &mut Company) -> Result<(), PeppolError> {
        let Some(refresh_token) = company.refresh_token.clone().filter(|t| !t.is_empty()) else {
            warn!(company = %company.name, "no refresh token stored, re-verifying API key");
            return self.validate(company).await;
        };
        let base_url = self.middleware_url(company)?;

        let request = ApiRequest::post(REFRESH_PATH, json!({}))
            .to_http(&base_url, Some(&refresh_token))?;
        let resp = self.send_raw(request).await?;

        if resp.status == 400 {
            warn!(company = %company.name, "refresh token rejected, re-verifying API key");
            return self.validate(company).await;
        }
        let pair: TokenPair = resp.error_for_status()?.json()?;

        company.access_token = Some(pair.access_token);
        company.refresh_token = Some(pair.refresh_token);
        info!(company = %company.name, "PEPPOL access token refreshed");
        Ok(())
    }

    /// The company's stored middleware URL, else the configured one for its mode.
    pub fn middleware_url(&self, company: &Company) -> Result<String, PeppolError> {
        if let Some(url) = company.edi_url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }
        company
            .mode
            .and_then(|mode| self.config.url_for(mode))
            .map(str::to_string)
            .ok_or_else(|| {
                PeppolError::Access(
                    "Sorry, PEPPOL URL is not set in the system. Please contact your administrator."
                        .into(),
                )
            })
    }
}

/// A local identity field matches only when it is set and equal to the
/// granted one.
fn same_identity(local: &Option<String>, granted: &Option<String>) -> bool {
    match (local.as_deref(), granted.as_deref()) {
        (Some(local), Some(granted)) => !local.trim().is_empty() && local == granted,
        _ => false,
    }
}
