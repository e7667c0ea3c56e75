use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::config::EdiConfig;
use super::transport::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::core::{Company, PeppolError};

/// A middleware call, relative to the company's middleware URL.
///
/// Headers are derived from the request on every attempt; nothing is
/// carried over from one call to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Value for the `x-client-number` header, if the endpoint needs one.
    pub client_number: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
            client_number: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            client_number: None,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn client_number(mut self, client_number: impl Into<String>) -> Self {
        self.client_number = Some(client_number.into());
        self
    }

    /// Resolve against `base_url`, attaching `bearer` when given.
    pub(crate) fn to_http(
        &self,
        base_url: &str,
        bearer: Option<&str>,
    ) -> Result<HttpRequest, PeppolError> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        let mut url = reqwest::Url::parse(&raw)
            .map_err(|e| PeppolError::Access(format!("invalid middleware URL '{raw}': {e}")))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = bearer {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        if let Some(client_number) = &self.client_number {
            headers.push(("x-client-number".to_string(), client_number.clone()));
        }

        Ok(HttpRequest {
            method: self.method,
            url: url.into(),
            headers,
            body: self.body.as_ref().map(|b| b.to_string()),
        })
    }
}

/// A buffered middleware response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl From<HttpResponse> for ApiResponse {
    fn from(resp: HttpResponse) -> Self {
        Self {
            status: resp.status,
            body: resp.body,
        }
    }
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// The `message` field of a JSON error body, if there is one.
    pub fn message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        match value.get("message")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Decode the body, treating a malformed body as an access failure.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, PeppolError> {
        serde_json::from_str(&self.body).map_err(|e| {
            PeppolError::Access(format!("unexpected middleware response: {e}"))
        })
    }

    /// Fail with the middleware's message unless the status is 2xx.
    pub fn error_for_status(self) -> Result<Self, PeppolError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(PeppolError::Access(self.message().unwrap_or_else(|| {
            format!("middleware returned HTTP {}", self.status)
        })))
    }
}

/// Middleware client shared by every record type.
///
/// Holds no per-company state: the company whose tokens are used is passed
/// to every call, and refreshed tokens are written straight back to it.
pub struct ApiClient<T> {
    pub(crate) transport: T,
    pub(crate) config: EdiConfig,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, config: EdiConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &EdiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue `request` with the company's access token.
    ///
    /// A 401 triggers one token refresh and one retry. A 401 on the retry
    /// is returned as an access error; it is never retried again.
    pub async fn send(
        &self,
        company: &mut Company,
        request: &ApiRequest,
    ) -> Result<ApiResponse, PeppolError> {
        let (base_url, token) = session(company)?;
        let resp = self
            .execute(request.to_http(&base_url, Some(&token))?)
            .await?;
        if resp.status != 401 {
            return Ok(resp);
        }

        warn!(path = %request.path, "access token rejected, refreshing");
        self.refresh(company).await?;

        let (base_url, token) = session(company)?;
        let retry = self
            .execute(request.to_http(&base_url, Some(&token))?)
            .await?;
        if retry.status == 401 {
            return Err(PeppolError::Access(
                retry
                    .message()
                    .unwrap_or_else(|| "middleware rejected the refreshed access token".into()),
            ));
        }
        Ok(retry)
    }

    /// Issue a request without the company's access token.
    pub(crate) async fn send_raw(&self, request: HttpRequest) -> Result<ApiResponse, PeppolError> {
        self.execute(request).await
    }

    async fn execute(&self, request: HttpRequest) -> Result<ApiResponse, PeppolError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "sending middleware request");
        let resp = self.transport.execute(request).await.map_err(|e| {
            debug!(%method, %url, error = %e, "middleware request failed");
            PeppolError::from(e)
        })?;
        debug!(%method, %url, status = resp.status, "received middleware response");
        Ok(resp.into())
    }
}

/// Middleware URL and access token of a verified company.
fn session(company: &Company) -> Result<(String, String), PeppolError> {
    if !company.is_verified() {
        return Err(PeppolError::Access(format!(
            "company \"{}\" is not verified with the PEPPOL middleware",
            company.name
        )));
    }
    let url = company.edi_url.clone().ok_or_else(|| {
        PeppolError::Access(
            "Sorry, PEPPOL URL is not set in the system. Please contact your administrator."
                .into(),
        )
    })?;
    let token = company
        .access_token
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PeppolError::Access("no PEPPOL access token available".into()))?;
    Ok((url, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn headers_are_built_per_request() {
        let with_client = ApiRequest::post("/api/v1/debtors", json!({})).client_number("1001");
        let without = ApiRequest::get("/api/v1/invoice/detail");

        let a = with_client.to_http("https://mw.test/", Some("tok")).unwrap();
        let b = without.to_http("https://mw.test/", Some("tok")).unwrap();

        assert_eq!(a.header("x-client-number"), Some("1001"));
        assert_eq!(b.header("x-client-number"), None);
        assert_eq!(a.header("Authorization"), Some("Bearer tok"));
        assert_eq!(a.url, "https://mw.test/api/v1/debtors");
    }

    #[test]
    fn query_is_encoded() {
        let req = ApiRequest::get("/api/v1/invoice/detail").query("invoiceId", "12 3");
        let http = req.to_http("https://mw.test", None).unwrap();
        assert_eq!(http.url, "https://mw.test/api/v1/invoice/detail?invoiceId=12+3");
        assert_eq!(http.header("Authorization"), None);
    }

    #[test]
    fn invalid_base_url_is_access_error() {
        let err = ApiRequest::get("/x").to_http("not a url", None).unwrap_err();
        assert!(err.is_access());
    }

    #[test]
    fn error_for_status_prefers_message() {
        let resp = ApiResponse {
            status: 422,
            body: r#"{"message":"Invoice already exists"}"#.into(),
        };
        assert_eq!(
            resp.error_for_status(),
            Err(PeppolError::Access("Invoice already exists".into()))
        );

        let resp = ApiResponse {
            status: 500,
            body: "<html>oops</html>".into(),
        };
        assert_eq!(
            resp.error_for_status(),
            Err(PeppolError::Access("middleware returned HTTP 500".into()))
        );
    }

    #[test]
    fn unverified_company_has_no_session() {
        let company = Company {
            name: "ACME".into(),
            access_token: Some("tok".into()),
            edi_url: Some("https://mw.test".into()),
            ..Company::default()
        };
        assert!(session(&company).unwrap_err().is_access());
    }
}
