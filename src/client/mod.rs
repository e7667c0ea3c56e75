//! Middleware HTTP client: transport seam, token lifecycle, and the
//! authenticated request path with its single refresh-and-retry.
//!
//! # Example
//!
//! ```ignore
//! use peppol_edi::client::*;
//! use peppol_edi::core::*;
//!
//! let config = EdiConfig::from_env()?;
//! let client = ApiClient::new(ReqwestTransport::new(config.timeout)?, config);
//!
//! let mut company = CompanyBuilder::new("ACME Pte Ltd")
//!     .email("billing@acme.sg")
//!     .unique_entity_number("201912345K")
//!     .api_key("key-from-provider", Mode::Prod)
//!     .build();
//! client.validate(&mut company).await?;
//!
//! let resp = client
//!     .send(&mut company, &ApiRequest::get("/api/v1/invoice/detail").query("invoiceId", 42))
//!     .await?;
//! ```

mod auth;
mod config;
mod request;
mod transport;
pub mod wire;

pub use auth::{REFRESH_PATH, VERIFY_KEY_PATH};
pub use config::{ConfigError, EdiConfig};
pub use request::{ApiClient, ApiRequest, ApiResponse};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
};
