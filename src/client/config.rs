use std::time::Duration;

use thiserror::Error;

use crate::core::Mode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Middleware connection settings shared by every company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdiConfig {
    /// Base URL of the live middleware.
    pub prod_url: String,
    /// Base URL of the sandbox middleware. Test mode is unusable without it.
    pub test_url: Option<String>,
    /// Per-request timeout. `None` lets requests block until the peer answers.
    pub timeout: Option<Duration>,
    /// Platform identifier sent with invoice and debtor payloads.
    pub platform_id: i64,
    /// Reference sent when registering a debtor.
    pub debtor_reference: String,
}

impl Default for EdiConfig {
    fn default() -> Self {
        Self {
            prod_url: "https://api.invoicedge.app".to_string(),
            test_url: None,
            timeout: Some(Duration::from_secs(30)),
            platform_id: 15,
            debtor_reference: "Test".to_string(),
        }
    }
}

impl EdiConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `PEPPOL_EDI_PROD_URL` | `https://api.invoicedge.app` |
    /// | `PEPPOL_EDI_TEST_URL` | unset |
    /// | `PEPPOL_EDI_TIMEOUT_SECS` | `30` (`0` disables the timeout) |
    /// | `PEPPOL_EDI_PLATFORM_ID` | `15` |
    /// | `PEPPOL_EDI_DEBTOR_REFERENCE` | `Test` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EdiConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("PEPPOL_EDI_PROD_URL") {
            config.prod_url = url;
        }
        config.test_url = lookup("PEPPOL_EDI_TEST_URL").filter(|u| !u.trim().is_empty());

        if let Some(raw) = lookup("PEPPOL_EDI_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("PEPPOL_EDI_TIMEOUT_SECS must be an integer, got '{raw}'"))
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(raw) = lookup("PEPPOL_EDI_PLATFORM_ID") {
            config.platform_id = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("PEPPOL_EDI_PLATFORM_ID must be an integer, got '{raw}'"))
            })?;
        }

        if let Some(reference) = lookup("PEPPOL_EDI_DEBTOR_REFERENCE") {
            config.debtor_reference = reference;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.prod_url) {
            return Err(ConfigError::Invalid(format!(
                "production URL '{}' is not an http(s) URL",
                self.prod_url
            )));
        }
        if let Some(url) = &self.test_url {
            if !is_http_url(url) {
                return Err(ConfigError::Invalid(format!(
                    "test URL '{url}' is not an http(s) URL"
                )));
            }
        }
        Ok(())
    }

    /// Middleware URL for the given mode, if one is configured.
    pub fn url_for(&self, mode: Mode) -> Option<&str> {
        match mode {
            Mode::Prod => Some(self.prod_url.as_str()),
            Mode::Test => self.test_url.as_deref(),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
