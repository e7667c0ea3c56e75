use thiserror::Error;

/// Errors raised by the PEPPOL integration.
///
/// The middleware integration only distinguishes two failure families:
/// access failures (anything that went wrong talking to the middleware,
/// including messages the middleware reported) and validation failures
/// (local preconditions that were not met).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PeppolError {
    /// Transport failure, rejected credentials, malformed response, or an
    /// error message reported by the middleware.
    #[error("access error: {0}")]
    Access(String),

    /// A local precondition was not met.
    #[error("validation error: {0}")]
    Validation(String),

    /// A record reference could not be resolved in the host store.
    #[error("record not found: {0}")]
    NotFound(String),
}

impl PeppolError {
    /// Shorthand for an access error.
    pub fn access(message: impl Into<String>) -> Self {
        Self::Access(message.into())
    }

    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The bare message, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Access(m) | Self::Validation(m) | Self::NotFound(m) => m,
        }
    }

    pub fn is_access(&self) -> bool {
        matches!(self, Self::Access(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// A single precondition failure with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the offending field (e.g. "company.client_number").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Short rule identifier, if the check has one (e.g. "UEN-UNIQUE").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

impl From<ValidationError> for PeppolError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.message)
    }
}

/// Turn the first collected failure, if any, into an error.
///
/// Operations report only the first failed precondition to the caller,
/// in the order the checks were run.
pub fn first_failure(errors: Vec<ValidationError>) -> Result<(), PeppolError> {
    match errors.into_iter().next() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_rule() {
        let err = ValidationError::with_rule("partner.uen", "duplicate", "UEN-UNIQUE");
        assert_eq!(err.to_string(), "[UEN-UNIQUE] partner.uen: duplicate");
    }

    #[test]
    fn first_failure_keeps_order() {
        let errors = vec![
            ValidationError::new("a", "first"),
            ValidationError::new("b", "second"),
        ];
        assert_eq!(
            first_failure(errors),
            Err(PeppolError::Validation("first".into()))
        );
        assert!(first_failure(Vec::new()).is_ok());
    }

    #[test]
    fn message_strips_kind() {
        let err = PeppolError::access("INVALID_API_KEY");
        assert_eq!(err.message(), "INVALID_API_KEY");
        assert_eq!(err.to_string(), "access error: INVALID_API_KEY");
        assert!(err.is_access());
    }
}
