use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("template `{0}` not found")]
    TemplateNotFound(String),
    #[error("template `{0}` already exists in the catalog")]
    DuplicateTemplate(String),
    #[error("account `{0}` not found")]
    AccountNotFound(String),
    #[error("session `{0}` not found")]
    SessionNotFound(String),
    #[error("an account with email `{0}` already exists")]
    DuplicateAccount(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("no consultation credits left on plan `{plan}`")]
    InsufficientCredits { plan: String },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("catalog failure: {0}")]
    Catalog(String),
    #[error("integration failure: {0}")]
    Integration(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<CatalogError> for ApplicationError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Domain(domain) => Self::Domain(domain),
            other => Self::Catalog(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("payment required: {message}")]
    PaymentRequired { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "The requested resource does not exist.",
            Self::PaymentRequired { .. } => {
                "You have used all consultations on your plan. Upgrade to keep chatting."
            }
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::PaymentRequired { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::PaymentRequired { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let unassigned = || "unassigned".to_owned();
        match value {
            ApplicationError::Domain(
                error @ (DomainError::TemplateNotFound(_)
                | DomainError::AccountNotFound(_)
                | DomainError::SessionNotFound(_)),
            ) => Self::NotFound { message: error.to_string(), correlation_id: unassigned() },
            ApplicationError::Domain(error @ DomainError::InsufficientCredits { .. }) => {
                Self::PaymentRequired { message: error.to_string(), correlation_id: unassigned() }
            }
            ApplicationError::Domain(error) => {
                Self::BadRequest { message: error.to_string(), correlation_id: unassigned() }
            }
            ApplicationError::Catalog(message) | ApplicationError::Integration(message) => {
                Self::ServiceUnavailable { message, correlation_id: unassigned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: unassigned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn domain_error_maps_to_bad_request_interface_error() {
        let interface = ApplicationError::from(DomainError::InvariantViolation(
            "missing required field".to_owned(),
        ))
        .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn missing_template_maps_to_not_found() {
        let interface =
            ApplicationError::from(DomainError::TemplateNotFound("nope".to_owned()))
                .into_interface("req-2");

        assert!(matches!(interface, InterfaceError::NotFound { ref message, .. } if message.contains("nope")));
        assert_eq!(interface.correlation_id(), "req-2");
    }

    #[test]
    fn missing_session_maps_to_not_found() {
        let interface = ApplicationError::from(DomainError::SessionNotFound("s-1".to_owned()))
            .into_interface("req-6");

        assert!(matches!(interface, InterfaceError::NotFound { ref message, .. } if message.contains("s-1")));
    }

    #[test]
    fn exhausted_credits_map_to_payment_required() {
        let interface = ApplicationError::from(DomainError::InsufficientCredits {
            plan: "freemium".to_owned(),
        })
        .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::PaymentRequired { .. }));
    }

    #[test]
    fn catalog_error_maps_to_service_unavailable() {
        let interface =
            ApplicationError::Catalog("catalog file unreadable".to_owned()).into_interface("req-4");

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(
            interface.user_message(),
            "The service is temporarily unavailable. Please retry shortly."
        );
    }

    #[test]
    fn configuration_error_maps_to_internal() {
        let interface =
            ApplicationError::Configuration("invalid llm key".to_owned()).into_interface("req-5");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }
}
