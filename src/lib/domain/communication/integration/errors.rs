//! Integration errors

use thiserror::Error;

use crate::domain::communication::{email_addresses::EmailAddressError, mailer::MailerError};

/// Errors returned by the email integration
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// A parameter failed validation; nothing was sent
    #[error("invalid {parameter}: {message}")]
    InvalidInput {
        /// Name of the offending parameter
        parameter: &'static str,

        /// What was wrong with it
        message: String,
    },

    /// The transport failed to deliver the message
    #[error(transparent)]
    Delivery(#[from] MailerError),
}

impl IntegrationError {
    /// Invalid input for `parameter`
    pub fn invalid_input(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            parameter,
            message: message.into(),
        }
    }

    /// Invalid input caused by an email address that failed validation
    pub fn invalid_address(parameter: &'static str, err: EmailAddressError) -> Self {
        Self::invalid_input(parameter, err.to_string())
    }

    /// The name of the invalid parameter, if this is an input error
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInput { parameter, .. } => Some(*parameter),
            Self::Delivery(_) => None,
        }
    }
}
