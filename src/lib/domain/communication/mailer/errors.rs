//! Mailer errors

use lettre::{address::AddressError, error::Error as MessageError, transport::smtp};
use thiserror::Error;
use tracing::debug;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The provider answered with a non-success status
    #[error("provider rejected the email with status {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,

        /// Response body, as returned by the provider
        body: String,
    },

    /// The transport could not accept an email address
    #[error("Invalid email address")]
    InvalidEmail,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<AddressError> for MailerError {
    fn from(err: AddressError) -> Self {
        debug!("AddressError -> MailerError: {}", err);

        MailerError::InvalidEmail
    }
}

impl From<MessageError> for MailerError {
    fn from(err: MessageError) -> Self {
        MailerError::UnknownError(err.into())
    }
}

impl From<smtp::Error> for MailerError {
    fn from(err: smtp::Error) -> Self {
        debug!("smtp::Error -> MailerError: {}", err);

        MailerError::UnknownError(err.into())
    }
}

impl From<reqwest::Error> for MailerError {
    fn from(err: reqwest::Error) -> Self {
        debug!("reqwest::Error -> MailerError: {}", err);

        MailerError::UnknownError(err.into())
    }
}

impl From<serde_json::Error> for MailerError {
    fn from(err: serde_json::Error) -> Self {
        MailerError::UnknownError(err.into())
    }
}
