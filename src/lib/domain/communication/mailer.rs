//! Mailer module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod credentials;
mod errors;
mod message;

pub use credentials::Credentials;
pub use errors::MailerError;
pub use message::{Message, Substitution, TemplateSettings};

/// Delivers messages through the email provider
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Deliver a single message
    ///
    /// # Arguments
    /// * `credentials` - The [`Credentials`] to authenticate with. The concrete
    ///   transport is chosen from these on every call.
    /// * `message` - The fully constructed [`Message`].
    ///
    /// # Returns
    /// A [`Result`] indicating success or failure. Provider errors are not retried.
    async fn deliver(&self, credentials: &Credentials, message: &Message)
        -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn deliver(&self, credentials: &Credentials, message: &Message)
            -> Result<(), MailerError>;
    }
}
