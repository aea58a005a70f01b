//! SendGrid mailer implementation

use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use tracing::debug;

use crate::domain::communication::{
    integration::{Configuration, ConfigurationBuilder, EmailIntegrationImpl, IntegrationError},
    mailer::{Credentials, Mailer, MailerError, Message},
};

use super::settings::IntegrationSettings;

mod smtp_api;
mod web_api;

pub use smtp_api::SmtpApiTransport;
pub use web_api::WebApiTransport;

/// SendGrid endpoint configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct SendGridConfig {
    /// Base URL of the SendGrid web API
    #[clap(long, env = "SENDGRID_API_URL", default_value = "https://api.sendgrid.com")]
    pub api_url: String,

    /// The SendGrid SMTP relay host
    #[clap(long, env = "SENDGRID_SMTP_HOST", default_value = "smtp.sendgrid.net")]
    pub smtp_host: String,

    /// The SendGrid SMTP relay port
    #[clap(long, env = "SENDGRID_SMTP_PORT", default_value = "587")]
    pub smtp_port: u16,

    /// Network timeout, in seconds
    #[clap(long, env = "SENDGRID_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.sendgrid.com".to_string(),
            smtp_host: "smtp.sendgrid.net".to_string(),
            smtp_port: 587,
            timeout_secs: 30,
        }
    }
}

/// Delivers through the SendGrid web API when given an API key, or through
/// the SendGrid SMTP relay when given a username and password.
///
/// A new transport is built for every delivery.
#[derive(Debug, Default, Clone)]
pub struct SendGridMailer {
    config: SendGridConfig,
}

impl SendGridMailer {
    /// Create a new SendGrid mailer
    pub fn new(config: SendGridConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn deliver(
        &self,
        credentials: &Credentials,
        message: &Message,
    ) -> Result<(), MailerError> {
        match credentials {
            Credentials::ApiKey(api_key) => {
                debug!(receivers = message.to.len(), "delivering via SendGrid web API");

                WebApiTransport::new(&self.config, api_key)?
                    .send(message)
                    .await
            }
            Credentials::Basic { username, password } => {
                debug!(receivers = message.to.len(), "delivering via SendGrid SMTP relay");

                SmtpApiTransport::new(&self.config, username, password)?
                    .send(message)
                    .await
            }
        }
    }
}

/// Email integration backed by SendGrid
pub type SendGridIntegration = EmailIntegrationImpl<SendGridMailer>;

impl SendGridIntegration {
    /// Creates an integration that authenticates with a username and password.
    ///
    /// `configure` is applied to the builder before it is built; pass `|b| b`
    /// to keep the defaults.
    pub fn with_credentials(
        username: impl Into<String>,
        password: impl Into<String>,
        sender: impl Into<String>,
        configure: impl FnOnce(ConfigurationBuilder) -> ConfigurationBuilder,
    ) -> Result<Self, IntegrationError> {
        let builder = ConfigurationBuilder::with_credentials(username, password, sender);

        Ok(Self::from_configuration(configure(builder).build()?))
    }

    /// Creates an integration that authenticates with an API key.
    ///
    /// `configure` is applied to the builder before it is built; pass `|b| b`
    /// to keep the defaults.
    pub fn with_api_key(
        api_key: impl Into<String>,
        sender: impl Into<String>,
        configure: impl FnOnce(ConfigurationBuilder) -> ConfigurationBuilder,
    ) -> Result<Self, IntegrationError> {
        let builder = ConfigurationBuilder::with_api_key(api_key, sender);

        Ok(Self::from_configuration(configure(builder).build()?))
    }

    /// Creates an integration from a built configuration, using the public
    /// SendGrid endpoints
    pub fn from_configuration(configuration: Configuration) -> Self {
        Self::new(
            Arc::new(configuration),
            Arc::new(SendGridMailer::default()),
        )
    }

    /// Creates an integration from command-line / environment settings
    pub fn from_settings(settings: &IntegrationSettings) -> Result<Self, IntegrationError> {
        let configuration = settings.builder()?.build()?;

        Ok(Self::new(
            Arc::new(configuration),
            Arc::new(SendGridMailer::new(settings.transport.clone())),
        ))
    }
}
