//! Integration settings read from arguments or the environment

use std::fmt;

use clap::Parser;

use crate::domain::communication::integration::{ConfigurationBuilder, IntegrationError};

use super::sendgrid::SendGridConfig;

/// Credentials, sender and defaults for the SendGrid integration
#[derive(Clone, Parser)]
pub struct IntegrationSettings {
    /// SendGrid API key; takes precedence over username and password
    #[clap(long, env = "SENDGRID_API_KEY")]
    pub api_key: Option<String>,

    /// SendGrid username
    #[clap(long, env = "SENDGRID_USERNAME")]
    pub username: Option<String>,

    /// SendGrid password
    #[clap(long, env = "SENDGRID_PASSWORD")]
    pub password: Option<String>,

    /// The sender email address
    #[clap(long, env = "SENDGRID_SENDER")]
    pub sender: String,

    /// Subject used when a send does not supply one
    #[clap(long, env = "SENDGRID_DEFAULT_SUBJECT")]
    pub default_subject: Option<String>,

    /// Text prepended to every plain email
    #[clap(long, env = "SENDGRID_DEFAULT_MESSAGE")]
    pub default_message: Option<String>,

    /// Receivers added to every email, comma separated
    #[clap(long, env = "SENDGRID_DEFAULT_RECEIVERS", value_delimiter = ',')]
    pub default_receivers: Vec<String>,

    /// Template used when a templated send does not supply one
    #[clap(long, env = "SENDGRID_DEFAULT_TEMPLATE_ID")]
    pub default_template_id: Option<String>,

    /// Send plain emails as HTML
    #[clap(long, env = "SENDGRID_HTML")]
    pub html: bool,

    /// SendGrid endpoints
    #[clap(flatten)]
    pub transport: SendGridConfig,
}

impl IntegrationSettings {
    /// Turns the settings into a [`ConfigurationBuilder`].
    ///
    /// Without a non-empty API key both username and password are required.
    pub fn builder(&self) -> Result<ConfigurationBuilder, IntegrationError> {
        let api_key = self.api_key.as_deref().filter(|key| !key.is_empty());

        let mut builder = match (api_key, &self.username, &self.password) {
            (Some(api_key), _, _) => ConfigurationBuilder::with_api_key(api_key, &self.sender),
            (None, Some(username), Some(password)) => {
                ConfigurationBuilder::with_credentials(username, password, &self.sender)
            }
            (None, None, _) => {
                return Err(IntegrationError::invalid_input(
                    "username",
                    "required when no API key is set",
                ))
            }
            (None, Some(_), None) => {
                return Err(IntegrationError::invalid_input(
                    "password",
                    "required when no API key is set",
                ))
            }
        };

        builder = builder
            .default_receivers(&self.default_receivers)
            .html(self.html);

        if let Some(subject) = &self.default_subject {
            builder = builder.default_subject(subject);
        }

        if let Some(message) = &self.default_message {
            builder = builder.default_message(message);
        }

        if let Some(template_id) = &self.default_template_id {
            builder = builder.default_template_id(template_id);
        }

        Ok(builder)
    }
}

impl fmt::Debug for IntegrationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "********"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("sender", &self.sender)
            .field("default_subject", &self.default_subject)
            .field("default_message", &self.default_message)
            .field("default_receivers", &self.default_receivers)
            .field("default_template_id", &self.default_template_id)
            .field("html", &self.html)
            .field("transport", &self.transport)
            .finish()
    }
}
