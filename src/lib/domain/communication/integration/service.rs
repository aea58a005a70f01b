//! Email integration service

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::communication::{
    email_addresses::EmailAddress,
    mailer::{Mailer, Message},
};

use super::{
    merge::{first_non_empty, merge},
    Configuration, IntegrationError, SendEmailRequest, SendTemplatedEmailRequest,
};

/// Plain text body of a templated send. The provider rejects an empty body.
pub const TEMPLATE_TEXT_PLACEHOLDER: &str = " ";

/// HTML body of a templated send. The provider rejects an empty body.
pub const TEMPLATE_HTML_PLACEHOLDER: &str = "<p></p>";

/// Email integration
#[async_trait]
pub trait EmailIntegration: Clone + Send + Sync + 'static {
    /// Sends a plain email.
    ///
    /// The body is the configured default message followed by
    /// `request.message`, placed in the HTML or text part depending on the
    /// configuration.
    ///
    /// # Arguments
    /// * `request` - The [`SendEmailRequest`] to merge with the configured defaults.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] once the provider accepted the email,
    /// or an [`Err`] containing an [`IntegrationError`].
    async fn send_email(&self, request: SendEmailRequest) -> Result<(), IntegrationError>;

    /// Sends an email rendered from a provider-side transactional template.
    ///
    /// # Arguments
    /// * `request` - The [`SendTemplatedEmailRequest`] to merge with the configured defaults.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] once the provider accepted the email,
    /// or an [`Err`] containing an [`IntegrationError`].
    async fn send_templated_email(
        &self,
        request: SendTemplatedEmailRequest,
    ) -> Result<(), IntegrationError>;
}

/// Email integration implementation
#[derive(Debug, Clone)]
pub struct EmailIntegrationImpl<M>
where
    M: Mailer,
{
    configuration: Arc<Configuration>,
    mailer: Arc<M>,
}

impl<M> EmailIntegrationImpl<M>
where
    M: Mailer,
{
    /// Creates a new email integration
    pub fn new(configuration: Arc<Configuration>, mailer: Arc<M>) -> Self {
        Self {
            configuration,
            mailer,
        }
    }

    /// The configuration every send is merged with
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Merges receivers and subject with the configured defaults.
    ///
    /// Fails with [`IntegrationError::InvalidInput`] for `receivers` when a
    /// supplied address is invalid or when no receiver is left after merging.
    /// The returned message has no body or template yet.
    pub fn create_message(
        &self,
        subject: Option<&str>,
        receivers: &[String],
    ) -> Result<Message, IntegrationError> {
        let supplied = receivers
            .iter()
            .map(|raw| EmailAddress::new(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| IntegrationError::invalid_address("receivers", err))?;

        let to = merge(self.configuration.default_receivers(), supplied);

        if to.is_empty() {
            return Err(IntegrationError::invalid_input(
                "receivers",
                "at least one receiver is required",
            ));
        }

        Ok(Message::new(
            self.configuration.sender().clone(),
            first_non_empty(subject, self.configuration.default_subject()),
            to,
        ))
    }

    async fn send(&self, message: Message) -> Result<(), IntegrationError> {
        let credentials = self.configuration.credentials();

        self.mailer.deliver(&credentials, &message).await?;

        Ok(())
    }
}

#[async_trait]
impl<M> EmailIntegration for EmailIntegrationImpl<M>
where
    M: Mailer,
{
    async fn send_email(&self, request: SendEmailRequest) -> Result<(), IntegrationError> {
        let mut message = self.create_message(request.subject.as_deref(), &request.receivers)?;

        let body = format!(
            "{}{}",
            self.configuration.default_message().unwrap_or_default(),
            request.message.unwrap_or_default()
        );

        if self.configuration.is_html() {
            message.html_body = Some(body);
        } else {
            message.plain_body = Some(body);
        }

        self.send(message).await
    }

    async fn send_templated_email(
        &self,
        request: SendTemplatedEmailRequest,
    ) -> Result<(), IntegrationError> {
        let mut message = self.create_message(request.subject.as_deref(), &request.receivers)?;

        message.plain_body = Some(TEMPLATE_TEXT_PLACEHOLDER.to_string());
        message.html_body = Some(TEMPLATE_HTML_PLACEHOLDER.to_string());

        message.enable_template_engine(first_non_empty(
            request.template_id.as_deref(),
            self.configuration.default_template_id(),
        ));

        let parameters = merge(
            self.configuration.default_template_parameters(),
            request.parameters,
        );

        for parameter in parameters {
            message.add_substitution(parameter.replacement_tag(), parameter.values().to_vec());
        }

        self.send(message).await
    }
}
