//! Integration configuration

use std::fmt;

use crate::domain::communication::{email_addresses::EmailAddress, mailer::Credentials};

use super::{merge::distinct, EmailTemplateParameter, IntegrationError};

#[derive(Clone, Default)]
struct Secrets {
    username: Option<String>,
    password: Option<String>,
    api_key: Option<String>,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("api_key", &self.api_key.as_ref().map(|_| "********"))
            .finish()
    }
}

/// Immutable settings shared by every send
#[derive(Debug, Clone)]
pub struct Configuration {
    secrets: Secrets,
    sender: EmailAddress,
    default_subject: Option<String>,
    default_message: Option<String>,
    default_receivers: Vec<EmailAddress>,
    default_template_id: Option<String>,
    default_template_parameters: Vec<EmailTemplateParameter>,
    html: bool,
}

impl Configuration {
    /// The credentials to send with.
    ///
    /// A non-empty API key wins; otherwise the username and password are used.
    pub fn credentials(&self) -> Credentials {
        match self.secrets.api_key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => Credentials::ApiKey(key.to_string()),
            None => Credentials::Basic {
                username: self.secrets.username.clone().unwrap_or_default(),
                password: self.secrets.password.clone().unwrap_or_default(),
            },
        }
    }

    /// The sender address
    pub fn sender(&self) -> &EmailAddress {
        &self.sender
    }

    /// Subject used when a send does not supply one
    pub fn default_subject(&self) -> Option<&str> {
        self.default_subject.as_deref()
    }

    /// Text prepended to every plain send's body
    pub fn default_message(&self) -> Option<&str> {
        self.default_message.as_deref()
    }

    /// Receivers added to every send
    pub fn default_receivers(&self) -> &[EmailAddress] {
        &self.default_receivers
    }

    /// Template used when a templated send does not supply one
    pub fn default_template_id(&self) -> Option<&str> {
        self.default_template_id.as_deref()
    }

    /// Substitutions added to every templated send
    pub fn default_template_parameters(&self) -> &[EmailTemplateParameter] {
        &self.default_template_parameters
    }

    /// Whether plain sends carry an HTML body instead of a text body
    pub fn is_html(&self) -> bool {
        self.html
    }
}

/// Accumulates settings before producing a [`Configuration`]
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    secrets: Secrets,
    sender: String,
    default_subject: Option<String>,
    default_message: Option<String>,
    default_receivers: Vec<String>,
    default_template_id: Option<String>,
    default_template_parameters: Vec<EmailTemplateParameter>,
    html: bool,
}

impl ConfigurationBuilder {
    fn new(secrets: Secrets, sender: String) -> Self {
        Self {
            secrets,
            sender,
            default_subject: None,
            default_message: None,
            default_receivers: Vec::new(),
            default_template_id: None,
            default_template_parameters: Vec::new(),
            html: false,
        }
    }

    /// Starts a configuration that authenticates with a username and password
    pub fn with_credentials(
        username: impl Into<String>,
        password: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        let secrets = Secrets {
            username: Some(username.into()),
            password: Some(password.into()),
            api_key: None,
        };

        Self::new(secrets, sender.into())
    }

    /// Starts a configuration that authenticates with an API key
    pub fn with_api_key(api_key: impl Into<String>, sender: impl Into<String>) -> Self {
        let secrets = Secrets {
            api_key: Some(api_key.into()),
            ..Secrets::default()
        };

        Self::new(secrets, sender.into())
    }

    /// Sets the default subject
    pub fn default_subject(mut self, subject: impl Into<String>) -> Self {
        self.default_subject = Some(subject.into());
        self
    }

    /// Sets the text prepended to every plain send's body
    pub fn default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    /// Adds a default receiver
    pub fn default_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.default_receivers.push(receiver.into());
        self
    }

    /// Adds several default receivers
    pub fn default_receivers<I, S>(mut self, receivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_receivers
            .extend(receivers.into_iter().map(Into::into));
        self
    }

    /// Sends plain bodies as HTML
    pub fn html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    /// Sets the default template id
    pub fn default_template_id(mut self, template_id: impl Into<String>) -> Self {
        self.default_template_id = Some(template_id.into());
        self
    }

    /// Adds a default template parameter
    pub fn default_template_parameter(mut self, parameter: EmailTemplateParameter) -> Self {
        self.default_template_parameters.push(parameter);
        self
    }

    /// Adds several default template parameters
    pub fn default_template_parameters(
        mut self,
        parameters: impl IntoIterator<Item = EmailTemplateParameter>,
    ) -> Self {
        self.default_template_parameters.extend(parameters);
        self
    }

    /// Validates the addresses and produces the immutable [`Configuration`].
    ///
    /// An empty default receiver list is allowed.
    pub fn build(self) -> Result<Configuration, IntegrationError> {
        let sender = EmailAddress::new(&self.sender)
            .map_err(|err| IntegrationError::invalid_address("sender", err))?;

        let default_receivers = self
            .default_receivers
            .iter()
            .map(|raw| EmailAddress::new(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| IntegrationError::invalid_address("default_receivers", err))?;

        Ok(Configuration {
            secrets: self.secrets,
            sender,
            default_subject: self.default_subject,
            default_message: self.default_message,
            default_receivers: distinct(default_receivers),
            default_template_id: self.default_template_id,
            default_template_parameters: distinct(self.default_template_parameters),
            html: self.html,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_build_with_defaults() -> TestResult {
        let configuration = ConfigurationBuilder::with_api_key("SG.key", "a@x.com")
            .default_subject("Subject")
            .default_message("Alert: ")
            .default_receiver("b@x.com")
            .default_template_id("tpl-1")
            .default_template_parameter(EmailTemplateParameter::new("-name-", ["Ann"]))
            .html(true)
            .build()?;

        assert_eq!(configuration.sender().as_str(), "a@x.com");
        assert_eq!(configuration.default_subject(), Some("Subject"));
        assert_eq!(configuration.default_message(), Some("Alert: "));
        assert_eq!(
            configuration.default_receivers(),
            [EmailAddress::new("b@x.com")?]
        );
        assert_eq!(configuration.default_template_id(), Some("tpl-1"));
        assert_eq!(configuration.default_template_parameters().len(), 1);
        assert!(configuration.is_html());

        Ok(())
    }

    #[test]
    fn test_build_without_overrides() -> TestResult {
        let configuration = ConfigurationBuilder::with_api_key("SG.key", "a@x.com").build()?;

        assert!(configuration.default_subject().is_none());
        assert!(configuration.default_message().is_none());
        assert!(configuration.default_receivers().is_empty());
        assert!(configuration.default_template_id().is_none());
        assert!(configuration.default_template_parameters().is_empty());
        assert!(!configuration.is_html());

        Ok(())
    }

    #[test]
    fn test_invalid_sender_is_rejected() {
        let result = ConfigurationBuilder::with_api_key("SG.key", "not-an-email").build();

        assert!(matches!(
            result,
            Err(IntegrationError::InvalidInput {
                parameter: "sender",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_default_receiver_is_rejected() {
        let result = ConfigurationBuilder::with_api_key("SG.key", "a@x.com")
            .default_receivers(["b@x.com", "bogus"])
            .build();

        assert!(matches!(
            result,
            Err(IntegrationError::InvalidInput {
                parameter: "default_receivers",
                ..
            })
        ));
    }

    #[test]
    fn test_default_receivers_collapse_duplicates() -> TestResult {
        let configuration = ConfigurationBuilder::with_api_key("SG.key", "a@x.com")
            .default_receivers(["b@x.com", "c@x.com"])
            .default_receiver("b@x.com")
            .build()?;

        assert_eq!(
            configuration.default_receivers(),
            [EmailAddress::new("b@x.com")?, EmailAddress::new("c@x.com")?]
        );

        Ok(())
    }

    #[test]
    fn test_default_template_parameters_collapse_equal_pairs_only() -> TestResult {
        let configuration = ConfigurationBuilder::with_api_key("SG.key", "a@x.com")
            .default_template_parameters([
                EmailTemplateParameter::new("-name-", ["Ann"]),
                EmailTemplateParameter::new("-name-", ["Ann"]),
                EmailTemplateParameter::new("-name-", ["Bob"]),
            ])
            .build()?;

        assert_eq!(configuration.default_template_parameters().len(), 2);

        Ok(())
    }

    #[test]
    fn test_api_key_credentials() -> TestResult {
        let configuration = ConfigurationBuilder::with_api_key("SG.key", "a@x.com").build()?;

        assert_eq!(
            configuration.credentials(),
            Credentials::ApiKey("SG.key".to_string())
        );

        Ok(())
    }

    #[test]
    fn test_username_password_credentials() -> TestResult {
        let configuration =
            ConfigurationBuilder::with_credentials("user", "pass", "a@x.com").build()?;

        assert_eq!(
            configuration.credentials(),
            Credentials::Basic {
                username: "user".to_string(),
                password: "pass".to_string(),
            }
        );

        Ok(())
    }

    #[test]
    fn test_empty_api_key_falls_back_to_basic_credentials() -> TestResult {
        let configuration = ConfigurationBuilder::with_api_key("", "a@x.com").build()?;

        assert!(matches!(
            configuration.credentials(),
            Credentials::Basic { .. }
        ));

        Ok(())
    }

    #[test]
    fn test_debug_hides_secrets() -> TestResult {
        let configuration =
            ConfigurationBuilder::with_credentials("user", "hunter2", "a@x.com").build()?;

        assert!(!format!("{:?}", configuration).contains("hunter2"));

        Ok(())
    }
}
