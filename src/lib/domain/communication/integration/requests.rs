//! Per-call send requests

use super::EmailTemplateParameter;

/// Arguments for a plain send. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendEmailRequest {
    /// Overrides the default subject
    pub subject: Option<String>,

    /// Appended to the default message
    pub message: Option<String>,

    /// Added to the default receivers
    pub receivers: Vec<String>,
}

impl SendEmailRequest {
    /// An empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subject
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the message body
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a receiver
    pub fn receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receivers.push(receiver.into());
        self
    }

    /// Adds several receivers
    pub fn receivers<I, S>(mut self, receivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.receivers.extend(receivers.into_iter().map(Into::into));
        self
    }
}

/// Arguments for a templated send. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendTemplatedEmailRequest {
    /// Overrides the default subject
    pub subject: Option<String>,

    /// Overrides the default template id
    pub template_id: Option<String>,

    /// Added to the default template parameters
    pub parameters: Vec<EmailTemplateParameter>,

    /// Added to the default receivers
    pub receivers: Vec<String>,
}

impl SendTemplatedEmailRequest {
    /// An empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subject
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the template id
    pub fn template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Adds a template parameter
    pub fn parameter(mut self, parameter: EmailTemplateParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds several template parameters
    pub fn parameters(
        mut self,
        parameters: impl IntoIterator<Item = EmailTemplateParameter>,
    ) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Adds a receiver
    pub fn receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receivers.push(receiver.into());
        self
    }

    /// Adds several receivers
    pub fn receivers<I, S>(mut self, receivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.receivers.extend(receivers.into_iter().map(Into::into));
        self
    }
}
