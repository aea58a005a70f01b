//! Email message

use crate::domain::communication::email_addresses::EmailAddress;

/// A substitution applied by the provider's template engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The placeholder to replace, e.g. `-name-`
    pub tag: String,

    /// Replacement values, one per receiver in receiver order
    pub values: Vec<String>,
}

/// Provider-side template settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSettings {
    /// The transactional template to render, if any
    pub template_id: Option<String>,
}

/// Email message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The sender of the email
    pub from: EmailAddress,

    /// The recipients of the email
    pub to: Vec<EmailAddress>,

    /// The subject of the email
    pub subject: Option<String>,

    /// The HTML body of the email
    pub html_body: Option<String>,

    /// The plain text body of the email
    pub plain_body: Option<String>,

    /// Set when the provider should render a transactional template
    pub template: Option<TemplateSettings>,

    /// Template substitutions, in registration order
    pub substitutions: Vec<Substitution>,
}

impl Message {
    /// Creates a message with no body or template
    pub fn new(from: EmailAddress, subject: Option<String>, to: Vec<EmailAddress>) -> Self {
        Self {
            from,
            to,
            subject,
            html_body: None,
            plain_body: None,
            template: None,
            substitutions: Vec::new(),
        }
    }

    /// Marks the message as rendered by the provider's template engine
    pub fn enable_template_engine(&mut self, template_id: Option<String>) {
        self.template = Some(TemplateSettings { template_id });
    }

    /// Registers a substitution for the template engine
    pub fn add_substitution(&mut self, tag: impl Into<String>, values: Vec<String>) {
        self.substitutions.push(Substitution {
            tag: tag.into(),
            values,
        });
    }

    /// The template id, when the template engine is enabled
    pub fn template_id(&self) -> Option<&str> {
        self.template.as_ref()?.template_id.as_deref()
    }
}
