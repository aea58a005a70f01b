//! Email integration: configured defaults merged into each send.

mod configuration;
mod errors;
mod merge;
mod requests;
mod service;
mod template_parameter;

pub use configuration::{Configuration, ConfigurationBuilder};
pub use errors::IntegrationError;
pub use merge::{first_non_empty, merge};
pub use requests::{SendEmailRequest, SendTemplatedEmailRequest};
pub use service::{
    EmailIntegration, EmailIntegrationImpl, TEMPLATE_HTML_PLACEHOLDER, TEMPLATE_TEXT_PLACEHOLDER,
};
pub use template_parameter::EmailTemplateParameter;
