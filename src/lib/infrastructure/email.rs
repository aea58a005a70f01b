//! Email infrastructure

pub mod sendgrid;
pub mod settings;

pub use sendgrid::{
    SendGridConfig, SendGridIntegration, SendGridMailer, SmtpApiTransport, WebApiTransport,
};
pub use settings::IntegrationSettings;
