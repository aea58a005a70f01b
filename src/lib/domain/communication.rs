//! Communication module

pub mod email_addresses;
pub mod integration;
pub mod mailer;
