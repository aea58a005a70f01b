//! SendGrid SMTP relay transport

use std::{fmt, time::Duration};

use lettre::{
    message::{
        header::{ContentType, Header, HeaderName, HeaderValue},
        MultiPart,
    },
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::domain::communication::mailer::{MailerError, Message};

use super::SendGridConfig;

/// The `X-SMTPAPI` header carrying SendGrid template settings and substitutions
#[derive(Debug, Clone, PartialEq, Eq)]
struct XSmtpApi(String);

impl Header for XSmtpApi {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-SMTPAPI")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// Builds the `X-SMTPAPI` JSON, or `None` for messages without a template or
/// substitutions. A later substitution for the same tag replaces an earlier one.
fn smtp_api_header(message: &Message) -> Option<String> {
    if message.template.is_none() && message.substitutions.is_empty() {
        return None;
    }

    let mut header = Map::new();

    if !message.substitutions.is_empty() {
        header.insert("to".to_string(), json!(message.to));

        let sub: Map<String, Value> = message
            .substitutions
            .iter()
            .map(|substitution| (substitution.tag.clone(), json!(substitution.values)))
            .collect();

        header.insert("sub".to_string(), Value::Object(sub));
    }

    if let Some(template) = &message.template {
        let mut settings = Map::new();
        settings.insert("enable".to_string(), json!(1));

        if let Some(template_id) = &template.template_id {
            settings.insert("template_id".to_string(), json!(template_id));
        }

        header.insert(
            "filters".to_string(),
            json!({ "templates": { "settings": settings } }),
        );
    }

    Some(escape_non_ascii(&Value::Object(header).to_string()))
}

/// Rewrites every non-ASCII char as a JSON `\uXXXX` escape (surrogate pairs
/// above U+FFFF). Non-ASCII only occurs inside JSON strings, where the escape
/// is equivalent, and a pure ASCII value is not RFC 2047 encoded by lettre.
fn escape_non_ascii(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    let mut units = [0u16; 2];

    for c in json.chars() {
        if c.is_ascii() {
            escaped.push(c);
            continue;
        }

        for unit in c.encode_utf16(&mut units) {
            escaped.push_str(&format!("\\u{:04x}", unit));
        }
    }

    escaped
}

fn build_email(message: &Message) -> Result<lettre::Message, MailerError> {
    let mut builder = lettre::Message::builder().from(message.from.as_str().parse()?);

    for receiver in &message.to {
        builder = builder.to(receiver.as_str().parse()?);
    }

    if let Some(subject) = &message.subject {
        builder = builder.subject(subject.clone());
    }

    if let Some(header) = smtp_api_header(message) {
        builder = builder.header(XSmtpApi(header));
    }

    let email = match (&message.plain_body, &message.html_body) {
        (Some(plain), Some(html)) => builder.multipart(MultiPart::alternative_plain_html(
            plain.clone(),
            html.clone(),
        ))?,
        (None, Some(html)) => builder.header(ContentType::TEXT_HTML).body(html.clone())?,
        (plain, None) => builder
            .header(ContentType::TEXT_PLAIN)
            .body(plain.clone().unwrap_or_default())?,
    };

    Ok(email)
}

/// Sends messages through the SendGrid SMTP relay, authenticated by username
/// and password
pub struct SmtpApiTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpApiTransport {
    /// Creates a transport for a single delivery
    pub fn new(
        config: &SendGridConfig,
        username: &str,
        password: &str,
    ) -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self { transport })
    }

    /// Sends the message
    #[mutants::skip]
    pub async fn send(&self, message: &Message) -> Result<(), MailerError> {
        let email = build_email(message)?;

        let response = self.transport.send(email).await?;

        debug!(code = %response.code(), "SendGrid SMTP relay responded");

        Ok(())
    }
}

impl fmt::Debug for SmtpApiTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpApiTransport").finish_non_exhaustive()
    }
}
