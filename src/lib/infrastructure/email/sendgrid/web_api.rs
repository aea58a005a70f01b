//! SendGrid v3 web API transport

use std::{collections::BTreeMap, fmt, time::Duration};

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::domain::communication::mailer::{MailerError, Message};

use super::SendGridConfig;

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Contact<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    content: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Contact<'a>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    substitutions: BTreeMap<&'a str, &'a str>,
}

#[derive(Debug, Serialize)]
struct Contact<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: &'a str,
}

impl<'a> MailSendRequest<'a> {
    fn new(message: &'a Message) -> Self {
        let mut content = Vec::new();

        if let Some(plain) = &message.plain_body {
            content.push(Content {
                content_type: "text/plain",
                value: plain,
            });
        }

        if let Some(html) = &message.html_body {
            content.push(Content {
                content_type: "text/html",
                value: html,
            });
        }

        Self {
            personalizations: personalizations(message),
            from: Contact {
                email: message.from.as_str(),
            },
            subject: message.subject.as_deref(),
            content,
            template_id: message.template_id(),
        }
    }
}

/// Substitution values are positional: the i-th value of a tag belongs to the
/// i-th receiver, so substituted messages get one personalization per receiver.
/// A later substitution for the same tag replaces an earlier one.
fn personalizations(message: &Message) -> Vec<Personalization<'_>> {
    if message.substitutions.is_empty() {
        return vec![Personalization {
            to: message
                .to
                .iter()
                .map(|receiver| Contact {
                    email: receiver.as_str(),
                })
                .collect(),
            substitutions: BTreeMap::new(),
        }];
    }

    message
        .to
        .iter()
        .enumerate()
        .map(|(index, receiver)| Personalization {
            to: vec![Contact {
                email: receiver.as_str(),
            }],
            substitutions: message
                .substitutions
                .iter()
                .filter_map(|substitution| {
                    substitution
                        .values
                        .get(index)
                        .map(|value| (substitution.tag.as_str(), value.as_str()))
                })
                .collect(),
        })
        .collect()
}

/// Sends messages with `POST /v3/mail/send`, authenticated by API key
pub struct WebApiTransport {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl WebApiTransport {
    /// Creates a transport for a single delivery
    pub fn new(config: &SendGridConfig, api_key: &str) -> Result<Self, MailerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/v3/mail/send", config.api_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }

    /// Sends the message. Any non-success status is returned as
    /// [`MailerError::Rejected`].
    pub async fn send(&self, message: &Message) -> Result<(), MailerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&MailSendRequest::new(message))
            .send()
            .await?;

        let status = response.status();

        debug!(status = status.as_u16(), "SendGrid web API responded");

        if !status.is_success() {
            return Err(rejection(status.as_u16(), response.text().await));
        }

        Ok(())
    }
}

/// A rejection carrying the response body, or the reason it could not be read
fn rejection<E: fmt::Display>(status: u16, body: Result<String, E>) -> MailerError {
    let body = body.unwrap_or_else(|err| format!("failed to read response body: {}", err));

    MailerError::Rejected { status, body }
}

impl fmt::Debug for WebApiTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebApiTransport")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"********")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, to_value};
    use testresult::TestResult;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::domain::communication::email_addresses::EmailAddress;

    use super::*;

    fn message(receivers: &[&str]) -> Message {
        Message::new(
            EmailAddress::new_unchecked("a@x.com"),
            Some("Disk".to_string()),
            receivers
                .iter()
                .map(|receiver| EmailAddress::new_unchecked(receiver))
                .collect(),
        )
    }

    fn config(api_url: &str) -> SendGridConfig {
        SendGridConfig {
            api_url: api_url.to_string(),
            ..SendGridConfig::default()
        }
    }

    #[test]
    fn test_plain_request_body() -> TestResult {
        let mut message = message(&["b@x.com", "c@x.com"]);
        message.plain_body = Some("Alert: disk full".to_string());

        assert_eq!(
            to_value(MailSendRequest::new(&message))?,
            json!({
                "personalizations": [{ "to": [{ "email": "b@x.com" }, { "email": "c@x.com" }] }],
                "from": { "email": "a@x.com" },
                "subject": "Disk",
                "content": [{ "type": "text/plain", "value": "Alert: disk full" }],
            })
        );

        Ok(())
    }

    #[test]
    fn test_templated_request_body() -> TestResult {
        let mut message = message(&["b@x.com", "c@x.com"]);
        message.subject = None;
        message.plain_body = Some(" ".to_string());
        message.html_body = Some("<p></p>".to_string());
        message.enable_template_engine(Some("tpl-1".to_string()));
        message.add_substitution("-name-", vec!["Ann".to_string(), "Bob".to_string()]);
        message.add_substitution("-site-", vec!["x.com".to_string()]);

        assert_eq!(
            to_value(MailSendRequest::new(&message))?,
            json!({
                "personalizations": [
                    {
                        "to": [{ "email": "b@x.com" }],
                        "substitutions": { "-name-": "Ann", "-site-": "x.com" },
                    },
                    {
                        "to": [{ "email": "c@x.com" }],
                        "substitutions": { "-name-": "Bob" },
                    },
                ],
                "from": { "email": "a@x.com" },
                "content": [
                    { "type": "text/plain", "value": " " },
                    { "type": "text/html", "value": "<p></p>" },
                ],
                "template_id": "tpl-1",
            })
        );

        Ok(())
    }

    #[test]
    fn test_later_substitution_for_same_tag_wins() -> TestResult {
        let mut message = message(&["b@x.com"]);
        message.add_substitution("-name-", vec!["Ann".to_string()]);
        message.add_substitution("-name-", vec!["Bob".to_string()]);

        let body = to_value(MailSendRequest::new(&message))?;

        assert_eq!(
            body["personalizations"][0]["substitutions"],
            json!({ "-name-": "Bob" })
        );

        Ok(())
    }

    #[test]
    fn test_rejection_keeps_status_when_body_is_unreadable() {
        let err = rejection(502, Err::<String, _>("connection reset"));

        assert!(matches!(
            err,
            MailerError::Rejected { status: 502, ref body }
                if body == "failed to read response body: connection reset"
        ));
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() -> TestResult {
        let transport = WebApiTransport::new(&config("http://localhost:1234/"), "SG.key")?;

        assert_eq!(transport.endpoint, "http://localhost:1234/v3/mail/send");

        Ok(())
    }

    #[test]
    fn test_debug_hides_api_key() -> TestResult {
        let transport = WebApiTransport::new(&config("http://localhost"), "SG.secret")?;

        assert!(!format!("{:?}", transport).contains("SG.secret"));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_posts_json_with_bearer_token() -> TestResult {
        let server = MockServer::start().await;

        let mut message = message(&["b@x.com"]);
        message.html_body = Some("<b>hi</b>".to_string());

        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .and(header("authorization", "Bearer SG.key"))
            .and(body_json(json!({
                "personalizations": [{ "to": [{ "email": "b@x.com" }] }],
                "from": { "email": "a@x.com" },
                "subject": "Disk",
                "content": [{ "type": "text/html", "value": "<b>hi</b>" }],
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        WebApiTransport::new(&config(&server.uri()), "SG.key")?
            .send(&message)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_send_returns_rejection_with_status_and_body() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"errors":[{"message":"bad"}]}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = WebApiTransport::new(&config(&server.uri()), "SG.key")?
            .send(&message(&["b@x.com"]))
            .await;

        assert!(matches!(
            result,
            Err(MailerError::Rejected { status: 400, ref body }) if body.contains("bad")
        ));

        Ok(())
    }
}
