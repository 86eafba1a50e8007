//! Registration confirmation emails
//!
//! Dispatch goes through the `Notifier` trait. `ResendNotifier` talks to the
//! Resend HTTP API; `LogNotifier` only logs and is used when no API key is
//! configured. Callers treat every failure as non-fatal.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{config::MailConfig, constants::QR_CODE_FILENAME};

/// Everything needed to render and send one confirmation
#[derive(Debug, Clone)]
pub struct ConfirmationEmail {
    pub to: String,
    pub student_name: String,
    pub event_title: String,
    pub check_in_token: String,
    /// PNG bytes of the QR code for `check_in_token`
    pub qr_png: Vec<u8>,
}

impl ConfirmationEmail {
    pub fn subject(&self) -> String {
        format!("Registration Confirmed: {}", self.event_title)
    }

    pub fn html_body(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h1 style="background: #003262; color: white; padding: 20px; text-align: center;">Registration Confirmed!</h1>
      <h2>Hi {name},</h2>
      <p>You're successfully registered for:</p>
      <h3>{title}</h3>
      <p><strong>Your unique check-in code:</strong> {token}</p>
      <p><strong>Your QR code is attached to this email.</strong>
         Save it to your phone and show it at the event for check-in!</p>
    </div>
  </body>
</html>"#,
            name = escape_html(&self.student_name),
            title = escape_html(&self.event_title),
            token = escape_html(&self.check_in_token),
        )
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Notification dispatch errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Email request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Email API rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Sends registration confirmations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_registration_confirmation(
        &self,
        email: &ConfirmationEmail,
    ) -> Result<(), NotifyError>;
}

/// Build the notifier for the given mail settings
pub fn notifier_from_config(config: &MailConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match &config.api_key {
        Some(api_key) => Ok(Arc::new(ResendNotifier::new(config, api_key.clone())?)),
        None => {
            info!("RESEND_API_KEY not set; confirmation emails will only be logged");
            Ok(Arc::new(LogNotifier))
        }
    }
}

#[derive(Debug, Serialize)]
struct ResendAttachment<'a> {
    filename: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    html: String,
    attachments: Vec<ResendAttachment<'a>>,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: Option<String>,
}

/// Resend transactional email API client
#[derive(Debug, Clone)]
pub struct ResendNotifier {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl ResendNotifier {
    pub fn new(config: &MailConfig, api_key: String) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("eventdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", config.api_url.trim_end_matches('/')),
            api_key,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send_registration_confirmation(
        &self,
        email: &ConfirmationEmail,
    ) -> Result<(), NotifyError> {
        let payload = ResendEmail {
            from: &self.from,
            to: [email.to.as_str()],
            subject: email.subject(),
            html: email.html_body(),
            attachments: vec![ResendAttachment {
                filename: QR_CODE_FILENAME,
                content: STANDARD.encode(&email.qr_png),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let sent: ResendResponse = response.json().await?;
        info!(
            to = %email.to,
            email_id = sent.id.as_deref().unwrap_or("unknown"),
            "Confirmation email sent"
        );
        Ok(())
    }
}

/// Logs confirmations instead of sending them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_registration_confirmation(
        &self,
        email: &ConfirmationEmail,
    ) -> Result<(), NotifyError> {
        info!(
            to = %email.to,
            subject = %email.subject(),
            check_in_token = %email.check_in_token,
            "Confirmation email (not sent, no mail API configured)"
        );
        debug!(qr_png_bytes = email.qr_png.len(), "QR attachment rendered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> ConfirmationEmail {
        ConfirmationEmail {
            to: "ada@torontomu.ca".to_string(),
            student_name: "Ada <Lovelace>".to_string(),
            event_title: "Hack & Tell".to_string(),
            check_in_token: "0123456789abcdef0123456789abcdef".to_string(),
            qr_png: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_subject_names_event() {
        assert_eq!(email().subject(), "Registration Confirmed: Hack & Tell");
    }

    #[test]
    fn test_html_body_is_escaped_and_carries_token() {
        let html = email().html_body();
        assert!(html.contains("Ada &lt;Lovelace&gt;"));
        assert!(html.contains("Hack &amp; Tell"));
        assert!(html.contains("0123456789abcdef0123456789abcdef"));
        assert!(!html.contains("<Lovelace>"));
    }

    #[test]
    fn test_resend_payload_shape() {
        let email = email();
        let payload = ResendEmail {
            from: "Events <events@example.com>",
            to: [email.to.as_str()],
            subject: email.subject(),
            html: email.html_body(),
            attachments: vec![ResendAttachment {
                filename: QR_CODE_FILENAME,
                content: STANDARD.encode(&email.qr_png),
            }],
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["to"][0], "ada@torontomu.ca");
        assert_eq!(json["attachments"][0]["filename"], "qr-code.png");
        assert_eq!(json["attachments"][0]["content"], "AQID");
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        assert!(LogNotifier.send_registration_confirmation(&email()).await.is_ok());
    }

    #[test]
    fn test_notifier_from_config_without_key() {
        let config = crate::config::test_config().mail;
        assert!(notifier_from_config(&config).is_ok());
    }
}
