// libs/notification-cell/src/services/transport.rs
use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{EventKind, NotificationError, OutboundMail};

/// Outbound mail delivery. Rendering is the provider's concern; the
/// transport only hands over the template identifier and named fields.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotificationError>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

// SendGrid v3 dynamic-template request structures

#[derive(Debug, Serialize)]
struct SendGridRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: EmailAddress<'a>,
    subject: &'a str,
    template_id: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<EmailAddress<'a>>,
    dynamic_template_data: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct EmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

pub struct SendGridTransport {
    client: Client,
    api_url: String,
    api_key: String,
    from_email: String,
    from_name: String,
    appointment_template_id: String,
    referral_template_id: String,
}

impl SendGridTransport {
    pub fn new(config: &AppConfig) -> Result<Self, NotificationError> {
        if !config.is_mail_configured() {
            return Err(NotificationError::NotConfigured(
                "MAIL_API_KEY and MAIL_FROM_ADDRESS are required".to_string(),
            ));
        }

        Ok(Self {
            client: Client::new(),
            api_url: config.mail_api_base_url.trim_end_matches('/').to_string(),
            api_key: config.mail_api_key.clone(),
            from_email: config.mail_from_address.clone(),
            from_name: config.mail_from_name.clone(),
            appointment_template_id: config.mail_appointment_template_id.clone(),
            referral_template_id: config.mail_referral_template_id.clone(),
        })
    }

    fn template_id(&self, kind: EventKind) -> &str {
        match kind {
            EventKind::AppointmentScheduled => &self.appointment_template_id,
            EventKind::ReferralCreated => &self.referral_template_id,
        }
    }

    fn transport_error(&self, message: String) -> NotificationError {
        NotificationError::Transport {
            provider: self.name(),
            message,
        }
    }
}

#[async_trait]
impl MailTransport for SendGridTransport {
    /// POST {api_url}/mail/send
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotificationError> {
        let url = format!("{}/mail/send", self.api_url);

        let request = SendGridRequest {
            personalizations: vec![Personalization {
                to: vec![EmailAddress {
                    email: &mail.to,
                    name: None,
                }],
                dynamic_template_data: &mail.fields,
            }],
            from: EmailAddress {
                email: &self.from_email,
                name: Some(self.from_name.as_str()),
            },
            subject: &mail.subject,
            template_id: self.template_id(mail.kind),
        };

        debug!("Sending {} mail through {}", mail.kind, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %response_text, "Mail provider rejected message");
            return Err(self.transport_error(format!("HTTP {}: {}", status, response_text)));
        }

        info!("Mail accepted by {} for {}", self.name(), mail.to);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sendgrid"
    }
}
