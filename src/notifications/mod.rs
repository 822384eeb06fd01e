pub mod templates;
pub mod twilio;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::TwilioConfig;

pub use self::templates::AlertTemplates;
pub use self::twilio::{LogTransport, TwilioTransport};

pub const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Delivery channel for alert messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    #[default]
    #[serde(rename = "SMS")]
    Sms,
    #[serde(rename = "WhatsApp")]
    WhatsApp,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "SMS",
            Channel::WhatsApp => "WhatsApp",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("sms") {
            Some(Channel::Sms)
        } else if value.eq_ignore_ascii_case("whatsapp") {
            Some(Channel::WhatsApp)
        } else {
            None
        }
    }

    /// Channel stored in the configuration row. Anything unrecognised is SMS.
    pub fn from_stored(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    /// Address in the form the transport expects for this channel.
    pub fn address(&self, phone: &str) -> String {
        match self {
            Channel::Sms => phone.to_string(),
            Channel::WhatsApp => format!("{}{}", WHATSAPP_PREFIX, phone),
        }
    }

    fn metric_label(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::WhatsApp => "whatsapp",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipient {
    pub phone: String,
    pub channel: Channel,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("TWILIO_PHONE_NUMBER not set")]
    MissingSender,

    #[error("Twilio Error: {0}")]
    Provider(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered { sid: String },
    Failed { reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub phone: String,
    pub channel: Channel,
    pub status: DeliveryStatus,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered { .. })
    }

    /// One line of the dispatch report shown to API callers.
    pub fn detail(&self) -> String {
        match &self.status {
            DeliveryStatus::Delivered { sid } => AlertTemplates::delivered_line(&self.phone, sid),
            DeliveryStatus::Failed { reason } => AlertTemplates::failed_line(&self.phone, reason),
        }
    }
}

/// Outbound message provider. Returns the provider's message id.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<String, TransportError>;
}

/// Sends one message body to a set of recipients through a transport.
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MessageTransport>,
    sender: String,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MessageTransport>, sender: impl Into<String>) -> Self {
        Self {
            transport,
            sender: sender.into(),
        }
    }

    /// Twilio when credentials are configured, otherwise log-only delivery.
    pub fn from_config(config: &TwilioConfig) -> Self {
        let transport: Arc<dyn MessageTransport> =
            match (&config.account_sid, &config.auth_token) {
                (Some(sid), Some(token)) => Arc::new(TwilioTransport::new(sid, token)),
                _ => {
                    warn!("⚠️ Twilio credentials not found. Alert notifications will be mocked.");
                    Arc::new(LogTransport)
                }
            };

        if config.phone_number.is_empty() {
            warn!("⚠️ TWILIO_PHONE_NUMBER not set. Outbound alerts have no sender.");
        }

        Self::new(transport, config.phone_number.clone())
    }

    /// Delivers `body` to every recipient. One transport call per recipient;
    /// a failure is recorded in that recipient's outcome and does not stop
    /// the others. Outcomes are returned in recipient order.
    pub async fn send(&self, recipients: &[Recipient], body: &str) -> Vec<DeliveryOutcome> {
        join_all(recipients.iter().map(|r| self.deliver(r, body))).await
    }

    async fn deliver(&self, recipient: &Recipient, body: &str) -> DeliveryOutcome {
        let from = recipient.channel.address(&self.sender);
        let to = recipient.channel.address(&recipient.phone);

        let status = match self.transport.send(&from, &to, body).await {
            Ok(sid) => {
                info!(
                    "✅ Alert sent to {} via {} (SID: {})",
                    recipient.phone,
                    recipient.channel.as_str(),
                    sid
                );
                crate::metrics::increment_notifications_sent(recipient.channel.metric_label());
                DeliveryStatus::Delivered { sid }
            }
            Err(e) => {
                error!("❌ Failed to send alert to {}: {}", recipient.phone, e);
                crate::metrics::increment_notifications_failed(recipient.channel.metric_label());
                DeliveryStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        DeliveryOutcome {
            phone: recipient.phone.clone(),
            channel: recipient.channel,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedTransport {
        calls: Mutex<Vec<(String, String, String)>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl MessageTransport for ScriptedTransport {
        async fn send(&self, from: &str, to: &str, body: &str) -> Result<String, TransportError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((from.to_string(), to.to_string(), body.to_string()));
            if self.fail_for.as_deref() == Some(to) {
                return Err(TransportError::Provider("unreachable handset".into()));
            }
            Ok(format!("SM{}", calls.len()))
        }
    }

    fn sms(phone: &str) -> Recipient {
        Recipient {
            phone: phone.to_string(),
            channel: Channel::Sms,
        }
    }

    #[test]
    fn channel_parsing_is_case_insensitive() {
        assert_eq!(Channel::parse("WhatsApp"), Some(Channel::WhatsApp));
        assert_eq!(Channel::parse("whatsapp"), Some(Channel::WhatsApp));
        assert_eq!(Channel::parse("SMS"), Some(Channel::Sms));
        assert_eq!(Channel::parse("telegram"), None);
        assert_eq!(Channel::from_stored("telegram"), Channel::Sms);
    }

    #[tokio::test]
    async fn whatsapp_prefixes_sender_and_recipient() {
        let transport = Arc::new(ScriptedTransport::default());
        let notifier = Notifier::new(transport.clone(), "+15550000");

        let outcomes = notifier
            .send(
                &[Recipient {
                    phone: "+34600111222".into(),
                    channel: Channel::WhatsApp,
                }],
                "hola",
            )
            .await;

        assert!(outcomes[0].is_delivered());
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].0, "whatsapp:+15550000");
        assert_eq!(calls[0].1, "whatsapp:+34600111222");
        assert_eq!(calls[0].2, "hola");
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_other_recipients() {
        let transport = Arc::new(ScriptedTransport {
            fail_for: Some("+222".into()),
            ..Default::default()
        });
        let notifier = Notifier::new(transport.clone(), "+1000");

        let outcomes = notifier
            .send(&[sms("+111"), sms("+222"), sms("+333")], "alerta")
            .await;

        assert_eq!(transport.calls.lock().unwrap().len(), 3);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_delivered());
        assert!(!outcomes[1].is_delivered());
        assert!(outcomes[2].is_delivered());
        assert_eq!(
            outcomes[1].detail(),
            "Error al enviar mensaje a +222: Twilio Error: unreachable handset"
        );
        assert!(outcomes[2].detail().starts_with("Mensaje enviado a +333 (SID: SM"));
    }
}
