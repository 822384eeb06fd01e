use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::{MessageTransport, TransportError, WHATSAPP_PREFIX};

/// Twilio Messages API transport. Handles both SMS and WhatsApp: the channel
/// is carried in the `whatsapp:` address prefix.
#[derive(Clone)]
pub struct TwilioTransport {
    client: ::twilio::Client,
}

impl TwilioTransport {
    pub fn new(account_sid: &str, auth_token: &str) -> Self {
        Self {
            client: ::twilio::Client::new(account_sid, auth_token),
        }
    }
}

#[async_trait]
impl MessageTransport for TwilioTransport {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<String, TransportError> {
        if from.trim_start_matches(WHATSAPP_PREFIX).is_empty() {
            return Err(TransportError::MissingSender);
        }

        let message = self
            .client
            .send_message(::twilio::OutboundMessage::new(from, to, body))
            .await
            .map_err(|e| TransportError::Provider(e.to_string()))?;

        Ok(message.sid)
    }
}

/// Mock mode: logs the message instead of sending it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl MessageTransport for LogTransport {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<String, TransportError> {
        info!("(Mock) 📱 Would send alert from {} to {}", from, to);
        info!("(Mock) Body: {}", body);
        Ok(format!("MOCK{}", Uuid::new_v4().simple()))
    }
}
