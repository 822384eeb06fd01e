use crate::entities::alarm_config::DEFAULT_MESSAGE;

/// Description used when a device reports an alert without one.
pub const DEFAULT_ALERT_DESCRIPTION: &str = "Alerta generada por el ESP32.";

pub struct AlertTemplates;

impl AlertTemplates {
    /// Alert text: the configured message, followed by the event description
    /// when the device sent one of its own.
    pub fn alert_body(custom_message: Option<&str>, description: &str) -> String {
        let mut body = custom_message.unwrap_or(DEFAULT_MESSAGE).to_string();
        if !description.is_empty() && description != DEFAULT_ALERT_DESCRIPTION {
            body.push_str(&format!(" Descripción: {}", description));
        }
        body
    }

    pub fn delivered_line(phone: &str, sid: &str) -> String {
        format!("Mensaje enviado a {} (SID: {})", phone, sid)
    }

    pub fn failed_line(phone: &str, reason: &str) -> String {
        format!("Error al enviar mensaje a {}: {}", phone, reason)
    }
}
