use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::entities::{AlarmEvent, EmergencyContact};
use crate::store;

/// Stored values the gauges start from after a restart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartupGauges {
    pub contacts: u64,
    pub events: u64,
    pub armed: bool,
}

impl StartupGauges {
    pub async fn load(db: &DatabaseConnection) -> Self {
        Self {
            contacts: EmergencyContact::find().count(db).await.unwrap_or(0),
            events: AlarmEvent::find().count(db).await.unwrap_or(0),
            armed: store::alarm_state(db).await.map(|s| s.armed).unwrap_or(false),
        }
    }

    pub fn publish(&self) {
        metrics::gauge!("alarma_emergency_contacts_total").set(self.contacts as f64);
        metrics::gauge!("alarma_event_log_size").set(self.events as f64);
        set_armed(self.armed);
    }
}

pub async fn init_metrics(db: &DatabaseConnection) {
    let gauges = StartupGauges::load(db).await;
    gauges.publish();

    tracing::info!(
        "Initialized metrics: Contacts={}, Events={}, Armed={}",
        gauges.contacts,
        gauges.events,
        gauges.armed
    );
}

pub fn set_armed(armed: bool) {
    metrics::gauge!("alarma_armed").set(if armed { 1.0 } else { 0.0 });
}

pub fn contact_added() {
    metrics::gauge!("alarma_emergency_contacts_total").increment(1.0);
}

pub fn contact_removed() {
    metrics::gauge!("alarma_emergency_contacts_total").decrement(1.0);
}

pub fn increment_alerts_received(event_type: &str) {
    metrics::counter!("alarma_alerts_received_total", "event_type" => event_type.to_string())
        .increment(1);
}

pub fn increment_notifications_sent(channel: &str) {
    metrics::counter!("alarma_notifications_sent_total", "channel" => channel.to_string())
        .increment(1);
}

pub fn increment_notifications_failed(channel: &str) {
    metrics::counter!("alarma_notifications_failed_total", "channel" => channel.to_string())
        .increment(1);
}
