//! Alarm workflow: arm/disarm, alert intake and notification, and the
//! profile, contact and configuration records the alerts are routed with.

use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set};
use tracing::{info, warn};

use crate::entities::{alarm_config, alarm_event, emergency_contact, user_profile};
use crate::error::{AppError, AppResult};
use crate::notifications::{
    templates::DEFAULT_ALERT_DESCRIPTION, AlertTemplates, Channel, DeliveryOutcome, Notifier,
    Recipient,
};
use crate::store;

pub const DEFAULT_EVENT_LIMIT: u64 = 50;
pub const MAX_EVENT_LIMIT: u64 = 500;

/// Fields of a profile save. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub message: Option<String>,
    pub method: Option<String>,
    /// `None` leaves the reference alone, `Some(None)` clears it.
    pub contact_id: Option<Option<i32>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigView {
    pub message: String,
    pub method: Channel,
    pub contact_id: Option<i32>,
    /// Resolved on every read; `None` when unset or the contact is gone.
    pub contact_name: Option<String>,
}

/// What happened to an inbound alert after it was logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertReport {
    /// Logged, but there was nobody to notify.
    RecordedOnly,
    Dispatched(Vec<DeliveryOutcome>),
}

#[derive(Clone)]
pub struct AlarmService {
    db: DatabaseConnection,
    notifier: Notifier,
}

impl AlarmService {
    pub fn new(db: DatabaseConnection, notifier: Notifier) -> Self {
        Self { db, notifier }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Creates the singleton rows if this is a fresh database.
    pub async fn ensure_singletons(&self) -> AppResult<()> {
        store::alarm_state(&self.db).await?;
        store::alarm_config(&self.db).await?;
        Ok(())
    }

    pub async fn state(&self) -> AppResult<bool> {
        Ok(store::alarm_state(&self.db).await?.armed)
    }

    /// Unconditional overwrite. Every call appends an event, including
    /// repeats of the current state.
    pub async fn set_state(&self, armed: bool) -> AppResult<bool> {
        let mut state = store::alarm_state(&self.db).await?.into_active_model();
        state.armed = Set(armed);
        state.updated_at = Set(chrono::Utc::now().naive_utc());
        let state = state.update(&self.db).await?;

        let (event_type, description) = if state.armed {
            (alarm_event::ACTIVATION, "Alarma activada desde la web.")
        } else {
            (alarm_event::DEACTIVATION, "Alarma desactivada desde la web.")
        };
        store::record_event(&self.db, event_type, Some(description.to_string())).await?;

        info!(
            "Alarm state updated to: {}",
            if state.armed { "ARMED" } else { "DISARMED" }
        );
        crate::metrics::set_armed(state.armed);

        Ok(state.armed)
    }

    /// Logs the alert, then notifies the user and the configured emergency
    /// contact. The event is stored before any delivery is attempted and
    /// regardless of its outcome.
    pub async fn report_alert(
        &self,
        event_type: Option<String>,
        description: Option<String>,
    ) -> AppResult<AlertReport> {
        let event_type = event_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| alarm_event::INTRUSION.to_string());
        let description = description.unwrap_or_else(|| DEFAULT_ALERT_DESCRIPTION.to_string());

        store::record_event(&self.db, &event_type, Some(description.clone())).await?;
        crate::metrics::increment_alerts_received(&event_type);
        info!("Alert received: {} - {}", event_type, description);

        let config = store::alarm_config(&self.db).await?;
        let profile = store::user_profile(&self.db).await?;
        let contact = match config.emergency_contact_id {
            Some(id) => store::find_contact(&self.db, id).await?,
            None => None,
        };

        let body = AlertTemplates::alert_body(Some(config.custom_message.as_str()), &description);
        let channel = Channel::from_stored(&config.notification_method);
        let recipients = resolve_recipients(profile.as_ref(), contact.as_ref(), channel);

        if recipients.is_empty() {
            warn!("No phone numbers configured for alerts");
            return Ok(AlertReport::RecordedOnly);
        }

        let outcomes = self.notifier.send(&recipients, &body).await;
        Ok(AlertReport::Dispatched(outcomes))
    }

    pub async fn recent_events(&self, limit: Option<u64>) -> AppResult<Vec<alarm_event::Model>> {
        let limit = limit
            .unwrap_or(DEFAULT_EVENT_LIMIT)
            .clamp(1, MAX_EVENT_LIMIT);
        Ok(store::recent_events(&self.db, limit).await?)
    }

    pub async fn profile(&self) -> AppResult<Option<user_profile::Model>> {
        Ok(store::user_profile(&self.db).await?)
    }

    /// Creates the profile (every field required) or partially overwrites the
    /// existing one.
    pub async fn upsert_profile(&self, update: ProfileUpdate) -> AppResult<()> {
        match store::user_profile(&self.db).await? {
            Some(existing) => {
                let mut profile = existing.into_active_model();
                if let Some(name) = update.name {
                    profile.name = Set(name);
                }
                if let Some(surname) = update.surname {
                    profile.surname = Set(surname);
                }
                if let Some(email) = update.email {
                    profile.email = Set(email);
                }
                if let Some(phone) = update.phone {
                    profile.phone = Set(phone);
                }
                profile.update(&self.db).await?;
                info!("Updated user profile");
            }
            None => {
                let missing: Vec<&str> = [
                    ("nombre", &update.name),
                    ("apellido", &update.surname),
                    ("email", &update.email),
                    ("telefono", &update.phone),
                ]
                .iter()
                .filter(|(_, value)| is_blank(value))
                .map(|(field, _)| *field)
                .collect();

                if !missing.is_empty() {
                    return Err(AppError::Validation(format!(
                        "Faltan campos obligatorios: {}",
                        missing.join(", ")
                    )));
                }

                let profile = user_profile::ActiveModel {
                    name: Set(update.name.unwrap_or_default()),
                    surname: Set(update.surname.unwrap_or_default()),
                    email: Set(update.email.unwrap_or_default()),
                    phone: Set(update.phone.unwrap_or_default()),
                    registered_at: Set(chrono::Utc::now().naive_utc()),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
                info!("Created user profile {}", profile.id);
            }
        }
        Ok(())
    }

    pub async fn contacts(&self) -> AppResult<Vec<emergency_contact::Model>> {
        Ok(store::contacts(&self.db).await?)
    }

    /// Always inserts; two contacts may share a phone number.
    pub async fn add_contact(&self, name: Option<String>, phone: Option<String>) -> AppResult<i32> {
        let (name, phone) = match (name, phone) {
            (Some(name), Some(phone)) if !name.trim().is_empty() && !phone.trim().is_empty() => {
                (name, phone)
            }
            _ => {
                return Err(AppError::Validation(
                    "Nombre y teléfono son obligatorios".to_string(),
                ))
            }
        };

        let contact = emergency_contact::ActiveModel {
            name: Set(name),
            phone: Set(phone),
            added_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created emergency contact: {}", contact.id);
        crate::metrics::contact_added();
        Ok(contact.id)
    }

    /// Omitted fields are kept; supplied ones must not be blank.
    pub async fn update_contact(&self, id: i32, update: ContactUpdate) -> AppResult<()> {
        let supplied_blank = |field: &Option<String>| field.is_some() && is_blank(field);
        if supplied_blank(&update.name) || supplied_blank(&update.phone) {
            return Err(AppError::Validation(
                "Nombre y teléfono son obligatorios".to_string(),
            ));
        }

        let mut contact = store::contact(&self.db, id).await?.into_active_model();
        if let Some(name) = update.name {
            contact.name = Set(name);
        }
        if let Some(phone) = update.phone {
            contact.phone = Set(phone);
        }
        contact.update(&self.db).await?;
        info!("Updated emergency contact: {}", id);
        Ok(())
    }

    /// The configuration keeps pointing at a removed contact; reads resolve
    /// it to nothing.
    pub async fn remove_contact(&self, id: i32) -> AppResult<()> {
        store::delete_contact(&self.db, id).await?;
        info!("Deleted emergency contact: {}", id);
        crate::metrics::contact_removed();
        Ok(())
    }

    pub async fn config(&self) -> AppResult<ConfigView> {
        let config = store::alarm_config(&self.db).await?;
        let contact_name = match config.emergency_contact_id {
            Some(id) => store::find_contact(&self.db, id).await?.map(|c| c.name),
            None => None,
        };

        Ok(ConfigView {
            method: Channel::from_stored(&config.notification_method),
            message: config.custom_message,
            contact_id: config.emergency_contact_id,
            contact_name,
        })
    }

    pub async fn update_config(&self, update: ConfigUpdate) -> AppResult<()> {
        let method = match update.method.as_deref() {
            Some(raw) => Some(Channel::parse(raw).ok_or_else(|| {
                AppError::Validation(
                    "metodo_notificacion debe ser 'SMS' o 'WhatsApp'".to_string(),
                )
            })?),
            None => None,
        };

        if let Some(Some(contact_id)) = update.contact_id {
            store::contact(&self.db, contact_id).await?;
        }

        let mut config: alarm_config::ActiveModel =
            store::alarm_config(&self.db).await?.into_active_model();
        if let Some(message) = update.message {
            config.custom_message = Set(message);
        }
        if let Some(method) = method {
            config.notification_method = Set(method.as_str().to_string());
        }
        if let Some(contact_id) = update.contact_id {
            config.emergency_contact_id = Set(contact_id);
        }
        config.updated_at = Set(chrono::Utc::now().naive_utc());
        config.update(&self.db).await?;

        info!("Alarm configuration saved");
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// The user's phone first, then the emergency contact's unless it is the
/// same number.
pub fn resolve_recipients(
    profile: Option<&user_profile::Model>,
    contact: Option<&emergency_contact::Model>,
    channel: Channel,
) -> Vec<Recipient> {
    let mut phones: Vec<&str> = Vec::with_capacity(2);

    if let Some(profile) = profile.filter(|p| !p.phone.is_empty()) {
        phones.push(&profile.phone);
    }
    if let Some(contact) = contact.filter(|c| !c.phone.is_empty()) {
        if !phones.contains(&contact.phone.as_str()) {
            phones.push(&contact.phone);
        }
    }

    phones
        .into_iter()
        .map(|phone| Recipient {
            phone: phone.to_string(),
            channel,
        })
        .collect()
}
