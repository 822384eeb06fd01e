//! Typed access to the alarm tables.
//!
//! The alarm state and alarm configuration tables each hold exactly one row.
//! They are reached through [`alarm_state`] and [`alarm_config`], which create
//! the default row on first access instead of failing.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect, Set,
};
use tracing::{debug, info};

use crate::entities::{
    alarm_config, alarm_event, alarm_state, emergency_contact, prelude::*, user_profile,
};
use crate::error::{AppError, AppResult};

pub const CONTACT_NOT_FOUND: &str = "Contacto no encontrado";

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// The alarm state row, created disarmed if it does not exist yet.
pub async fn alarm_state(db: &DatabaseConnection) -> Result<alarm_state::Model, DbErr> {
    if let Some(state) = AlarmState::find_by_id(alarm_state::SINGLETON_ID)
        .one(db)
        .await?
    {
        return Ok(state);
    }

    let fresh = alarm_state::ActiveModel {
        id: Set(alarm_state::SINGLETON_ID),
        armed: Set(false),
        updated_at: Set(now()),
    };

    match fresh.insert(db).await {
        Ok(state) => {
            info!("Created default alarm state");
            Ok(state)
        }
        // Lost the race against a concurrent creator: read its row.
        Err(e) => AlarmState::find_by_id(alarm_state::SINGLETON_ID)
            .one(db)
            .await?
            .ok_or(e),
    }
}

/// The alarm configuration row, created with defaults if it does not exist yet.
pub async fn alarm_config(db: &DatabaseConnection) -> Result<alarm_config::Model, DbErr> {
    if let Some(config) = AlarmConfig::find_by_id(alarm_config::SINGLETON_ID)
        .one(db)
        .await?
    {
        return Ok(config);
    }

    let fresh = alarm_config::ActiveModel {
        id: Set(alarm_config::SINGLETON_ID),
        custom_message: Set(alarm_config::DEFAULT_MESSAGE.to_string()),
        notification_method: Set(crate::notifications::Channel::default().as_str().to_string()),
        emergency_contact_id: Set(None),
        updated_at: Set(now()),
    };

    match fresh.insert(db).await {
        Ok(config) => {
            info!("Created default alarm configuration");
            Ok(config)
        }
        Err(e) => AlarmConfig::find_by_id(alarm_config::SINGLETON_ID)
            .one(db)
            .await?
            .ok_or(e),
    }
}

/// The single user profile, if one has been saved.
pub async fn user_profile(db: &DatabaseConnection) -> Result<Option<user_profile::Model>, DbErr> {
    UserProfile::find()
        .order_by_asc(user_profile::Column::Id)
        .one(db)
        .await
}

pub async fn contacts(db: &DatabaseConnection) -> Result<Vec<emergency_contact::Model>, DbErr> {
    EmergencyContact::find()
        .order_by_asc(emergency_contact::Column::Id)
        .all(db)
        .await
}

/// Lookup that tolerates a missing contact.
pub async fn find_contact(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<emergency_contact::Model>, DbErr> {
    EmergencyContact::find_by_id(id).one(db).await
}

pub async fn contact(db: &DatabaseConnection, id: i32) -> AppResult<emergency_contact::Model> {
    find_contact(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(CONTACT_NOT_FOUND.to_string()))
}

pub async fn delete_contact(db: &DatabaseConnection, id: i32) -> AppResult<()> {
    let res = EmergencyContact::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound(CONTACT_NOT_FOUND.to_string()));
    }
    Ok(())
}

/// Appends one entry to the event log.
pub async fn record_event(
    db: &DatabaseConnection,
    event_type: &str,
    description: Option<String>,
) -> Result<alarm_event::Model, DbErr> {
    let event = alarm_event::ActiveModel {
        event_type: Set(event_type.to_string()),
        description: Set(description),
        timestamp: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!("Recorded alarm event {} ({})", event.id, event.event_type);
    metrics::counter!("alarma_events_total", "event_type" => event.event_type.clone())
        .increment(1);

    Ok(event)
}

/// Newest events first.
pub async fn recent_events(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<alarm_event::Model>, DbErr> {
    AlarmEvent::find()
        .order_by_desc(alarm_event::Column::Timestamp)
        .order_by_desc(alarm_event::Column::Id)
        .limit(limit)
        .all(db)
        .await
}
