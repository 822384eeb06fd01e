use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the only alarm configuration row.
pub const SINGLETON_ID: i32 = 1;

pub const DEFAULT_MESSAGE: &str = "¡Alerta de intrusión detectada!";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "alarm_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub custom_message: String,
    /// "SMS" or "WhatsApp"
    pub notification_method: String,
    /// Weak reference: the contact may have been deleted since it was set.
    pub emergency_contact_id: Option<i32>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
