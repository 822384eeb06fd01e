use axum::{extract::Extension, response::IntoResponse, Json};
use serde::{de, Deserialize, Deserializer};
use serde_json::json;

use super::ApiJson;
use crate::alarm::{AlarmService, ConfigUpdate};
use crate::error::AppResult;

#[derive(Deserialize, Default)]
pub struct SaveConfigRequest {
    pub mensaje_personalizado: Option<String>,
    pub metodo_notificacion: Option<String>,
    /// Absent: unchanged. `null` or `""`: cleared. Number or numeric string: set.
    #[serde(default, deserialize_with = "contact_reference")]
    pub contacto_emergencia_id: Option<Option<i32>>,
}

impl From<SaveConfigRequest> for ConfigUpdate {
    fn from(req: SaveConfigRequest) -> Self {
        Self {
            message: req.mensaje_personalizado,
            method: req.metodo_notificacion,
            contact_id: req.contacto_emergencia_id,
        }
    }
}

// HTML selects post the id as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawContactRef {
    Id(i32),
    Text(String),
}

fn contact_reference<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Option::<RawContactRef>::deserialize(deserializer)? {
        None => None,
        Some(RawContactRef::Id(id)) => Some(id),
        Some(RawContactRef::Text(text)) if text.trim().is_empty() => None,
        Some(RawContactRef::Text(text)) => Some(text.trim().parse::<i32>().map_err(|_| {
            <D::Error as de::Error>::custom(format!("invalid contacto_emergencia_id: {}", text))
        })?),
    };
    Ok(Some(id))
}

// GET /api/configuracion-alarma
pub async fn get_config(Extension(service): Extension<AlarmService>) -> AppResult<impl IntoResponse> {
    let config = service.config().await?;
    Ok(Json(json!({
        "mensaje_personalizado": config.message,
        "metodo_notificacion": config.method.as_str(),
        "contacto_emergencia_id": config.contact_id,
        "contacto_emergencia_nombre": config.contact_name,
    })))
}

// POST /api/configuracion-alarma - partial update
pub async fn save_config(
    Extension(service): Extension<AlarmService>,
    ApiJson(payload): ApiJson<SaveConfigRequest>,
) -> AppResult<impl IntoResponse> {
    service.update_config(payload.into()).await?;

    tracing::Span::current()
        .record("table", "alarm_config")
        .record("action", "save_config");

    Ok(Json(json!({"mensaje": "Configuración de alarma guardada correctamente"})))
}
