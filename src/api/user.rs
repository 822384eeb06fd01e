use axum::{extract::Extension, response::IntoResponse, Json};
use serde_json::json;

use super::ApiJson;
use crate::alarm::{AlarmService, ProfileUpdate};
use crate::error::{AppError, AppResult};

#[derive(serde::Deserialize)]
pub struct SaveUserRequest {
    nombre: Option<String>,
    apellido: Option<String>,
    email: Option<String>,
    telefono: Option<String>,
}

impl From<SaveUserRequest> for ProfileUpdate {
    fn from(req: SaveUserRequest) -> Self {
        Self {
            name: req.nombre,
            surname: req.apellido,
            email: req.email,
            phone: req.telefono,
        }
    }
}

// GET /api/usuario
pub async fn get_user(Extension(service): Extension<AlarmService>) -> AppResult<impl IntoResponse> {
    let user = service
        .profile()
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no configurado".to_string()))?;

    Ok(Json(json!({
        "nombre": user.name,
        "apellido": user.surname,
        "email": user.email,
        "telefono": user.phone,
        "fecha_registro": user.registered_at,
    })))
}

// POST /api/usuario - creates the profile or updates the supplied fields
pub async fn save_user(
    Extension(service): Extension<AlarmService>,
    ApiJson(payload): ApiJson<SaveUserRequest>,
) -> AppResult<impl IntoResponse> {
    service.upsert_profile(payload.into()).await?;

    tracing::Span::current()
        .record("table", "user_profile")
        .record("action", "save_profile");

    Ok(Json(json!({"mensaje": "Datos de usuario guardados correctamente"})))
}
