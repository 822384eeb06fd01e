use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use super::ApiJson;
use crate::alarm::AlarmService;
use crate::error::{AppError, AppResult};

#[derive(serde::Deserialize)]
pub struct SetStateRequest {
    estado: Option<bool>,
}

// GET /api/estado-alarma
pub async fn get_state(Extension(service): Extension<AlarmService>) -> AppResult<impl IntoResponse> {
    let armed = service.state().await?;
    Ok(Json(json!({ "estado": armed })))
}

// POST /api/estado-alarma
pub async fn set_state(
    Extension(service): Extension<AlarmService>,
    ApiJson(payload): ApiJson<SetStateRequest>,
) -> AppResult<impl IntoResponse> {
    let requested = payload
        .estado
        .ok_or_else(|| AppError::Validation("Datos inválidos".to_string()))?;

    let armed = service.set_state(requested).await?;

    tracing::Span::current()
        .record("table", "alarm_state")
        .record("action", if armed { "arm" } else { "disarm" })
        .record("business_event", "Alarm state updated");

    Ok((
        StatusCode::OK,
        Json(json!({
            "mensaje": "Estado de alarma actualizado correctamente",
            "estado": armed
        })),
    ))
}
