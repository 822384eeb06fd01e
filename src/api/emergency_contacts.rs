use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ApiJson;
use crate::alarm::{AlarmService, ContactUpdate};
use crate::entities::emergency_contact;
use crate::error::AppResult;

#[derive(Deserialize)]
pub struct CreateEmergencyContactRequest {
    pub nombre: Option<String>,
    pub telefono: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateEmergencyContactRequest {
    pub nombre: Option<String>,
    pub telefono: Option<String>,
}

#[derive(Serialize)]
pub struct EmergencyContactResponse {
    pub id: i32,
    pub nombre: String,
    pub telefono: String,
}

impl From<emergency_contact::Model> for EmergencyContactResponse {
    fn from(model: emergency_contact::Model) -> Self {
        Self {
            id: model.id,
            nombre: model.name,
            telefono: model.phone,
        }
    }
}

// GET /api/contactos
pub async fn list_emergency_contacts(
    Extension(service): Extension<AlarmService>,
) -> AppResult<impl IntoResponse> {
    let contacts = service.contacts().await?;
    let response: Vec<EmergencyContactResponse> =
        contacts.into_iter().map(|c| c.into()).collect();
    Ok(Json(response))
}

// POST /api/contactos
pub async fn create_emergency_contact(
    Extension(service): Extension<AlarmService>,
    ApiJson(payload): ApiJson<CreateEmergencyContactRequest>,
) -> AppResult<impl IntoResponse> {
    let id = service.add_contact(payload.nombre, payload.telefono).await?;

    tracing::Span::current()
        .record("table", "emergency_contacts")
        .record("action", "create_contact");

    Ok((
        StatusCode::CREATED,
        Json(json!({"mensaje": "Contacto agregado correctamente", "id": id})),
    ))
}

// PUT /api/contactos/:id
pub async fn update_emergency_contact(
    Extension(service): Extension<AlarmService>,
    Path(contact_id): Path<i32>,
    ApiJson(payload): ApiJson<UpdateEmergencyContactRequest>,
) -> AppResult<impl IntoResponse> {
    service
        .update_contact(
            contact_id,
            ContactUpdate {
                name: payload.nombre,
                phone: payload.telefono,
            },
        )
        .await?;

    Ok(Json(json!({"mensaje": "Contacto actualizado correctamente"})))
}

// DELETE /api/contactos/:id
pub async fn delete_emergency_contact(
    Extension(service): Extension<AlarmService>,
    Path(contact_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    service.remove_contact(contact_id).await?;

    tracing::Span::current()
        .record("table", "emergency_contacts")
        .record("action", "delete_contact");

    Ok(Json(json!({"mensaje": "Contacto eliminado correctamente"})))
}
