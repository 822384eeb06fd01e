use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::alarm::AlarmService;
use crate::entities::alarm_event;
use crate::error::AppResult;

#[derive(Deserialize)]
pub struct EventsQuery {
    pub limite: Option<u64>,
}

#[derive(Serialize)]
pub struct EventResponse {
    pub id: i32,
    pub tipo_evento: String,
    pub descripcion: Option<String>,
    pub timestamp: chrono::NaiveDateTime,
}

impl From<alarm_event::Model> for EventResponse {
    fn from(model: alarm_event::Model) -> Self {
        Self {
            id: model.id,
            tipo_evento: model.event_type,
            descripcion: model.description,
            timestamp: model.timestamp,
        }
    }
}

// GET /api/eventos?limite=N - newest first
pub async fn list_events(
    Extension(service): Extension<AlarmService>,
    Query(query): Query<EventsQuery>,
) -> AppResult<impl IntoResponse> {
    let events = service.recent_events(query.limite).await?;
    let response: Vec<EventResponse> = events.into_iter().map(Into::into).collect();
    Ok(Json(response))
}
