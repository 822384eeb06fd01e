use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::alarm::{AlarmService, AlertReport};
use crate::error::AppResult;

#[derive(Deserialize, Default)]
pub struct AlertRequest {
    pub evento: Option<String>,
    pub descripcion: Option<String>,
}

#[derive(Serialize)]
pub struct AlertResponse {
    pub mensaje: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalle_envio: Option<Vec<String>>,
}

impl From<AlertReport> for AlertResponse {
    fn from(report: AlertReport) -> Self {
        match report {
            AlertReport::RecordedOnly => Self {
                mensaje: "Alerta recibida y registrada, pero no hay teléfonos para notificar.",
                detalle_envio: None,
            },
            AlertReport::Dispatched(outcomes) => Self {
                mensaje: "Alerta recibida, registrada y notificaciones enviadas.",
                detalle_envio: Some(outcomes.iter().map(|o| o.detail()).collect()),
            },
        }
    }
}

// POST /api/enviar-alerta
// Called by the sensor device. A missing or unreadable body is treated as a
// default intrusion alert. Always 200 once the event is stored.
pub async fn send_alert(
    Extension(service): Extension<AlarmService>,
    payload: Option<Json<AlertRequest>>,
) -> AppResult<impl IntoResponse> {
    let AlertRequest { evento, descripcion } = payload.map(|Json(p)| p).unwrap_or_default();

    let report = service.report_alert(evento, descripcion).await?;

    if let AlertReport::Dispatched(outcomes) = &report {
        let failed = outcomes.iter().filter(|o| !o.is_delivered()).count();
        tracing::Span::current()
            .record("table", "alarm_events")
            .record("action", "dispatch_alert")
            .record(
                "business_event",
                tracing::field::display(format!(
                    "Alert dispatched to {} recipients ({} failed)",
                    outcomes.len(),
                    failed
                )),
            );
    }

    Ok((StatusCode::OK, Json(AlertResponse::from(report))))
}
