pub mod alarm_config;
pub mod alarm_state;
pub mod alerts;
pub mod emergency_contacts;
pub mod events;
pub mod user;

use axum::{
    extract::FromRequest,
    routing::{get, post, put},
    Extension, Router,
};

use crate::alarm::AlarmService;
use crate::error::AppError;

/// `Json` body whose rejections answer with the API's `{"mensaje"}` error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// JSON API routes with the alarm service attached.
pub fn router(service: AlarmService) -> Router {
    Router::new()
        .route(
            "/api/estado-alarma",
            get(alarm_state::get_state).post(alarm_state::set_state),
        )
        .route("/api/enviar-alerta", post(alerts::send_alert))
        .route("/api/eventos", get(events::list_events))
        .route("/api/usuario", get(user::get_user).post(user::save_user))
        .route(
            "/api/contactos",
            get(emergency_contacts::list_emergency_contacts)
                .post(emergency_contacts::create_emergency_contact),
        )
        .route(
            "/api/contactos/:id",
            put(emergency_contacts::update_emergency_contact)
                .delete(emergency_contacts::delete_emergency_contact),
        )
        .route(
            "/api/configuracion-alarma",
            get(alarm_config::get_config).post(alarm_config::save_config),
        )
        .layer(Extension(service))
}
