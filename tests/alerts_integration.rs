//! Integration tests for POST /api/enviar-alerta: event logging, recipient
//! resolution, message composition and per-recipient delivery reporting.

mod common;

use alarma_server::entities::{alarm_event, AlarmEvent};
use axum::http::{Method, StatusCode};
use common::{create_test_app, json_request, parse_response_body, TestApp, SENDER};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use tower::ServiceExt;

async fn post(app: &TestApp, uri: &str, body: serde_json::Value) -> serde_json::Value {
    let response = app
        .router
        .clone()
        .oneshot(json_request(Method::POST, uri, body))
        .await
        .unwrap();
    assert!(
        response.status().is_success(),
        "POST {} failed with {}",
        uri,
        response.status()
    );
    parse_response_body(response).await
}

async fn save_profile(app: &TestApp, phone: &str) {
    post(
        app,
        "/api/usuario",
        json!({
            "nombre": "Ana",
            "apellido": "García",
            "email": "ana@example.com",
            "telefono": phone
        }),
    )
    .await;
}

async fn configure_contact(app: &TestApp, phone: &str, method: &str) -> i64 {
    let created = post(
        app,
        "/api/contactos",
        json!({"nombre": "Vecino", "telefono": phone}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    post(
        app,
        "/api/configuracion-alarma",
        json!({"metodo_notificacion": method, "contacto_emergencia_id": id}),
    )
    .await;
    id
}

#[tokio::test]
async fn test_alert_without_recipients_is_recorded_only() {
    let app = create_test_app().await;

    let body = post(&app, "/api/enviar-alerta", json!({})).await;

    assert_eq!(
        body,
        json!({"mensaje": "Alerta recibida y registrada, pero no hay teléfonos para notificar."})
    );
    assert!(app.transport.sent().is_empty());

    let events = AlarmEvent::find().all(&app.db).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, alarm_event::INTRUSION);
    assert_eq!(
        events[0].description.as_deref(),
        Some("Alerta generada por el ESP32.")
    );
}

#[tokio::test]
async fn test_alert_without_body_uses_defaults() {
    let app = create_test_app().await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/enviar-alerta")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(AlarmEvent::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_long_device_fields_are_logged_verbatim() {
    let app = create_test_app().await;
    let evento = "sensor_".repeat(20);
    let descripcion = "Movimiento detectado. ".repeat(40);

    post(
        &app,
        "/api/enviar-alerta",
        json!({"evento": evento, "descripcion": descripcion}),
    )
    .await;

    let events = AlarmEvent::find().all(&app.db).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, evento);
    assert_eq!(events[0].description.as_deref(), Some(descripcion.as_str()));
}

#[tokio::test]
async fn test_shared_phone_is_notified_once() {
    let app = create_test_app().await;
    save_profile(&app, "+111").await;
    configure_contact(&app, "+111", "SMS").await;

    let body = post(&app, "/api/enviar-alerta", json!({})).await;

    assert_eq!(
        body["mensaje"],
        "Alerta recibida, registrada y notificaciones enviadas."
    );
    let sent = app.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "+111");
    assert_eq!(sent[0].from, SENDER);
    assert_eq!(sent[0].body, "¡Alerta de intrusión detectada!");
    assert_eq!(body["detalle_envio"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_whatsapp_alert_prefixes_addresses() {
    let app = create_test_app().await;
    save_profile(&app, "+111").await;
    configure_contact(&app, "+222", "WhatsApp").await;

    post(&app, "/api/enviar-alerta", json!({"evento": "intrusion"})).await;

    let sent = app.transport.sent();
    let targets: Vec<&str> = sent.iter().map(|m| m.to.as_str()).collect();
    assert_eq!(targets, vec!["whatsapp:+111", "whatsapp:+222"]);
    assert!(sent.iter().all(|m| m.from == format!("whatsapp:{}", SENDER)));
}

#[tokio::test]
async fn test_custom_message_and_description_are_combined() {
    let app = create_test_app().await;
    save_profile(&app, "+111").await;
    post(
        &app,
        "/api/configuracion-alarma",
        json!({"mensaje_personalizado": "Intruso en casa"}),
    )
    .await;

    post(
        &app,
        "/api/enviar-alerta",
        json!({"evento": "movimiento", "descripcion": "Sensor del pasillo"}),
    )
    .await;

    let sent = app.transport.sent();
    assert_eq!(sent[0].body, "Intruso en casa Descripción: Sensor del pasillo");

    let events = AlarmEvent::find().all(&app.db).await.unwrap();
    assert_eq!(events[0].event_type, "movimiento");
}

#[tokio::test]
async fn test_failed_delivery_does_not_affect_other_recipients() {
    let app = create_test_app().await;
    save_profile(&app, "+111").await;
    configure_contact(&app, "+222", "SMS").await;
    app.transport.fail_for("+111");

    let body = post(&app, "/api/enviar-alerta", json!({})).await;

    let details: Vec<&str> = body["detalle_envio"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert_eq!(details.len(), 2);
    assert!(details[0].starts_with("Error al enviar mensaje a +111:"));
    assert!(details[1].starts_with("Mensaje enviado a +222 (SID: SM"));
    assert_eq!(app.transport.sent().len(), 2);
    assert_eq!(AlarmEvent::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_deleted_emergency_contact_is_skipped() {
    let app = create_test_app().await;
    let contact_id = configure_contact(&app, "+222", "SMS").await;

    let response = app
        .router
        .clone()
        .oneshot(common::delete_request(&format!(
            "/api/contactos/{}",
            contact_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = post(&app, "/api/enviar-alerta", json!({})).await;

    assert!(body.get("detalle_envio").is_none());
    assert!(app.transport.sent().is_empty());
}
