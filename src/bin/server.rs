use alarma_server::{
    alarm::AlarmService, api, config::AppConfig, migrator, notifications::Notifier,
};
use axum::{routing::get, Router};
use sea_orm::{Database, DatabaseConnection};

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("invalid configuration");

    alarma_server::telemetry::init_telemetry("alarma-server", &config.telemetry);

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    // Database Connection
    let db: DatabaseConnection = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    use sea_orm_migration::MigratorTrait;
    migrator::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let notifier = Notifier::from_config(&config.twilio);
    let service = AlarmService::new(db.clone(), notifier);
    service
        .ensure_singletons()
        .await
        .expect("Failed to initialise alarm state");

    alarma_server::metrics::init_metrics(&db).await;

    let app = app(service, &config.cors_origin, prometheus_layer, metric_handle);

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down alarm server"),
        Err(err) => tracing::error!("Unable to listen for shutdown signal: {}", err),
    }
}

fn app(
    service: AlarmService,
    cors_origin: &str,
    prometheus_layer: axum_prometheus::PrometheusMetricLayer<'static>,
    metric_handle: metrics_exporter_prometheus::PrometheusHandle,
) -> Router {
    let cors = match cors_origin.parse::<axum::http::HeaderValue>() {
        Ok(origin) => tower_http::cors::CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!("Ignoring invalid CORS_ORIGIN: {}", cors_origin);
            tower_http::cors::CorsLayer::new()
        }
    };

    Router::new()
        .route("/health", get(health_check))
        .merge(api::router(service))
        .layer(prometheus_layer)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    // "METHOD /path", e.g. "POST /api/enviar-alerta"
                    let span_name = if let Some(path) = matched_path {
                        format!("{} {}", request.method(), path)
                    } else {
                        format!("{} {}", request.method(), request.uri().path())
                    };

                    let client_ip = request
                        .headers()
                        .get("x-forwarded-for")
                        .and_then(|v| v.to_str().ok())
                        .or_else(|| {
                            request
                                .headers()
                                .get("x-real-ip")
                                .and_then(|v| v.to_str().ok())
                        })
                        .unwrap_or("unknown");

                    // Handlers fill in the empty fields
                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        client_ip = client_ip,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        table = tracing::field::Empty,
                        action = tracing::field::Empty,
                        business_event = tracing::field::Empty,
                        error = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_request(|_request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {})
                .on_response(|response: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                    span.record("status", tracing::field::display(response.status()));
                    span.record("latency", tracing::field::debug(latency));
                    tracing::info!("request completed");
                }),
        )
        .layer(
            cors.allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE]),
        )
        .route("/metrics", get(|| async move { metric_handle.render() }))
}
