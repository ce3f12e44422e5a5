use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::middleware::{DefaultHeaders, ErrorHandlers, NormalizePath};
use actix_web::{App, HttpServer, web};
use sqlx::PgPool;
use tracing::info;

use crate::application::health_service::HealthService;
use crate::application::user_service::UserService;
use crate::data::store_probe::PostgresStoreProbe;
use crate::data::user_repository::PostgresUserRepository;
use crate::infrastructure::config::{AppConfig, RuntimeMode};
use crate::presentation::errors::{internal_error_envelope, json_error, path_error, route_not_found};
use crate::presentation::handlers;
use crate::presentation::middleware::RequestTelemetry;

/// Everything a worker needs to serve requests; cloned once per worker.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub health: HealthService,
    pub mode: RuntimeMode,
    pub frontend_url: String,
}

impl AppState {
    pub fn from_pool(pool: PgPool, config: &AppConfig) -> Self {
        let users = UserService::new(Arc::new(PostgresUserRepository::new(pool.clone())));
        let health = HealthService::new(Arc::new(PostgresStoreProbe::new(pool)), config.mode);
        Self {
            users,
            health,
            mode: config.mode,
            frontend_url: config.frontend_url.clone(),
        }
    }
}

pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = build_cors(&state.frontend_url);

    App::new()
        .wrap(ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, internal_error_envelope))
        .wrap(RequestTelemetry)
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("Referrer-Policy", "no-referrer")),
        )
        .wrap(cors)
        .wrap(NormalizePath::trim())
        .app_data(web::Data::new(state.users))
        .app_data(web::Data::new(state.health))
        .app_data(web::Data::new(state.mode))
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/api")
                .service(handlers::health::scope())
                .service(handlers::user::scope()),
        )
        .default_service(web::to(route_not_found))
}

fn build_cors(frontend_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(frontend_url)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec!["x-request-id"])
        .supports_credentials()
        .max_age(3600)
}

/// Binds and serves until the process is stopped. The schema must already exist.
pub async fn run(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    info!(
        host = %config.host,
        port = config.port,
        environment = config.mode.as_str(),
        frontend_url = %config.frontend_url,
        "HTTP server starting"
    );

    HttpServer::new(move || build_app(state.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
