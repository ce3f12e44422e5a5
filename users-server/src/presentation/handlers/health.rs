use actix_web::http::header;
use actix_web::{HttpResponse, HttpResponseBuilder, Scope, get, web};
use serde::Serialize;

use crate::application::health_service::{HealthService, ProbeStatus};
use crate::presentation::dto::Envelope;

pub fn scope() -> Scope {
    web::scope("/health")
        .service(health)
        .service(live)
        .service(ready)
}

fn probe_response<T: Serialize>(status: ProbeStatus, message: &str, data: T) -> HttpResponse {
    let mut builder: HttpResponseBuilder = if status.is_up() {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };

    let mut body = Envelope::success(data).with_message(message);
    body.success = status.is_up();

    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(body)
}

/// Full report: store check with latency, uptime and memory.
#[get("")]
async fn health(service: web::Data<HealthService>) -> HttpResponse {
    let report = service.report().await;
    let message = match report.status {
        ProbeStatus::Up => "Server is running",
        ProbeStatus::Down => "Database unavailable",
    };
    probe_response(report.status, message, report)
}

#[get("/live")]
async fn live(service: web::Data<HealthService>) -> HttpResponse {
    let report = service.liveness();
    probe_response(report.status, "Server is alive", report)
}

#[get("/ready")]
async fn ready(service: web::Data<HealthService>) -> HttpResponse {
    let report = service.readiness().await;
    let message = match report.status {
        ProbeStatus::Up => "Server is ready",
        ProbeStatus::Down => "Database unavailable",
    };
    probe_response(report.status, message, report)
}
