use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::ServiceResponse;
use actix_web::error::{JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderValue};
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use thiserror::Error;
use tracing::error;

use crate::domain::error::DomainError;
use crate::domain::user::UserDraft;
use crate::infrastructure::config::RuntimeMode;
use crate::presentation::dto::Envelope;

pub const USER_NOT_FOUND: &str = "User not found";
pub const EMAIL_EXISTS: &str = "Email already exists";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const INTERNAL_ERROR: &str = "Internal server error";
pub const INVALID_BODY: &str = "Invalid request body";

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    /// Classifies a domain failure. `context` names the operation and becomes the
    /// message of store failures, whose raw text is kept only outside production.
    pub fn from_domain(err: DomainError, context: &str, mode: RuntimeMode) -> Self {
        match err {
            DomainError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            DomainError::UserNotFound(_) => Self::new(StatusCode::NOT_FOUND, USER_NOT_FOUND),
            DomainError::DuplicateEmail(_) => Self::new(StatusCode::BAD_REQUEST, EMAIL_EXISTS),
            DomainError::Storage(detail) => {
                error!(error = %detail, "{}", context);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
                    .with_detail(mode.exposes_details().then_some(detail))
            }
        }
    }

    /// `map_err` adapter for handlers.
    pub fn mapper(mode: RuntimeMode, context: &'static str) -> impl Fn(DomainError) -> Self {
        move |err| Self::from_domain(err, context, mode)
    }

    pub fn missing_fields() -> Self {
        Self::new(StatusCode::BAD_REQUEST, UserDraft::MISSING_FIELDS)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(Envelope::failure(
            self.message.clone(),
            self.detail.clone(),
        ))
    }
}

fn runtime_mode(req: &HttpRequest) -> RuntimeMode {
    req.app_data::<web::Data<RuntimeMode>>()
        .map(|mode| *mode.get_ref())
        .unwrap_or(RuntimeMode::Production)
}

pub fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let detail = runtime_mode(req).exposes_details().then(|| err.to_string());
    ApiError::new(StatusCode::BAD_REQUEST, INVALID_BODY)
        .with_detail(detail)
        .into()
}

/// An id that is not an integer cannot name any row.
pub fn path_error(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::new(StatusCode::NOT_FOUND, USER_NOT_FOUND).into()
}

pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(Envelope::failure(ROUTE_NOT_FOUND, None))
}

/// Last-resort handler: rewrites 500s the framework produced outside our handlers.
pub fn internal_error_envelope<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let detail = res.response().error().map(|err| err.to_string());
    error!(error = ?detail, path = %res.request().path(), "unhandled server error");
    let detail = detail.filter(|_| runtime_mode(res.request()).exposes_details());
    let body = serde_json::to_string(&Envelope::failure(INTERNAL_ERROR, detail))?;

    let (req, res) = res.into_parts();
    let mut res = res.set_body(body);
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    let res: ServiceResponse<EitherBody<B, BoxBody>> = ServiceResponse::new(req, res)
        .map_into_boxed_body()
        .map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}
