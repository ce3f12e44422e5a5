use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use tracing::info;

use crate::application::user_service::UserService;
use crate::domain::user::{UserDraft, UserId};
use crate::infrastructure::config::RuntimeMode;
use crate::presentation::body::UserBody;
use crate::presentation::dto::{Envelope, UserPayload};
use crate::presentation::errors::ApiError;
use crate::presentation::middleware::request_id;

pub fn scope() -> Scope {
    web::scope("/users")
        .service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user)
}

fn draft(payload: UserPayload) -> Result<UserDraft, ApiError> {
    UserDraft::new(payload.name, payload.email).map_err(|_| ApiError::missing_fields())
}

#[get("")]
async fn list_users(
    service: web::Data<UserService>,
    mode: web::Data<RuntimeMode>,
) -> Result<HttpResponse, ApiError> {
    let users = service
        .list()
        .await
        .map_err(ApiError::mapper(*mode.get_ref(), "Failed to fetch users"))?;

    Ok(HttpResponse::Ok().json(Envelope::success(users).with_message("Users fetched successfully")))
}

#[get("/{id}")]
async fn get_user(
    service: web::Data<UserService>,
    mode: web::Data<RuntimeMode>,
    path: web::Path<UserId>,
) -> Result<HttpResponse, ApiError> {
    let user = service
        .get(path.into_inner())
        .await
        .map_err(ApiError::mapper(*mode.get_ref(), "Failed to fetch user"))?;

    Ok(HttpResponse::Ok().json(Envelope::success(user)))
}

#[post("")]
async fn create_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    mode: web::Data<RuntimeMode>,
    payload: UserBody,
) -> Result<HttpResponse, ApiError> {
    let draft = draft(payload.into_inner())?;
    let user = service
        .create(draft)
        .await
        .map_err(ApiError::mapper(*mode.get_ref(), "Failed to create user"))?;

    info!(request_id = %request_id(&req), user_id = user.id, "user created");

    Ok(HttpResponse::Created().json(Envelope::success(user).with_message("User created successfully")))
}

#[put("/{id}")]
async fn update_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    mode: web::Data<RuntimeMode>,
    path: web::Path<UserId>,
    payload: UserBody,
) -> Result<HttpResponse, ApiError> {
    let draft = draft(payload.into_inner())?;
    let user = service
        .update(path.into_inner(), draft)
        .await
        .map_err(ApiError::mapper(*mode.get_ref(), "Failed to update user"))?;

    info!(request_id = %request_id(&req), user_id = user.id, "user updated");

    Ok(HttpResponse::Ok().json(Envelope::success(user).with_message("User updated successfully")))
}

#[delete("/{id}")]
async fn delete_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    mode: web::Data<RuntimeMode>,
    path: web::Path<UserId>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    service
        .delete(id)
        .await
        .map_err(ApiError::mapper(*mode.get_ref(), "Failed to delete user"))?;

    info!(request_id = %request_id(&req), user_id = id, "user deleted");

    Ok(HttpResponse::Ok().json(Envelope::confirmation("User deleted successfully")))
}
