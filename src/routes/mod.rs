use actix_files::NamedFile;
use actix_identity::Identity;
use actix_web::{
    http::{Method, StatusCode},
    web, Either, HttpResponse, Responder,
};
use serde::Serialize;
use tera::Context;

use crate::{
    db,
    errors::AppError,
    models::users::{Role, User},
    AppState, TEMPLATES,
};

pub mod auth;
pub mod pages;
pub mod rental;
pub mod salon;
pub mod students;

pub const STAFF: &[Role] = &[Role::Admin, Role::Owner, Role::Assistant];
pub const ADMIN: &[Role] = &[Role::Admin];

#[derive(Serialize, Debug)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>, id: Option<i64>) -> Self {
        StatusMessage {
            status: "success",
            message: message.into(),
            id,
        }
    }
}

pub fn created(message: &str, id: i64) -> HttpResponse {
    HttpResponse::Created().json(StatusMessage::success(message, Some(id)))
}

pub fn done(message: &str, id: i64) -> HttpResponse {
    HttpResponse::Ok().json(StatusMessage::success(message, Some(id)))
}

/// Resolves the session identity to a stored user. A session pointing at a
/// deleted account is logged out.
pub async fn current_user(state: &AppState, identity: Option<Identity>) -> Result<User, AppError> {
    let identity = identity.ok_or(AppError::Unauthorized)?;
    let user_id = identity
        .id()?
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized)?;

    match db::users::get_user_by_id(state, user_id).await {
        Ok(user) => Ok(user),
        Err(sqlx::Error::RowNotFound) => {
            identity.logout();
            Err(AppError::Unauthorized)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn require_role(user: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        log::warn!(
            "User {} ({}) denied, needs one of {:?}",
            user.id,
            user.role.as_str(),
            allowed
        );
        Err(AppError::Forbidden)
    }
}

pub async fn authorize(
    state: &AppState,
    identity: Option<Identity>,
    allowed: &[Role],
) -> Result<User, AppError> {
    let user = current_user(state, identity).await?;
    require_role(&user, allowed)?;
    Ok(user)
}

pub fn render(template: &str, context: &Context) -> Result<HttpResponse, AppError> {
    render_with_status(StatusCode::OK, template, context)
}

pub fn render_with_status(
    status: StatusCode,
    template: &str,
    context: &Context,
) -> Result<HttpResponse, AppError> {
    let rendered = TEMPLATES.render(template, context).map_err(|e| {
        log::error!("Failed to render template: {}", e);
        AppError::TemplateError(e)
    })?;

    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(rendered))
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header(("Location", location))
        .finish()
}

pub async fn default_handler(
    req_method: Method,
    state: web::Data<AppState>,
) -> Result<impl Responder, std::io::Error> {
    match req_method {
        Method::GET => {
            let file = NamedFile::open(state.static_dir.join("404.html"))?
                .customize()
                .with_status(StatusCode::NOT_FOUND);
            Ok(Either::Left(file))
        }
        _ => Ok(Either::Right(HttpResponse::MethodNotAllowed().finish())),
    }
}
