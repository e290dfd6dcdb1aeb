use actix_identity::Identity;
use actix_web::{
    delete, get, post, put,
    web::{self, Data},
    HttpMessage, HttpRequest, HttpResponse, Responder,
};
use serde_json::json;
use validator::Validate;

use super::{authorize, created, current_user, StatusMessage, ADMIN};
use crate::{
    db,
    errors::AppError,
    models::users::{ChangePassword, Login, NewUser, Register, Role},
    utils::verify_password,
    AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(register_handler)
            .service(login_handler)
            .service(logout_handler)
            .service(me_handler)
            .service(change_pwd_handler),
    )
    .service(
        web::scope("/api/users")
            .service(list_users)
            .service(create_user)
            .service(delete_user),
    );
}

/// Public sign-up. Always creates a `client` account.
#[post("/register")]
pub async fn register_handler(
    web::Json(form): web::Json<Register>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    form.validate()?;
    let user = db::users::create_user(&state, NewUser::from(form)).await?;
    Ok(created("User registered successfully", user.id))
}

#[post("/login")]
pub async fn login_handler(
    web::Json(form): web::Json<Login>,
    state: Data<AppState>,
    request: HttpRequest,
) -> Result<impl Responder, AppError> {
    form.validate()?;

    match db::users::authenticate(&state, &form.login, &form.password).await? {
        Some(user) => {
            Identity::login(&request.extensions(), user.id.to_string())?;
            log::info!("User {} logged in", user.id);
            Ok(HttpResponse::Ok().json(json!({
                "status": "success",
                "message": "Login successful",
                "user": user,
            })))
        }
        None => {
            log::warn!("Failed login attempt for {:?}", form.login);
            Err(AppError::InvalidCredentials)
        }
    }
}

#[post("/logout")]
pub async fn logout_handler(identity: Option<Identity>) -> impl Responder {
    if let Some(user) = identity {
        user.logout();
    }
    HttpResponse::Ok().json(StatusMessage::success("Session closed", None))
}

#[get("/me")]
pub async fn me_handler(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    let user = current_user(&state, identity).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[put("/password")]
pub async fn change_pwd_handler(
    web::Json(form): web::Json<ChangePassword>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    let user = current_user(&state, identity).await?;
    form.validate()?;

    if !verify_password(&form.old_password, &user.pwd_hash) {
        log::warn!("Old password verification failed for user ID: {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    db::users::update_password(&state, user.id, &form.password).await?;
    log::info!("Password changed successfully for user ID: {}", user.id);

    Ok(HttpResponse::Ok().json(StatusMessage::success(
        "Password changed successfully",
        Some(user.id),
    )))
}

#[get("")]
pub async fn list_users(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    let users = db::users::get_all_users(&state).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Admins create any role; owners only add rental staff.
#[post("")]
pub async fn create_user(
    web::Json(form): web::Json<NewUser>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    let actor = authorize(&state, identity, &[Role::Admin, Role::Owner]).await?;
    form.validate()?;

    if actor.role == Role::Owner && !matches!(form.role, Role::Owner | Role::Assistant) {
        return Err(AppError::Forbidden);
    }

    let user = db::users::create_user(&state, form).await?;
    Ok(created("User created", user.id))
}

#[delete("/{id}")]
pub async fn delete_user(
    path: web::Path<i64>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    let actor = authorize(&state, identity, ADMIN).await?;
    let id = path.into_inner();
    if actor.id == id {
        return Err(AppError::Conflict("You cannot delete your own account".into()));
    }
    db::users::delete_user(&state, id).await?;
    Ok(HttpResponse::Ok().json(StatusMessage::success("User deleted", Some(id))))
}
