use actix_web::{
    get, middleware, post,
    web::{self, Data},
    HttpResponse, Responder,
};
use validator::Validate;

use super::created;
use crate::{db, errors::AppError, models::students::StudentInput, AppState};

/// The roster is read by a separate front-end, so every answer allows any
/// origin.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/students")
            .wrap(middleware::DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")))
            .service(list_students)
            .service(create_student)
            .route("", web::method(actix_web::http::Method::OPTIONS).to(preflight)),
    );
}

#[get("")]
pub async fn list_students(state: Data<AppState>) -> Result<impl Responder, AppError> {
    let students = db::students::get_all_students(&state).await?;
    Ok(HttpResponse::Ok().json(students))
}

#[post("")]
pub async fn create_student(
    web::Json(input): web::Json<StudentInput>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    let id = db::students::create_student(&state, input).await?;
    Ok(created("Student added", id))
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .append_header(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .append_header((
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization, X-Requested-With",
        ))
        .finish()
}
