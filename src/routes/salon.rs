use actix_identity::Identity;
use actix_web::{
    delete, get, post, put,
    web::{self, Data},
    HttpResponse, Responder,
};
use validator::Validate;

use super::{authorize, created, done, ADMIN};
use crate::{
    db,
    errors::AppError,
    models::salon::{
        AppointmentInput, CategoryInput, CustomerInput, PromotionFilter, PromotionInput,
        ServiceFilter, ServiceInput,
    },
    utils::today,
    AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/salon")
            .service(list_services)
            .service(get_service)
            .service(create_service)
            .service(update_service)
            .service(delete_service)
            .service(list_categories)
            .service(create_category)
            .service(update_category)
            .service(delete_category)
            .service(list_promotions)
            .service(get_promotion)
            .service(create_promotion)
            .service(update_promotion)
            .service(delete_promotion)
            .service(list_customers)
            .service(create_customer)
            .service(list_appointments)
            .service(get_appointment)
            .service(create_appointment)
            .service(update_appointment)
            .service(delete_appointment)
            .service(monthly_stats),
    );
}

// services

#[get("/services")]
pub async fn list_services(
    state: Data<AppState>,
    filter: web::Query<ServiceFilter>,
) -> Result<impl Responder, AppError> {
    let services = db::salon::get_all_services(&state, filter.category_id).await?;
    Ok(HttpResponse::Ok().json(services))
}

#[get("/services/{id}")]
pub async fn get_service(
    state: Data<AppState>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let service = db::salon::get_service_by_id(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(service))
}

#[post("/services")]
pub async fn create_service(
    web::Json(input): web::Json<ServiceInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    input.validate()?;
    let id = db::salon::create_service(&state, input).await?;
    Ok(created("Service created", id))
}

#[put("/services/{id}")]
pub async fn update_service(
    path: web::Path<i64>,
    web::Json(input): web::Json<ServiceInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    input.validate()?;
    let id = path.into_inner();
    db::salon::update_service(&state, id, input).await?;
    Ok(done("Service updated", id))
}

#[delete("/services/{id}")]
pub async fn delete_service(
    path: web::Path<i64>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    let id = path.into_inner();
    db::salon::delete_service(&state, id).await?;
    Ok(done("Service deleted", id))
}

// categories

#[get("/categories")]
pub async fn list_categories(state: Data<AppState>) -> Result<impl Responder, AppError> {
    let categories = db::salon::get_all_categories(&state).await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[post("/categories")]
pub async fn create_category(
    web::Json(input): web::Json<CategoryInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    input.validate()?;
    let id = db::salon::create_category(&state, input).await?;
    Ok(created("Category created", id))
}

#[put("/categories/{id}")]
pub async fn update_category(
    path: web::Path<i64>,
    web::Json(input): web::Json<CategoryInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    input.validate()?;
    let id = path.into_inner();
    db::salon::update_category(&state, id, input).await?;
    Ok(done("Category updated", id))
}

#[delete("/categories/{id}")]
pub async fn delete_category(
    path: web::Path<i64>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    let id = path.into_inner();
    db::salon::delete_category(&state, id).await?;
    Ok(done("Category deleted", id))
}

// promotions

#[get("/promotions")]
pub async fn list_promotions(
    state: Data<AppState>,
    filter: web::Query<PromotionFilter>,
) -> Result<impl Responder, AppError> {
    let on = filter.current.then(today);
    let promotions = db::salon::get_all_promotions(&state, on).await?;
    Ok(HttpResponse::Ok().json(promotions))
}

#[get("/promotions/{id}")]
pub async fn get_promotion(
    state: Data<AppState>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let promotion = db::salon::get_promotion_by_id(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(promotion))
}

#[post("/promotions")]
pub async fn create_promotion(
    web::Json(input): web::Json<PromotionInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    input.validate()?;
    let id = db::salon::create_promotion(&state, input).await?;
    Ok(created("Promotion created", id))
}

#[put("/promotions/{id}")]
pub async fn update_promotion(
    path: web::Path<i64>,
    web::Json(input): web::Json<PromotionInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    input.validate()?;
    let id = path.into_inner();
    db::salon::update_promotion(&state, id, input).await?;
    Ok(done("Promotion updated", id))
}

#[delete("/promotions/{id}")]
pub async fn delete_promotion(
    path: web::Path<i64>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    let id = path.into_inner();
    db::salon::delete_promotion(&state, id).await?;
    Ok(done("Promotion deleted", id))
}

// customers

#[get("/customers")]
pub async fn list_customers(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    let customers = db::salon::get_all_customers(&state).await?;
    Ok(HttpResponse::Ok().json(customers))
}

#[post("/customers")]
pub async fn create_customer(
    web::Json(input): web::Json<CustomerInput>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    input.validate()?;
    let id = db::salon::create_customer(&state, input).await?;
    Ok(created("Customer registered", id))
}

// appointments

#[get("/appointments")]
pub async fn list_appointments(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    let appointments = db::salon::get_all_appointments(&state).await?;
    Ok(HttpResponse::Ok().json(appointments))
}

#[get("/appointments/{id}")]
pub async fn get_appointment(
    state: Data<AppState>,
    path: web::Path<i64>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    let appointment = db::salon::get_appointment_by_id(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[post("/appointments")]
pub async fn create_appointment(
    web::Json(input): web::Json<AppointmentInput>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = db::salon::create_appointment(&state, input).await?;
    Ok(created("Appointment booked", id))
}

#[put("/appointments/{id}")]
pub async fn update_appointment(
    path: web::Path<i64>,
    web::Json(input): web::Json<AppointmentInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    let id = path.into_inner();
    db::salon::update_appointment(&state, id, input).await?;
    Ok(done("Appointment updated", id))
}

#[delete("/appointments/{id}")]
pub async fn delete_appointment(
    path: web::Path<i64>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    let id = path.into_inner();
    db::salon::delete_appointment(&state, id).await?;
    Ok(done("Appointment deleted", id))
}

#[get("/stats")]
pub async fn monthly_stats(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, ADMIN).await?;
    let stats = db::salon::get_monthly_stats(&state).await?;
    Ok(HttpResponse::Ok().json(stats))
}
