use actix_identity::Identity;
use actix_web::{
    delete, get, post, put,
    web::{self, Data},
    HttpResponse, Responder,
};
use chrono::NaiveDate;
use validator::Validate;

use super::{authorize, created, done, STAFF};
use crate::{
    db,
    errors::AppError,
    models::rental::{
        ApartmentFilter, ApartmentInput, DateRange, FinishRental, NewRental, PaymentFilter,
        PaymentInput, PaymentStatusUpdate, TenantInput,
    },
    utils::today,
    AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/rental")
            .service(list_apartments)
            .service(create_apartment)
            .service(update_apartment)
            .service(list_tenants)
            .service(get_tenant)
            .service(create_tenant)
            .service(update_tenant)
            .service(delete_tenant)
            .service(list_rentals)
            .service(create_rental)
            .service(finish_rental)
            .service(list_payments)
            .service(create_payment)
            .service(update_payment_status)
            .service(free_apartments_report)
            .service(active_rentals_report)
            .service(debtors_report)
            .service(daily_income_report),
    );
}

/// Both bounds are required, `from` must not be after `to`.
pub fn require_range(range: &DateRange) -> Result<(NaiveDate, NaiveDate), AppError> {
    match (range.from, range.to) {
        (Some(from), Some(to)) if from <= to => Ok((from, to)),
        (Some(_), Some(_)) => Err(AppError::Validation(
            "'from' must be on or before 'to'".into(),
        )),
        _ => Err(AppError::Validation(
            "Missing 'from' or 'to' parameter".into(),
        )),
    }
}

/// An empty body means "finish today"; anything else must be a valid
/// `FinishRental` document.
pub fn finish_body(body: &[u8]) -> Result<FinishRental, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FinishRental::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e)))
}

// apartments

#[get("/apartments")]
pub async fn list_apartments(
    state: Data<AppState>,
    filter: web::Query<ApartmentFilter>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let apartments = db::rental::get_all_apartments(&state, filter.status).await?;
    Ok(HttpResponse::Ok().json(apartments))
}

#[post("/apartments")]
pub async fn create_apartment(
    web::Json(input): web::Json<ApartmentInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    input.validate()?;
    let id = db::rental::create_apartment(&state, input).await?;
    Ok(created("Apartment created", id))
}

#[put("/apartments/{id}")]
pub async fn update_apartment(
    path: web::Path<i64>,
    web::Json(input): web::Json<ApartmentInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    input.validate()?;
    let apartment = db::rental::update_apartment(&state, path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(apartment))
}

// tenants

#[get("/tenants")]
pub async fn list_tenants(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let tenants = db::rental::get_all_tenants(&state).await?;
    Ok(HttpResponse::Ok().json(tenants))
}

#[get("/tenants/{id}")]
pub async fn get_tenant(
    path: web::Path<i64>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let tenant = db::rental::get_tenant_by_id(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tenant))
}

#[post("/tenants")]
pub async fn create_tenant(
    web::Json(input): web::Json<TenantInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    input.validate()?;
    let id = db::rental::create_tenant(&state, input).await?;
    Ok(created("Tenant registered", id))
}

#[put("/tenants/{id}")]
pub async fn update_tenant(
    path: web::Path<i64>,
    web::Json(input): web::Json<TenantInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    input.validate()?;
    let tenant = db::rental::update_tenant(&state, path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(tenant))
}

#[delete("/tenants/{id}")]
pub async fn delete_tenant(
    path: web::Path<i64>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let id = path.into_inner();
    db::rental::delete_tenant(&state, id).await?;
    Ok(done("Tenant deleted", id))
}

// rentals

#[get("/rentals")]
pub async fn list_rentals(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let rentals = db::rental::get_all_rentals(&state).await?;
    Ok(HttpResponse::Ok().json(rentals))
}

#[post("/rentals")]
pub async fn create_rental(
    web::Json(input): web::Json<NewRental>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    input.validate()?;
    let rental = db::rental::create_rental(&state, input).await?;
    Ok(HttpResponse::Created().json(rental))
}

#[post("/rentals/{id}/finish")]
pub async fn finish_rental(
    path: web::Path<i64>,
    body: web::Bytes,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let end_date = finish_body(&body)?.end_date.unwrap_or_else(today);
    let rental = db::rental::finish_rental(&state, path.into_inner(), end_date).await?;
    Ok(HttpResponse::Ok().json(rental))
}

// payments

#[get("/payments")]
pub async fn list_payments(
    state: Data<AppState>,
    filter: web::Query<PaymentFilter>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let payments = db::rental::get_all_payments(&state, filter.rental_id).await?;
    Ok(HttpResponse::Ok().json(payments))
}

#[post("/payments")]
pub async fn create_payment(
    web::Json(input): web::Json<PaymentInput>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    input.validate()?;
    let id = db::rental::create_payment(&state, input).await?;
    Ok(created("Payment recorded", id))
}

#[put("/payments/{id}/status")]
pub async fn update_payment_status(
    path: web::Path<i64>,
    web::Json(input): web::Json<PaymentStatusUpdate>,
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let payment =
        db::rental::update_payment_status(&state, path.into_inner(), input.status).await?;
    Ok(HttpResponse::Ok().json(payment))
}

// reports

#[get("/reports/free-apartments")]
pub async fn free_apartments_report(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let rows = db::reports::free_apartments(&state).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/reports/active-rentals")]
pub async fn active_rentals_report(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let rows = db::reports::active_rentals(&state).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/reports/debtors")]
pub async fn debtors_report(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let rows = db::reports::debtors(&state).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/reports/daily-income")]
pub async fn daily_income_report(
    state: Data<AppState>,
    range: web::Query<DateRange>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    authorize(&state, identity, STAFF).await?;
    let (from, to) = require_range(&range)?;
    let rows = db::reports::daily_income(&state, from, to).await?;
    Ok(HttpResponse::Ok().json(rows))
}
