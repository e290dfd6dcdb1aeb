use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ApartmentStatus {
    Free,
    Occupied,
    Reserved,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RentalStatus {
    Active,
    Finished,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Owed,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Apartment {
    pub id: i64,
    pub number: String,
    pub status: ApartmentStatus,
}

#[derive(Deserialize, Debug, Validate)]
pub struct ApartmentInput {
    #[validate(length(min = 1, max = 20, message = "Apartment number is required"))]
    pub number: String,
    pub status: Option<ApartmentStatus>,
}

#[derive(Deserialize, Debug)]
pub struct ApartmentFilter {
    pub status: Option<ApartmentStatus>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Tenant {
    pub id: i64,
    pub full_name: String,
    pub document_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub origin_address: Option<String>,
    pub vehicle_brand: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate: Option<String>,
}

#[derive(Deserialize, Debug, Validate)]
pub struct TenantInput {
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,
    pub document_id: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub origin_address: Option<String>,
    pub vehicle_brand: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Rental {
    pub id: i64,
    pub apartment_id: i64,
    pub tenant_id: i64,
    pub status: RentalStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, Validate)]
#[validate(schema(function = "validate_rental_dates"))]
pub struct NewRental {
    pub apartment_id: i64,
    pub tenant_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

fn validate_rental_dates(input: &NewRental) -> Result<(), ValidationError> {
    match input.end_date {
        Some(end) if end < input.start_date => Err(ValidationError::new("date_range")
            .with_message("The rental cannot end before it starts".into())),
        _ => Ok(()),
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct FinishRental {
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Payment {
    pub id: i64,
    pub rental_id: i64,
    pub amount: f64,
    pub status: PaymentStatus,
    pub paid_on: NaiveDate,
}

#[derive(Deserialize, Debug, Validate)]
pub struct PaymentInput {
    pub rental_id: i64,
    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: f64,
    pub status: PaymentStatus,
    pub paid_on: NaiveDate,
}

#[derive(Deserialize, Debug)]
pub struct PaymentFilter {
    pub rental_id: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct PaymentStatusUpdate {
    pub status: PaymentStatus,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct ActiveRental {
    pub full_name: String,
    pub id: i64,
    pub apartment_id: i64,
    pub tenant_id: i64,
    pub status: RentalStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub apartment: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Debtor {
    pub full_name: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub paid_on: NaiveDate,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct DailyIncome {
    pub day: NaiveDate,
    pub total: f64,
}

#[derive(Deserialize, Debug)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
