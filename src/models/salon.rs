use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
}

/// A service row joined with its category name. `final_price` is the price
/// after the percentage discount.
#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub image: Option<String>,
    pub category_id: Option<i64>,
    pub category: Option<String>,
    pub final_price: f64,
}

#[derive(Deserialize, Debug, Validate)]
pub struct ServiceInput {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "Discount must be between 0 and 100"))]
    pub discount: f64,
    pub image: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct ServiceFilter {
    pub category_id: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Promotion {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub discount_percentage: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub image: Option<String>,
}

#[derive(Deserialize, Debug, Validate)]
#[validate(schema(function = "validate_promotion_dates"))]
pub struct PromotionInput {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, max = 100.0, message = "Discount must be between 0 and 100"))]
    pub discount_percentage: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub image: Option<String>,
}

fn validate_promotion_dates(input: &PromotionInput) -> Result<(), ValidationError> {
    if input.start_date > input.end_date {
        return Err(ValidationError::new("date_range")
            .with_message("The promotion must end on or after its start date".into()));
    }
    Ok(())
}

#[derive(Deserialize, Debug)]
pub struct PromotionFilter {
    #[serde(default)]
    pub current: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct CustomerInput {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub scheduled_at: NaiveDateTime,
    pub customer_id: i64,
    pub service_id: i64,
}

/// Appointment listing row with the customer and service it refers to.
#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct AppointmentDetail {
    pub id: i64,
    pub scheduled_at: NaiveDateTime,
    pub customer: String,
    pub service: String,
    pub price: f64,
    pub discount: f64,
}

#[derive(Deserialize, Debug)]
pub struct AppointmentInput {
    pub scheduled_at: NaiveDateTime,
    pub customer_id: i64,
    pub service_id: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct MonthlyStat {
    pub month: String,
    pub appointments: i64,
    pub revenue: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promotion(start: &str, end: &str, discount: f64) -> PromotionInput {
        PromotionInput {
            title: "Winter glow".into(),
            description: String::new(),
            discount_percentage: discount,
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            image: None,
        }
    }

    #[test]
    fn promotion_dates_must_be_ordered() {
        assert!(promotion("2025-07-01", "2025-07-31", 20.0).validate().is_ok());
        assert!(promotion("2025-07-01", "2025-07-01", 20.0).validate().is_ok());
        assert!(promotion("2025-08-01", "2025-07-31", 20.0).validate().is_err());
    }

    #[test]
    fn promotion_discount_is_a_percentage() {
        assert!(promotion("2025-07-01", "2025-07-31", 120.0).validate().is_err());
    }

    #[test]
    fn service_discount_defaults_to_zero() {
        let input: ServiceInput =
            serde_json::from_str(r#"{"title": "Manicura", "price": 3500}"#).unwrap();
        assert_eq!(input.discount, 0.0);
        assert_eq!(input.description, "");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn service_rejects_empty_title_and_negative_price() {
        let input: ServiceInput =
            serde_json::from_str(r#"{"title": "", "price": -1}"#).unwrap();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn appointment_requires_every_field() {
        let missing = serde_json::from_str::<AppointmentInput>(
            r#"{"scheduled_at": "2025-06-01T10:00:00", "customer_id": 1}"#,
        );
        assert!(missing.is_err());
    }
}
