use chrono::NaiveDate;

use crate::{
    errors::AppError,
    models::salon::{
        Appointment, AppointmentDetail, AppointmentInput, Category, CategoryInput, Customer,
        CustomerInput, MonthlyStat, Promotion, PromotionInput, Service, ServiceInput,
    },
    AppState,
};

const SERVICE_SELECT: &str = r#"
    SELECT s.id, s.title, s.description, s.price, s.discount, s.image, s.category_id,
           c.name AS category,
           s.price - s.price * s.discount / 100.0 AS final_price
    FROM services s
    LEFT JOIN categories c ON c.id = s.category_id
"#;

fn ensure_affected(rows: u64) -> Result<(), AppError> {
    if rows == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

// categories

pub async fn get_all_categories(state: &AppState) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(&state.db_pool)
        .await
}

pub async fn create_category(state: &AppState, input: CategoryInput) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar("INSERT INTO categories (name) VALUES (?) RETURNING id")
        .bind(input.name.trim())
        .fetch_one(&state.db_pool)
        .await?;
    log::info!("Category {} created", id);
    Ok(id)
}

pub async fn update_category(
    state: &AppState,
    id: i64,
    input: CategoryInput,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
        .bind(input.name.trim())
        .bind(id)
        .execute(&state.db_pool)
        .await?;
    ensure_affected(result.rows_affected())?;
    log::info!("Category {} updated", id);
    Ok(())
}

pub async fn delete_category(state: &AppState, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&state.db_pool)
        .await?;
    ensure_affected(result.rows_affected())?;
    log::info!("Category {} deleted", id);
    Ok(())
}

// services

pub async fn get_all_services(
    state: &AppState,
    category_id: Option<i64>,
) -> Result<Vec<Service>, sqlx::Error> {
    let query = format!(
        "{} WHERE (?1 IS NULL OR s.category_id = ?1) ORDER BY s.id",
        SERVICE_SELECT
    );
    sqlx::query_as::<_, Service>(&query)
        .bind(category_id)
        .fetch_all(&state.db_pool)
        .await
}

pub async fn get_service_by_id(state: &AppState, id: i64) -> Result<Service, sqlx::Error> {
    let query = format!("{} WHERE s.id = ?", SERVICE_SELECT);
    sqlx::query_as::<_, Service>(&query)
        .bind(id)
        .fetch_one(&state.db_pool)
        .await
}

pub async fn create_service(state: &AppState, input: ServiceInput) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO services (title, description, price, discount, image, category_id) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(input.title.trim())
    .bind(input.description)
    .bind(input.price)
    .bind(input.discount)
    .bind(input.image)
    .bind(input.category_id)
    .fetch_one(&state.db_pool)
    .await?;
    log::info!("Service {} created", id);
    Ok(id)
}

pub async fn update_service(
    state: &AppState,
    id: i64,
    input: ServiceInput,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE services SET title = ?, description = ?, price = ?, discount = ?, image = ?, category_id = ? WHERE id = ?",
    )
    .bind(input.title.trim())
    .bind(input.description)
    .bind(input.price)
    .bind(input.discount)
    .bind(input.image)
    .bind(input.category_id)
    .bind(id)
    .execute(&state.db_pool)
    .await?;
    ensure_affected(result.rows_affected())?;
    log::info!("Service {} updated", id);
    Ok(())
}

pub async fn delete_service(state: &AppState, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM services WHERE id = ?")
        .bind(id)
        .execute(&state.db_pool)
        .await?;
    ensure_affected(result.rows_affected())?;
    log::info!("Service {} deleted", id);
    Ok(())
}

// promotions

/// With `on` set, only promotions whose date range contains that day.
pub async fn get_all_promotions(
    state: &AppState,
    on: Option<NaiveDate>,
) -> Result<Vec<Promotion>, sqlx::Error> {
    sqlx::query_as::<_, Promotion>(
        "SELECT * FROM promotions WHERE (?1 IS NULL OR (start_date <= ?1 AND end_date >= ?1)) ORDER BY start_date DESC, id DESC",
    )
    .bind(on)
    .fetch_all(&state.db_pool)
    .await
}

pub async fn get_promotion_by_id(state: &AppState, id: i64) -> Result<Promotion, sqlx::Error> {
    sqlx::query_as::<_, Promotion>("SELECT * FROM promotions WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db_pool)
        .await
}

pub async fn create_promotion(
    state: &AppState,
    input: PromotionInput,
) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO promotions (title, description, discount_percentage, start_date, end_date, image) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(input.title.trim())
    .bind(input.description)
    .bind(input.discount_percentage)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(input.image)
    .fetch_one(&state.db_pool)
    .await?;
    log::info!("Promotion {} created", id);
    Ok(id)
}

pub async fn update_promotion(
    state: &AppState,
    id: i64,
    input: PromotionInput,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE promotions SET title = ?, description = ?, discount_percentage = ?, start_date = ?, end_date = ?, image = ? WHERE id = ?",
    )
    .bind(input.title.trim())
    .bind(input.description)
    .bind(input.discount_percentage)
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(input.image)
    .bind(id)
    .execute(&state.db_pool)
    .await?;
    ensure_affected(result.rows_affected())?;
    log::info!("Promotion {} updated", id);
    Ok(())
}

pub async fn delete_promotion(state: &AppState, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM promotions WHERE id = ?")
        .bind(id)
        .execute(&state.db_pool)
        .await?;
    ensure_affected(result.rows_affected())?;
    log::info!("Promotion {} deleted", id);
    Ok(())
}

// customers

pub async fn get_all_customers(state: &AppState) -> Result<Vec<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY name")
        .fetch_all(&state.db_pool)
        .await
}

pub async fn create_customer(state: &AppState, input: CustomerInput) -> Result<i64, sqlx::Error> {
    let id: i64 =
        sqlx::query_scalar("INSERT INTO customers (name, email) VALUES (?, ?) RETURNING id")
            .bind(input.name.trim())
            .bind(input.email.trim().to_lowercase())
            .fetch_one(&state.db_pool)
            .await?;
    log::info!("Customer {} registered", id);
    Ok(id)
}

// appointments

pub async fn get_all_appointments(
    state: &AppState,
) -> Result<Vec<AppointmentDetail>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentDetail>(
        r#"
        SELECT a.id, a.scheduled_at,
               c.name AS customer,
               s.title AS service,
               s.price, s.discount
        FROM appointments a
        JOIN customers c ON a.customer_id = c.id
        JOIN services s ON a.service_id = s.id
        ORDER BY a.scheduled_at DESC
        "#,
    )
    .fetch_all(&state.db_pool)
    .await
}

pub async fn get_appointment_by_id(state: &AppState, id: i64) -> Result<Appointment, sqlx::Error> {
    sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db_pool)
        .await
}

pub async fn create_appointment(
    state: &AppState,
    input: AppointmentInput,
) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO appointments (scheduled_at, customer_id, service_id) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(input.scheduled_at)
    .bind(input.customer_id)
    .bind(input.service_id)
    .fetch_one(&state.db_pool)
    .await?;
    log::info!("Appointment {} booked for {}", id, input.scheduled_at);
    Ok(id)
}

pub async fn update_appointment(
    state: &AppState,
    id: i64,
    input: AppointmentInput,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE appointments SET scheduled_at = ?, customer_id = ?, service_id = ? WHERE id = ?",
    )
    .bind(input.scheduled_at)
    .bind(input.customer_id)
    .bind(input.service_id)
    .bind(id)
    .execute(&state.db_pool)
    .await?;
    ensure_affected(result.rows_affected())?;
    log::info!("Appointment {} updated", id);
    Ok(())
}

pub async fn delete_appointment(state: &AppState, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(id)
        .execute(&state.db_pool)
        .await?;
    ensure_affected(result.rows_affected())?;
    log::info!("Appointment {} deleted", id);
    Ok(())
}

pub async fn get_monthly_stats(state: &AppState) -> Result<Vec<MonthlyStat>, sqlx::Error> {
    sqlx::query_as::<_, MonthlyStat>("SELECT * FROM monthly_stats ORDER BY month DESC")
        .fetch_all(&state.db_pool)
        .await
}
