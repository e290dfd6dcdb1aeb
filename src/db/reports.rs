//! The four fixed rental report queries.

use chrono::NaiveDate;

use crate::{
    models::rental::{
        ActiveRental, Apartment, ApartmentStatus, DailyIncome, Debtor, PaymentStatus,
        RentalStatus,
    },
    AppState,
};

pub async fn free_apartments(state: &AppState) -> Result<Vec<Apartment>, sqlx::Error> {
    sqlx::query_as::<_, Apartment>("SELECT * FROM apartments WHERE status = ? ORDER BY number")
        .bind(ApartmentStatus::Free)
        .fetch_all(&state.db_pool)
        .await
}

pub async fn active_rentals(state: &AppState) -> Result<Vec<ActiveRental>, sqlx::Error> {
    sqlx::query_as::<_, ActiveRental>(
        r#"
        SELECT i.full_name, a.id, a.apartment_id, a.tenant_id, a.status,
               a.start_date, a.end_date, d.number AS apartment
        FROM rentals a
        JOIN apartments d ON a.apartment_id = d.id
        JOIN tenants i ON i.id = a.tenant_id
        WHERE a.status = ?
        ORDER BY d.number
        "#,
    )
    .bind(RentalStatus::Active)
    .fetch_all(&state.db_pool)
    .await
}

pub async fn debtors(state: &AppState) -> Result<Vec<Debtor>, sqlx::Error> {
    sqlx::query_as::<_, Debtor>(
        r#"
        SELECT i.full_name, p.amount, p.status, p.paid_on
        FROM payments p
        JOIN rentals a ON p.rental_id = a.id
        JOIN tenants i ON a.tenant_id = i.id
        WHERE p.status IN (?, ?)
        ORDER BY p.paid_on, i.full_name
        "#,
    )
    .bind(PaymentStatus::Owed)
    .bind(PaymentStatus::Partial)
    .fetch_all(&state.db_pool)
    .await
}

/// Sum of received payments per calendar day, both bounds inclusive.
/// Payments still owed are not income.
pub async fn daily_income(
    state: &AppState,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyIncome>, sqlx::Error> {
    sqlx::query_as::<_, DailyIncome>(
        r#"
        SELECT date(paid_on) AS day, TOTAL(amount) AS total
        FROM payments
        WHERE date(paid_on) BETWEEN ? AND ?
          AND status <> ?
        GROUP BY date(paid_on)
        ORDER BY day
        "#,
    )
    .bind(from)
    .bind(to)
    .bind(PaymentStatus::Owed)
    .fetch_all(&state.db_pool)
    .await
}
