use chrono::NaiveDate;

use crate::{
    errors::AppError,
    models::rental::{
        Apartment, ApartmentInput, ApartmentStatus, NewRental, Payment, PaymentInput,
        PaymentStatus, Rental, RentalStatus, Tenant, TenantInput,
    },
    AppState,
};

// apartments

pub async fn get_all_apartments(
    state: &AppState,
    status: Option<ApartmentStatus>,
) -> Result<Vec<Apartment>, sqlx::Error> {
    sqlx::query_as::<_, Apartment>(
        "SELECT * FROM apartments WHERE (?1 IS NULL OR status = ?1) ORDER BY number",
    )
    .bind(status)
    .fetch_all(&state.db_pool)
    .await
}

/// `occupied` is only ever set by opening a rental.
pub async fn create_apartment(state: &AppState, input: ApartmentInput) -> Result<i64, AppError> {
    let status = input.status.unwrap_or(ApartmentStatus::Free);
    if status == ApartmentStatus::Occupied {
        return Err(AppError::Validation(
            "A new apartment cannot start occupied; open a rental instead".into(),
        ));
    }
    let id: i64 =
        sqlx::query_scalar("INSERT INTO apartments (number, status) VALUES (?, ?) RETURNING id")
            .bind(input.number.trim())
            .bind(status)
            .fetch_one(&state.db_pool)
            .await?;
    log::info!("Apartment {} created", id);
    Ok(id)
}

/// An apartment is `occupied` exactly while it has an active rental, so the
/// status can only move between `free` and `reserved` here.
pub async fn update_apartment(
    state: &AppState,
    id: i64,
    input: ApartmentInput,
) -> Result<Apartment, AppError> {
    let mut tx = state.db_pool.begin().await?;

    let active: Option<i64> =
        sqlx::query_scalar("SELECT id FROM rentals WHERE apartment_id = ? AND status = ?")
            .bind(id)
            .bind(RentalStatus::Active)
            .fetch_optional(&mut *tx)
            .await?;

    match (input.status, active) {
        (Some(status), Some(rental)) if status != ApartmentStatus::Occupied => {
            return Err(AppError::Conflict(format!(
                "Apartment {} has active rental {}; finish it first",
                id, rental
            )));
        }
        (Some(ApartmentStatus::Occupied), None) => {
            return Err(AppError::Conflict(format!(
                "Apartment {} has no active rental",
                id
            )));
        }
        _ => {}
    }

    let apartment = sqlx::query_as::<_, Apartment>(
        "UPDATE apartments SET number = ?, status = COALESCE(?, status) WHERE id = ? RETURNING *",
    )
    .bind(input.number.trim())
    .bind(input.status)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    log::info!("Apartment {} updated", id);
    Ok(apartment)
}

// tenants

pub async fn get_all_tenants(state: &AppState) -> Result<Vec<Tenant>, sqlx::Error> {
    sqlx::query_as::<_, Tenant>("SELECT * FROM tenants ORDER BY full_name")
        .fetch_all(&state.db_pool)
        .await
}

pub async fn get_tenant_by_id(state: &AppState, id: i64) -> Result<Tenant, sqlx::Error> {
    sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db_pool)
        .await
}

pub async fn create_tenant(state: &AppState, input: TenantInput) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO tenants (
            full_name, document_id, phone, email, origin_address,
            vehicle_brand, vehicle_model, vehicle_plate
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id
        "#,
    )
    .bind(input.full_name.trim())
    .bind(input.document_id)
    .bind(input.phone)
    .bind(input.email)
    .bind(input.origin_address)
    .bind(input.vehicle_brand)
    .bind(input.vehicle_model)
    .bind(input.vehicle_plate)
    .fetch_one(&state.db_pool)
    .await?;
    log::info!("Tenant {} registered", id);
    Ok(id)
}

pub async fn update_tenant(
    state: &AppState,
    id: i64,
    input: TenantInput,
) -> Result<Tenant, sqlx::Error> {
    let tenant = sqlx::query_as::<_, Tenant>(
        r#"
        UPDATE tenants SET full_name = ?, document_id = ?, phone = ?, email = ?,
            origin_address = ?, vehicle_brand = ?, vehicle_model = ?, vehicle_plate = ?
        WHERE id = ? RETURNING *
        "#,
    )
    .bind(input.full_name.trim())
    .bind(input.document_id)
    .bind(input.phone)
    .bind(input.email)
    .bind(input.origin_address)
    .bind(input.vehicle_brand)
    .bind(input.vehicle_model)
    .bind(input.vehicle_plate)
    .bind(id)
    .fetch_one(&state.db_pool)
    .await?;
    log::info!("Tenant {} updated", id);
    Ok(tenant)
}

pub async fn delete_tenant(state: &AppState, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tenants WHERE id = ?")
        .bind(id)
        .execute(&state.db_pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    log::info!("Tenant with id {} deleted", id);
    Ok(())
}

// rentals

pub async fn get_all_rentals(state: &AppState) -> Result<Vec<Rental>, sqlx::Error> {
    sqlx::query_as::<_, Rental>("SELECT * FROM rentals ORDER BY start_date DESC, id DESC")
        .fetch_all(&state.db_pool)
        .await
}

/// Claims a free apartment and opens the rental in one transaction.
pub async fn create_rental(state: &AppState, input: NewRental) -> Result<Rental, AppError> {
    let mut tx = state.db_pool.begin().await?;

    let claimed = sqlx::query("UPDATE apartments SET status = ? WHERE id = ? AND status = ?")
        .bind(ApartmentStatus::Occupied)
        .bind(input.apartment_id)
        .bind(ApartmentStatus::Free)
        .execute(&mut *tx)
        .await?;

    if claimed.rows_affected() == 0 {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM apartments WHERE id = ?")
            .bind(input.apartment_id)
            .fetch_optional(&mut *tx)
            .await?;
        return Err(match exists {
            Some(_) => AppError::Conflict(format!(
                "Apartment {} is not free",
                input.apartment_id
            )),
            None => AppError::NotFound,
        });
    }

    let rental = sqlx::query_as::<_, Rental>(
        "INSERT INTO rentals (apartment_id, tenant_id, status, start_date, end_date) VALUES (?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(input.apartment_id)
    .bind(input.tenant_id)
    .bind(RentalStatus::Active)
    .bind(input.start_date)
    .bind(input.end_date)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    log::info!(
        "Rental {} opened for apartment {}",
        rental.id,
        rental.apartment_id
    );
    Ok(rental)
}

/// Closes an active rental and frees its apartment in one transaction.
pub async fn finish_rental(
    state: &AppState,
    id: i64,
    end_date: NaiveDate,
) -> Result<Rental, AppError> {
    let mut tx = state.db_pool.begin().await?;

    let current = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound)?;

    if current.status != RentalStatus::Active {
        return Err(AppError::Conflict(format!(
            "Rental {} is already finished",
            id
        )));
    }
    if end_date < current.start_date {
        return Err(AppError::Validation(format!(
            "The rental cannot end on {} before it starts on {}",
            end_date, current.start_date
        )));
    }

    let rental = sqlx::query_as::<_, Rental>(
        "UPDATE rentals SET status = ?, end_date = ? WHERE id = ? AND status = ? RETURNING *",
    )
    .bind(RentalStatus::Finished)
    .bind(end_date)
    .bind(id)
    .bind(RentalStatus::Active)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::Conflict(format!("Rental {} is already finished", id)))?;

    sqlx::query("UPDATE apartments SET status = ? WHERE id = ?")
        .bind(ApartmentStatus::Free)
        .bind(rental.apartment_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    log::info!("Rental {} finished on {}", id, end_date);
    Ok(rental)
}

// payments

pub async fn get_all_payments(
    state: &AppState,
    rental_id: Option<i64>,
) -> Result<Vec<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE (?1 IS NULL OR rental_id = ?1) ORDER BY paid_on DESC, id DESC",
    )
    .bind(rental_id)
    .fetch_all(&state.db_pool)
    .await
}

pub async fn create_payment(state: &AppState, input: PaymentInput) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO payments (rental_id, amount, status, paid_on) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(input.rental_id)
    .bind(input.amount)
    .bind(input.status)
    .bind(input.paid_on)
    .fetch_one(&state.db_pool)
    .await?;
    log::info!("Payment {} recorded for rental {}", id, input.rental_id);
    Ok(id)
}

pub async fn update_payment_status(
    state: &AppState,
    id: i64,
    status: PaymentStatus,
) -> Result<Payment, sqlx::Error> {
    let payment =
        sqlx::query_as::<_, Payment>("UPDATE payments SET status = ? WHERE id = ? RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_one(&state.db_pool)
            .await?;
    log::info!("Payment {} marked {:?}", id, status);
    Ok(payment)
}
