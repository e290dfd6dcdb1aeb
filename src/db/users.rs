use validator::Validate;

use crate::{
    errors::AppError,
    models::users::{NewUser, Role, User},
    utils::{hash_password, verify_password},
    AppState,
};

pub async fn get_all_users(state: &AppState) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id DESC")
        .fetch_all(&state.db_pool)
        .await
}

pub async fn get_user_by_id(state: &AppState, id: i64) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(&state.db_pool)
        .await
}

/// Looks the account up by email when the login contains `@`, by username
/// otherwise. Both are stored lowercase and usernames never contain `@`.
pub async fn find_by_login(state: &AppState, login: &str) -> Result<Option<User>, sqlx::Error> {
    let lc_login = login.trim().to_lowercase();
    let query = if lc_login.contains('@') {
        "SELECT * FROM users WHERE email = $1"
    } else {
        "SELECT * FROM users WHERE username = $1"
    };
    sqlx::query_as::<_, User>(query)
        .bind(lc_login)
        .fetch_optional(&state.db_pool)
        .await
}

/// Returns the user only when the password matches. An unknown login and a
/// wrong password are indistinguishable to the caller.
pub async fn authenticate(
    state: &AppState,
    login: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let user = find_by_login(state, login).await?;
    Ok(user.filter(|u| verify_password(password, &u.pwd_hash)))
}

pub async fn create_user(state: &AppState, new_user: NewUser) -> Result<User, AppError> {
    let created_at = chrono::Utc::now().to_string();
    let pwd_hash = hash_password(&new_user.password)?;
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, pwd_hash, role, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(new_user.username.trim().to_lowercase())
    .bind(new_user.email.map(|e| e.trim().to_lowercase()))
    .bind(pwd_hash)
    .bind(new_user.role)
    .bind(&created_at)
    .bind(&created_at)
    .fetch_one(&state.db_pool)
    .await?;
    log::info!("User created: {} ({})", user.username, user.role.as_str());
    Ok(user)
}

pub async fn update_password(state: &AppState, id: i64, password: &str) -> Result<User, AppError> {
    let updated_at = chrono::Utc::now().to_string();
    let pwd_hash = hash_password(password)?;
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET updated_at = $1, pwd_hash = $2 WHERE id = $3 RETURNING *",
    )
    .bind(&updated_at)
    .bind(pwd_hash)
    .bind(id)
    .fetch_one(&state.db_pool)
    .await?;

    log::info!("Password of user {} updated", user.id);
    Ok(user)
}

pub async fn delete_user(state: &AppState, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    log::info!("User with id {} deleted", id);
    Ok(())
}

/// Creates the configured admin account when no admin exists yet.
pub async fn bootstrap_admin(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<(), AppError> {
    let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(Role::Admin)
        .fetch_one(&state.db_pool)
        .await?;
    if admins > 0 {
        return Ok(());
    }
    let admin = NewUser {
        username: username.to_owned(),
        email: None,
        password: password.to_owned(),
        role: Role::Admin,
    };
    admin.validate()?;
    create_user(state, admin).await?;
    log::info!("Bootstrap admin {} created", username);
    Ok(())
}
