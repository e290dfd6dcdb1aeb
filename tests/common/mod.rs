#![allow(dead_code, unused_macros)]

use std::str::FromStr;

use gestion_api::{
    db,
    models::users::{NewUser, Role},
    AppState,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const PASSWORD: &str = "salon-and-rentals-2025";

/// Fresh in-memory database with every migration applied. One connection
/// only, so every query sees the same memory database.
pub async fn test_state() -> AppState {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("sqlite options")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .expect("in-memory pool");
    db::run_migrations(&pool).await.expect("migrations");
    AppState {
        db_pool: pool,
        static_dir: "static".into(),
    }
}

pub async fn seed_user(state: &AppState, username: &str, role: Role) -> i64 {
    db::users::create_user(
        state,
        NewUser {
            username: username.to_owned(),
            email: Some(format!("{}@example.com", username)),
            password: PASSWORD.to_owned(),
            role,
        },
    )
    .await
    .expect("seed user")
    .id
}

macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_identity::IdentityMiddleware::default())
                .wrap(gestion_api::session_middleware(
                    actix_web::cookie::Key::from(&[7u8; 64]),
                    false,
                ))
                .app_data(actix_web::web::Data::new($state))
                .configure(gestion_api::configure)
                .default_service(actix_web::web::to(gestion_api::routes::default_handler)),
        )
        .await
    };
}

/// Logs in through the JSON endpoint and returns the session cookie.
macro_rules! login {
    ($app:expr, $login:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "login": $login, "password": common::PASSWORD }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::OK,
            "login failed for {}",
            $login
        );
        resp.response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned()
    }};
}
