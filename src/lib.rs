#[macro_use]
extern crate lazy_static;

use std::path::PathBuf;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    cookie::Key,
    web::{self, FormConfig, JsonConfig, PathConfig, QueryConfig},
};
use sqlx::SqlitePool;
use tera::Tera;

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod reports;
pub mod routes;
pub mod utils;

use errors::AppError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub static_dir: PathBuf,
}

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = match Tera::new("templates/**/*") {
            Ok(t) => t,
            Err(e) => {
                log::error!("Parsing error(s): {}", e);
                ::std::process::exit(1);
            }
        };
        tera.autoescape_on(vec![".html"]);
        tera
    };
}

pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(secure)
        .build()
}

/// Registers every page and API scope, plus extractor configs that turn
/// malformed input into the JSON error envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid JSON body: {}", err)).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid query string: {}", err)).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid path parameter: {}", err)).into()
    }))
    .app_data(FormConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid form data: {}", err)).into()
    }))
    .configure(routes::auth::configure)
    .configure(routes::salon::configure)
    .configure(routes::rental::configure)
    .configure(routes::students::configure)
    .configure(routes::pages::configure);
}
