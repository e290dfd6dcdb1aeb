use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_web::{
    middleware,
    web::{self, Data},
    App, HttpServer,
};
use log::info;

use gestion_api::{config::Config, configure, db, routes, session_middleware, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("FATAL: {}", e);
        e
    })?;

    let db_pool = db::connect(&config.database_url).await?;

    let state = AppState {
        db_pool,
        static_dir: config.static_dir.clone().into(),
    };

    if let Some((username, password)) = &config.bootstrap_admin {
        db::users::bootstrap_admin(&state, username, password).await?;
    }

    info!(
        "Starting HTTP server on http://{}:{}/",
        config.host, config.port
    );

    let session_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;
    let static_dir = config.static_dir.clone();

    HttpServer::new(move || {
        App::new()
            // enable automatic response compression - usually register this first
            .wrap(middleware::Compress::default())
            .wrap(IdentityMiddleware::default())
            .wrap(session_middleware(session_key.clone(), cookie_secure))
            // enable logger - always register Actix Web Logger middleware last
            .wrap(middleware::Logger::default())
            .app_data(Data::new(state.clone()))
            .service(Files::new("/static", static_dir.clone()))
            .configure(configure)
            .default_service(web::to(routes::default_handler))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
