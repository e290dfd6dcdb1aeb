use actix_web::cookie::Key;

use crate::errors::AppError;

/// Minimum length accepted for `SESSION_KEY`; shorter keys cannot sign and
/// encrypt the session cookie.
pub const MIN_SESSION_KEY_LEN: usize = 64;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session_key: Key,
    pub cookie_secure: bool,
    pub static_dir: String,
    pub bootstrap_admin: Option<(String, String)>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_str = lookup("SESSION_KEY")
            .ok_or_else(|| AppError::ConfigError("SESSION_KEY is not set".into()))?;
        if key_str.len() < MIN_SESSION_KEY_LEN {
            return Err(AppError::ConfigError(format!(
                "SESSION_KEY must be at least {} bytes long",
                MIN_SESSION_KEY_LEN
            )));
        }

        let port = match lookup("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| AppError::ConfigError(format!("Invalid PORT {:?}: {}", p, e)))?,
            None => 8080,
        };

        let cookie_secure = lookup("COOKIE_SECURE")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let bootstrap_admin = match (lookup("ADMIN_USERNAME"), lookup("ADMIN_PASSWORD")) {
            (Some(user), Some(pwd)) if !user.is_empty() && !pwd.is_empty() => Some((user, pwd)),
            _ => None,
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://gestion.db".to_owned()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            session_key: Key::from(key_str.as_bytes()),
            cookie_secure,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "static".to_owned()),
            bootstrap_admin,
        })
    }
}
