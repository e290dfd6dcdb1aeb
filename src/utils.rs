use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Datelike, NaiveDate};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Argon2::default()
        .hash_password(password.as_bytes(), &SaltString::generate(&mut OsRng))
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Failed to hash password: {}", e);
            AppError::PasswordError(e.to_string())
        })
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(provided: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(provided.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("a long enough password!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("a long enough password!", &hash));
        assert!(!verify_password("another password entirely", &hash));
    }

    #[test]
    fn garbage_hash_does_not_verify() {
        assert!(!verify_password("whatever", "plaintext-from-an-old-table"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn first_of_month_keeps_year_and_month() {
        let day = NaiveDate::from_ymd_opt(2025, 2, 17).unwrap();
        assert_eq!(first_of_month(day), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    }
}
