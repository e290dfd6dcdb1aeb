use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
    Owner,
    Assistant,
}

impl Role {
    /// Staff roles can work with the rental tool.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Owner | Role::Assistant)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
            Role::Owner => "owner",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub pwd_hash: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if !password.chars().any(|c| c.is_ascii_digit()) || !password.chars().any(|c| c.is_alphabetic())
    {
        return Err(ValidationError::new("weak_password")
            .with_message("Password must contain at least one number and one letter".into()));
    }
    Ok(())
}

/// `@` is reserved for email logins.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.contains('@') {
        return Err(ValidationError::new("username_at")
            .with_message("Username cannot contain '@'".into()));
    }
    Ok(())
}

#[derive(Deserialize, Debug, Validate)]
pub struct Register {
    #[validate(
        length(min = 3, max = 64, message = "Username must be 3 to 64 characters long"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(
        length(min = 12, max = 128, message = "Password must be 12 to 128 characters long"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct NewUser {
    #[validate(
        length(min = 3, max = 64, message = "Username must be 3 to 64 characters long"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(
        length(min = 12, max = 128, message = "Password must be 12 to 128 characters long"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
    pub role: Role,
}

impl From<Register> for NewUser {
    fn from(form: Register) -> Self {
        NewUser {
            username: form.username,
            email: form.email,
            password: form.password,
            role: Role::Client,
        }
    }
}

#[derive(Deserialize, Debug, Validate)]
pub struct Login {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub login: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub password: String,
}

#[derive(Deserialize, Debug, Validate)]
#[validate(schema(function = "validate_passwords_match"))]
pub struct ChangePassword {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(
        length(min = 12, max = 128, message = "Password must be 12 to 128 characters long"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
    pub password2: String,
}

fn validate_passwords_match(form: &ChangePassword) -> Result<(), ValidationError> {
    if form.password != form.password2 {
        return Err(ValidationError::new("password_mismatch")
            .with_message("Passwords do not match".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_cannot_look_like_emails() {
        let register = Register {
            username: "ana@example.com".into(),
            email: None,
            password: "long-enough-pass-1".into(),
        };
        let errors = register.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));

        let staff = NewUser {
            username: "rec@pcion".into(),
            email: None,
            password: "long-enough-pass-1".into(),
            role: Role::Assistant,
        };
        assert!(staff.validate().is_err());
    }

    #[test]
    fn register_rejects_short_or_weak_passwords() {
        let short = Register {
            username: "ana".into(),
            email: None,
            password: "abc123".into(),
        };
        assert!(short.validate().is_err());

        let no_digit = Register {
            username: "ana".into(),
            email: None,
            password: "onlylettershere".into(),
        };
        assert!(no_digit.validate().is_err());

        let ok = Register {
            username: "ana".into(),
            email: Some("ana@example.com".into()),
            password: "turnos-2025-salon".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn register_checks_email_only_when_present() {
        let bad = Register {
            username: "ana".into(),
            email: Some("not-an-email".into()),
            password: "turnos-2025-salon".into(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn change_password_requires_matching_passwords() {
        let form = ChangePassword {
            old_password: "old".into(),
            password: "brand-new-pass-1".into(),
            password2: "brand-new-pass-2".into(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn staff_roles() {
        assert!(Role::Owner.is_staff());
        assert!(Role::Assistant.is_staff());
        assert!(Role::Admin.is_staff());
        assert!(!Role::Client.is_staff());
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            username: "ana".into(),
            email: None,
            pwd_hash: "$argon2id$secret".into(),
            role: Role::Client,
            created_at: "2025-06-01".into(),
            updated_at: "2025-06-01".into(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("pwd_hash").is_none());
        assert_eq!(value["role"], "client");
    }
}
