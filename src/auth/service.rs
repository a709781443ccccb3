use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::warn;

use crate::{error::ApiError, users::repo::Account};

use super::{dto::Identity, password};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Lookup key normalization, applied wherever an email enters the system so
/// registration and login can never disagree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Field checks shared by public registration and admin user creation.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    password_confirm: &str,
) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    if !is_valid_email(email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password != password_confirm {
        return Err(ApiError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

/// Credential check. Both failure modes return the same rejection, and an
/// unknown email still pays for one argon2 comparison so the paths stay
/// close in timing. Inactive accounts are rejected after the password check
/// for the same reason.
pub async fn verify_credentials(
    db: &PgPool,
    email: &str,
    password: &str,
) -> Result<Identity, ApiError> {
    let email = normalize_email(email);

    let Some(account) = Account::find_by_email(db, &email).await? else {
        let _ = password::verify(password.to_string(), password::DUMMY_HASH.to_string()).await;
        return Err(ApiError::InvalidCredentials);
    };

    let matched = match password::verify(password.to_string(), account.password_hash.clone()).await
    {
        Ok(v) => v,
        Err(err) => {
            // Unreadable stored hash fails closed, like a missing account.
            warn!(user_id = %account.id, error = %err, "stored password hash unreadable");
            false
        }
    };

    if !matched || !account.is_active {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(Identity {
        id: account.id,
        name: account.name,
        email: account.email,
    })
}
