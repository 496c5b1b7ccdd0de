//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration and login, plus the
//! password hashing helpers they share.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;
use restobook_core::domain::NewUser;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

//=========================================================================================
// Password Hashing Helpers
//=========================================================================================

/// Hashes a raw password with a freshly generated salt.
///
/// The returned PHC string embeds the salt and cost parameters, so it is
/// self-describing for later verification. The raw password must not be
/// referenced again after this call.
pub(crate) fn hash_password(raw_password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw_password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ApiError::Internal("password hashing failed".to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Checks a raw password against a stored PHC hash string.
pub(crate) fn verify_password(raw_password: &str, stored_hash: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
        error!("Failed to parse stored credential hash: {:?}", e);
        ApiError::Internal("credential verification failed".to_string())
    })?;

    Ok(Argon2::default()
        .verify_password(raw_password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Returns the field's value when it is present and not blank.
///
/// Presence is judged after trimming, but the value itself is passed through
/// verbatim: emails are compared byte-for-byte everywhere, and a password's
/// exact bytes are what get hashed.
fn required(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .filter(|v| !v.trim().is_empty())
        .cloned()
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /register - Create a new user account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Missing or blank fields"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. All three fields must be present and non-blank.
    let (name, email, password) = match (
        required(&req.name),
        required(&req.email),
        required(&req.password),
    ) {
        (Some(name), Some(email), Some(password)) => (name, email, password),
        _ => return Err(ApiError::Validation("All fields are required".to_string())),
    };

    // 2. Hash the password. The raw password is dropped after this point.
    let credential_hash = hash_password(&password)?;

    // 3. Insert the new identity. The unique index on email is what decides
    //    duplicates, including between concurrent registrations.
    let user = state
        .identities
        .create_user(NewUser {
            name,
            email,
            credential_hash,
        })
        .await?;

    info!(user_id = %user.user_id, "registered new user");

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
    }))
}

/// POST /login - Verify credentials and issue a bearer token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. An absent or blank field can never match a stored credential, so it
    //    takes the same rejection path as a wrong password.
    let (email, password) = match (required(&req.email), required(&req.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => {
            debug!("login rejected: missing email or password");
            return Err(ApiError::Unauthorized);
        }
    };

    // 2. Look up the stored credentials by exact email.
    let Some(credentials) = state.identities.find_user_by_email(&email).await? else {
        debug!("login rejected: unknown email");
        return Err(ApiError::Unauthorized);
    };

    // 3. Check the password against the stored hash. The rejection is
    //    indistinguishable from the unknown-email case above.
    if !verify_password(&password, &credentials.credential_hash)? {
        debug!(user_id = %credentials.user_id, "login rejected: wrong password");
        return Err(ApiError::Unauthorized);
    }

    // 4. Issue a fresh bearer token for the verified identity.
    let token = state
        .tokens
        .issue(credentials.user_id, &credentials.email)
        .map_err(|e| {
            error!("Failed to sign token: {:?}", e);
            ApiError::Internal("token signing failed".to_string())
        })?;

    info!(user_id = %credentials.user_id, "login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_the_original_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_a_different_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted_per_call() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("secret1", &first).unwrap());
        assert!(verify_password("secret1", &second).unwrap());
    }

    #[test]
    fn stored_hash_is_a_phc_string_not_the_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("secret1"));
    }

    #[test]
    fn malformed_stored_hash_is_an_internal_error() {
        assert!(verify_password("secret1", "not-a-phc-string").is_err());
    }

    #[test]
    fn required_trims_for_presence_but_returns_the_value_verbatim() {
        assert_eq!(required(&None), None);
        assert_eq!(required(&Some(String::new())), None);
        assert_eq!(required(&Some("   ".to_string())), None);
        assert_eq!(
            required(&Some(" ann@x.com ".to_string())),
            Some(" ann@x.com ".to_string())
        );
    }
}
