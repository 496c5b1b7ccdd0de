//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::token::TokenError;
use crate::web::state::AppState;

/// The authenticated caller, extracted from a validated bearer token.
///
/// Handlers behind `require_auth` read this from request extensions; it is
/// the only way an identity reaches a handler.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Middleware that validates the bearer token and extracts the caller.
///
/// If valid, inserts an `AuthUser` into request extensions for handlers to
/// use. If missing or invalid in any way, returns the uniform 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract the token from the Authorization header.
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(TokenError::Missing);

    // 2. Check signature and expiry. The specific cause is logged but never
    //    surfaced to the client.
    let claims = token.and_then(|t| state.tokens.validate(t));
    let claims = match claims {
        Ok(claims) => claims,
        Err(cause) => {
            debug!("rejected bearer token: {}", cause);
            return Err(ApiError::Unauthorized);
        }
    };

    // 3. Insert the caller into request extensions.
    req.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        email: claims.email,
    });

    // 4. Continue to the handler.
    Ok(next.run(req).await)
}
