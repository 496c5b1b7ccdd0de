//! services/api/src/token.rs
//!
//! Issues and validates the signed, stateless session tokens that prove a
//! successful prior login. A token embeds the subject identity and an expiry
//! exactly one hour after issuance; there is no server-side session store and
//! no revocation list, so expiry is the only way a token stops being valid.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed token lifetime: one hour from issuance.
const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

//=========================================================================================
// Claims and Errors
//=========================================================================================

/// The claim set embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user's id.
    pub sub: Uuid,
    /// User email, carried for display convenience.
    pub email: String,
    /// Issued at (unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (unix timestamp, seconds).
    pub exp: i64,
}

/// Why a presented token was rejected. All variants surface to the client as
/// the same opaque 401; the distinction exists for server-side logging only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("no bearer token on the request")]
    Missing,
    #[error("token could not be verified against the signing key")]
    InvalidSignature,
    #[error("token expiry has elapsed")]
    Expired,
}

//=========================================================================================
// The Token Service
//=========================================================================================

/// Signs and verifies session tokens with a process-wide HS256 secret.
///
/// The secret is injected once at construction (from configuration); rotating
/// it invalidates all outstanding tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Creates a new `TokenService` from the configured signing secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a token for a verified identity, expiring one hour from now.
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, email, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validates a presented token and returns its claims.
    ///
    /// A token is valid if and only if its signature verifies against the
    /// service secret AND its expiry has not elapsed. Expiry is compared
    /// against the clock here rather than inside the JWT library so the
    /// boundary is exact: a token is rejected from `exp <= now`, i.e. at
    /// precisely sixty minutes after issuance.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Built-in time checks are disabled; expiry is applied explicitly
        // below with exact boundary semantics.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        let no_required: &[&str] = &[];
        validation.set_required_spec_claims(no_required);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::InvalidSignature)?;

        if token_data.claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}

//=========================================================================================
// Tests
//=========================================================================================
