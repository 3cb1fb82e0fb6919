use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// JWT Claims structure. Tokens are issued by the account service; this
/// crate only needs the decoded subject.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub email: String,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

pub struct AuthService;

impl AuthService {
    /// Verify and decode a JWT token
    pub fn verify_token(token: &str, config: &Config) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(token_data.claims)
    }

    /// Resolve an acting user from an optional `Authorization` header.
    ///
    /// Anonymous submission is a normal outcome: a missing, malformed, or
    /// expired credential yields `None`, never an error.
    pub fn resolve_user(authorization: Option<&str>, config: &Config) -> Option<Uuid> {
        let token = authorization?.strip_prefix("Bearer ")?;

        match Self::verify_token(token, config) {
            Ok(claims) => Some(claims.sub),
            Err(_) => {
                tracing::warn!("Invalid or expired token, creating anonymous devis");
                None
            }
        }
    }

    /// Generate a JWT token for a user (used by tests and tooling; the
    /// production issuer lives in the account service).
    pub fn generate_token(user_id: Uuid, email: &str, config: &Config) -> AppResult<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + Duration::hours(24);

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            exp: exp.unix_timestamp(),
            iat: now.unix_timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(token)
    }
}
