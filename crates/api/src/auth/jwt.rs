//! Staff access tokens.
//!
//! A register signs in with a PIN and receives an HS256 token naming the
//! staff member and their role. Only manager-gated routes require it.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use salon_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim of every token this service issues.
pub const TOKEN_ISSUER: &str = "salon-pos";

/// Default lifetime: one 12-hour shift.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 12 * 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Staff id.
    pub sub: DbId,
    /// Role at sign-in (e.g. `"MANAGER"`).
    pub role: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret shared by signing and verification.
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS` (default 720).
    ///
    /// # Panics
    ///
    /// Panics if the secret is missing or empty, or the expiry is not a
    /// positive number of minutes.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.trim().is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|mins| *mins > 0)
                .expect("JWT_ACCESS_EXPIRY_MINS must be a positive integer"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    pub fn lifetime(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_mins)
    }
}

/// A freshly issued token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: i64,
}

pub fn issue_access_token(
    staff_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<AccessToken, jsonwebtoken::errors::Error> {
    let issued_at = Utc::now();
    let lifetime = config.lifetime();
    let claims = Claims {
        sub: staff_id,
        role: role.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        exp: (issued_at + lifetime).timestamp(),
        iat: issued_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok(AccessToken {
        token,
        expires_in: lifetime.num_seconds(),
    })
}

/// Verify signature, expiry and issuer, returning the claims.
pub fn decode_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}
