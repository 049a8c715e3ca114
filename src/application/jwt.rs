use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::application::app_error::{AppError, AppResult};
use crate::domain::entities::user::UserRole;

/// Claims carried by both access and refresh tokens: identity and role,
/// nothing else. The two token kinds are told apart purely by which secret
/// signed them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue(
    email: &str,
    role: UserRole,
    secret: &secrecy::SecretString,
    ttl: Duration,
) -> AppResult<String> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: email.to_owned(),
        role,
        iat: now,
        exp: now + ttl.whole_seconds(),
    };
    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn verify(token: &str, secret: &secrecy::SecretString) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::InvalidToken,
        _ => AppError::MalformedToken,
    })?;

    // Expiry is exact and inclusive: a token is dead the second it expires,
    // so a ttl of zero is rejected immediately. The library only rejects
    // exp < now, which would leave such a token valid for its issuance
    // second.
    if claims.exp <= OffsetDateTime::now_utc().unix_timestamp() {
        return Err(AppError::ExpiredToken);
    }

    Ok(claims)
}
