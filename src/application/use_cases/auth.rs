use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Serialize;
use time::Duration;
use tracing::instrument;

use crate::application::app_error::{AppError, AppResult};
use crate::application::{jwt, password};
use crate::domain::entities::traveler::Traveler;
use crate::domain::entities::user::{User, UserProfile, UserStatus};

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create the User (role TRAVELER, status ACTIVE) and the Traveler
    /// profile in a single transaction. Fails on duplicate email.
    async fn create_traveler_account(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> AppResult<Traveler>;
}

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub need_password_change: bool,
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub access_token: String,
    pub need_password_change: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisteredTraveler {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
}

// ============================================================================
// Use Cases
// ============================================================================

/// Session manager: login, session refresh, and "who am I" resolution.
///
/// Tokens are stateless bearer credentials — nothing is tracked server-side,
/// so revocation is only as timely as expiry or a status flip to INACTIVE.
/// Every operation here re-checks ACTIVE against the store; the request-path
/// authorization gate deliberately does not (see `adapters::http::guard`).
#[derive(Clone)]
pub struct AuthUseCases {
    user_repo: Arc<dyn UserRepo>,
    access_secret: SecretString,
    refresh_secret: SecretString,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthUseCases {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        access_secret: SecretString,
        refresh_secret: SecretString,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            user_repo,
            access_secret,
            refresh_secret,
            access_token_ttl,
            refresh_token_ttl,
            bcrypt_cost,
        }
    }

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// Unknown email and wrong password both surface as `InvalidCredentials`
    /// so the response never reveals which field was wrong.
    #[instrument(skip(self, plain_password))]
    pub async fn login(&self, email: &str, plain_password: &str) -> AppResult<LoginOutcome> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if user.status != UserStatus::Active {
            return Err(AppError::Forbidden);
        }

        if !password::matches(plain_password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let access_token = jwt::issue(
            &user.email,
            user.role,
            &self.access_secret,
            self.access_token_ttl,
        )?;
        let refresh_token = jwt::issue(
            &user.email,
            user.role,
            &self.refresh_secret,
            self.refresh_token_ttl,
        )?;

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            need_password_change: user.need_password_change,
        })
    }

    /// Exchange a valid refresh token for a fresh access token. The refresh
    /// token itself is not rotated; it stays valid until its own expiry.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshOutcome> {
        // Verification detail (expired vs malformed vs forged) must not leak.
        let claims = jwt::verify(refresh_token, &self.refresh_secret)
            .map_err(|_| AppError::InvalidCredentials)?;

        let user = self
            .user_repo
            .get_by_email(&claims.sub)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if user.status != UserStatus::Active {
            return Err(AppError::Forbidden);
        }

        // Role comes from the freshly loaded identity, not the presented
        // token: a refresh can never escalate beyond what the store says.
        let access_token = jwt::issue(
            &user.email,
            user.role,
            &self.access_secret,
            self.access_token_ttl,
        )?;

        Ok(RefreshOutcome {
            access_token,
            need_password_change: user.need_password_change,
        })
    }

    /// Resolve the caller's identity from a presented access token.
    ///
    /// Re-checks ACTIVE status like login/refresh do, so a deactivated
    /// account is locked out of all session-manager operations uniformly.
    #[instrument(skip_all)]
    pub async fn get_me(&self, access_token: &str) -> AppResult<UserProfile> {
        let claims = jwt::verify(access_token, &self.access_secret)
            .map_err(|_| AppError::InvalidCredentials)?;

        let user = self
            .user_repo
            .get_by_email(&claims.sub)
            .await?
            .ok_or(AppError::NotFound)?;

        if user.status != UserStatus::Active {
            return Err(AppError::Forbidden);
        }

        Ok(UserProfile::from(&user))
    }

    /// Traveler registration: hash the password and create user + profile.
    #[instrument(skip(self, plain_password))]
    pub async fn register_traveler(
        &self,
        email: &str,
        plain_password: &str,
        name: &str,
    ) -> AppResult<RegisteredTraveler> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(AppError::InvalidInput("Invalid email address".into()));
        }
        if plain_password.len() < 6 {
            return Err(AppError::InvalidInput(
                "Password must be at least 6 characters".into(),
            ));
        }

        let hashed = password::hash(plain_password, self.bcrypt_cost)?;
        let traveler = self
            .user_repo
            .create_traveler_account(email, &hashed, name)
            .await?;

        Ok(RegisteredTraveler {
            id: traveler.id,
            email: traveler.email,
            name: traveler.name,
        })
    }
}
