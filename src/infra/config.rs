use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::application::password;

pub struct AppConfig {
    /// Signing secret for access tokens. Deliberately distinct from the
    /// refresh secret so a leak of one cannot forge the other kind.
    pub jwt_access_secret: SecretString,
    pub jwt_refresh_secret: SecretString,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// Frontend origin used for checkout success/cancel redirects.
    pub client_url: Url,
    pub stripe_secret_key: SecretString,
    pub stripe_webhook_secret: SecretString,
    pub stripe_monthly_price_id: Option<String>,
    pub stripe_yearly_price_id: Option<String>,
    /// Drives cookie attributes: secure + SameSite=None in production,
    /// SameSite=Lax otherwise.
    pub production: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_access_secret = SecretString::new(require("JWT_ACCESS_SECRET").into());
        let jwt_refresh_secret = SecretString::new(require("JWT_REFRESH_SECRET").into());

        let access_token_ttl_secs: i64 = env_or("ACCESS_TOKEN_TTL_SECS", 3600);
        let refresh_token_ttl_days: i64 = env_or("REFRESH_TOKEN_TTL_DAYS", 90);

        // Work factor below 10 is not acceptable for stored credentials.
        let bcrypt_cost: u32 = env_or("BCRYPT_COST", 12).max(password::MIN_COST);

        let database_url = require("DATABASE_URL");
        let bind_addr: SocketAddr = env_or("BIND_ADDR", "127.0.0.1:5000".parse().unwrap());
        let cors_origin: HeaderValue = env_or("CORS_ORIGIN", "http://localhost:3000".to_string())
            .parse()
            .expect("CORS_ORIGIN must be a valid header value");
        let client_url: Url = env_or(
            "CLIENT_URL",
            "http://localhost:3000".parse().expect("valid default url"),
        );

        let stripe_secret_key = SecretString::new(require("STRIPE_SECRET_KEY").into());
        let stripe_webhook_secret = SecretString::new(require("STRIPE_WEBHOOK_SECRET").into());
        // Optional: a plan without a configured price id is simply not
        // purchasable (checkout fails with an internal error naming it).
        let stripe_monthly_price_id = std::env::var("STRIPE_MONTHLY_PRICE_ID").ok();
        let stripe_yearly_price_id = std::env::var("STRIPE_YEARLY_PRICE_ID").ok();

        let production: bool = env_or("PRODUCTION", false);

        Self {
            jwt_access_secret,
            jwt_refresh_secret,
            access_token_ttl: Duration::seconds(access_token_ttl_secs),
            refresh_token_ttl: Duration::days(refresh_token_ttl_days),
            bcrypt_cost,
            database_url,
            bind_addr,
            cors_origin,
            client_url,
            stripe_secret_key,
            stripe_webhook_secret,
            stripe_monthly_price_id,
            stripe_yearly_price_id,
            production,
        }
    }
}

fn require(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} has an invalid value")),
        Err(_) => default,
    }
}
