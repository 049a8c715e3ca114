//! Test app state builder for HTTP-level integration testing.
//!
//! Wires in-memory mocks into a real `AppState` so route handlers can be
//! exercised end to end without Postgres or the processor API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::password,
    application::use_cases::{
        auth::AuthUseCases,
        subscription::{PlanCatalog, SubscriptionUseCases},
        webhook::WebhookUseCases,
    },
    domain::entities::traveler::Traveler,
    domain::entities::user::User,
    test_utils::{
        create_test_traveler, create_test_user, InMemoryTravelerRepo, InMemoryUserRepo,
        StubPaymentProvider,
    },
};

/// Signing secrets the built state uses; tests that mint or verify tokens by
/// hand must use the same values.
pub const TEST_ACCESS_SECRET: &str = "access-secret";
pub const TEST_REFRESH_SECRET: &str = "refresh-secret";
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test";

/// Bcrypt work factor for tests. Far below the production floor, so hashing
/// stays fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Builder for creating `AppState` backed by in-memory mocks.
///
/// # Example
///
/// ```ignore
/// let app_state = TestAppStateBuilder::new()
///     .with_active_traveler("t@example.com", "pw123456")
///     .build();
/// ```
pub struct TestAppStateBuilder {
    users: Vec<User>,
    travelers: Vec<Traveler>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            users: vec![],
            travelers: vec![],
        }
    }

    /// Add a user account to the test state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Add a traveler profile to the test state.
    pub fn with_traveler(mut self, traveler: Traveler) -> Self {
        self.travelers.push(traveler);
        self
    }

    /// Add an active traveler account plus its profile, with a real bcrypt
    /// hash of `plain_password` so login works.
    pub fn with_active_traveler(mut self, email: &str, plain_password: &str) -> Self {
        let hash = password::hash(plain_password, TEST_BCRYPT_COST)
            .expect("test password must hash");
        let user = create_test_user(|u| {
            u.email = email.to_string();
            u.password_hash = hash.clone();
        });
        let traveler = create_test_traveler(|t| {
            t.id = user.id;
            t.email = email.to_string();
        });
        self.users.push(user);
        self.travelers.push(traveler);
        self
    }

    /// Build the AppState, returning the billing mocks alongside it for
    /// request and storage assertions.
    pub fn build_with_billing_mocks(
        self,
    ) -> (AppState, Arc<InMemoryTravelerRepo>, Arc<StubPaymentProvider>) {
        let user_repo = Arc::new(InMemoryUserRepo::with_users(self.users));
        let traveler_repo = Arc::new(InMemoryTravelerRepo::with_travelers(self.travelers));
        let payment_provider = Arc::new(StubPaymentProvider::default());

        let access_secret = SecretString::new(TEST_ACCESS_SECRET.to_string().into());
        let refresh_secret = SecretString::new(TEST_REFRESH_SECRET.to_string().into());

        let auth_use_cases = Arc::new(AuthUseCases::new(
            user_repo,
            access_secret.clone(),
            refresh_secret.clone(),
            Duration::hours(1),
            Duration::days(90),
            TEST_BCRYPT_COST,
        ));

        let subscription_use_cases = Arc::new(SubscriptionUseCases::new(
            traveler_repo.clone(),
            payment_provider.clone(),
            PlanCatalog::new(
                Some("price_monthly_test".to_string()),
                Some("price_yearly_test".to_string()),
            ),
            "http://localhost:3000".to_string(),
        ));

        let webhook_use_cases = Arc::new(WebhookUseCases::new(
            traveler_repo.clone(),
            SecretString::new(TEST_WEBHOOK_SECRET.to_string().into()),
        ));

        let config = Arc::new(crate::infra::config::AppConfig {
            jwt_access_secret: access_secret,
            jwt_refresh_secret: refresh_secret,
            access_token_ttl: Duration::hours(1),
            refresh_token_ttl: Duration::days(90),
            bcrypt_cost: TEST_BCRYPT_COST,
            database_url: String::new(),
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            client_url: Url::parse("http://localhost:3000").unwrap(),
            stripe_secret_key: SecretString::new("sk_test_xxx".to_string().into()),
            stripe_webhook_secret: SecretString::new(TEST_WEBHOOK_SECRET.to_string().into()),
            stripe_monthly_price_id: Some("price_monthly_test".to_string()),
            stripe_yearly_price_id: Some("price_yearly_test".to_string()),
            production: false,
        });

        let app_state = AppState {
            config,
            auth_use_cases,
            subscription_use_cases,
            webhook_use_cases,
        };

        (app_state, traveler_repo, payment_provider)
    }

    /// Build the AppState with all configured mocks.
    pub fn build(self) -> AppState {
        self.build_with_billing_mocks().0
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
