use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    adapters::{http::app_state::AppState, persistence::PostgresPersistence},
    application::use_cases::{
        auth::{AuthUseCases, UserRepo},
        subscription::{PlanCatalog, SubscriptionUseCases, TravelerRepo},
        webhook::WebhookUseCases,
    },
    infra::{config::AppConfig, db::init_db, stripe_client::StripeClient},
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(PostgresPersistence::new(
        init_db(&config.database_url).await?,
    ));
    let user_repo_arc = postgres_arc.clone() as Arc<dyn UserRepo>;
    let traveler_repo_arc = postgres_arc.clone() as Arc<dyn TravelerRepo>;

    let stripe = Arc::new(StripeClient::new(config.stripe_secret_key.clone()));

    let auth_use_cases = AuthUseCases::new(
        user_repo_arc,
        config.jwt_access_secret.clone(),
        config.jwt_refresh_secret.clone(),
        config.access_token_ttl,
        config.refresh_token_ttl,
        config.bcrypt_cost,
    );

    let catalog = PlanCatalog::new(
        config.stripe_monthly_price_id.clone(),
        config.stripe_yearly_price_id.clone(),
    );
    let subscription_use_cases = SubscriptionUseCases::new(
        traveler_repo_arc.clone(),
        stripe,
        catalog,
        config.client_url.as_str().trim_end_matches('/').to_string(),
    );

    let webhook_use_cases =
        WebhookUseCases::new(traveler_repo_arc, config.stripe_webhook_secret.clone());

    Ok(AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(auth_use_cases),
        subscription_use_cases: Arc::new(subscription_use_cases),
        webhook_use_cases: Arc::new(webhook_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "travelsync_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
