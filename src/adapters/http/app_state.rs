use std::sync::Arc;

use crate::{
    application::use_cases::{
        auth::AuthUseCases, subscription::SubscriptionUseCases, webhook::WebhookUseCases,
    },
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub subscription_use_cases: Arc<SubscriptionUseCases>,
    pub webhook_use_cases: Arc<WebhookUseCases>,
}
