use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::application::app_error::AppResult;
use crate::domain::entities::subscription_plan::PlanType;

/// Correlation metadata attached to a checkout session. The processor echoes
/// it back verbatim in the completion webhook; it is the only link between a
/// checkout and the subscription it pays for, so it must survive untouched.
#[derive(Debug, Clone)]
pub struct CheckoutMetadata {
    pub traveler_id: Uuid,
    pub plan_type: PlanType,
}

/// Redirect targets for the hosted checkout page.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

/// Result of creating a checkout session with the external processor.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub url: String,
}

/// Payment provider port. The orchestrator never talks to the processor API
/// directly; injecting the port keeps the external client out of process
/// globals and lets tests substitute a recording stub.
#[async_trait]
pub trait PaymentProviderPort: Send + Sync {
    async fn create_checkout_session(
        &self,
        price_id: &str,
        urls: &CheckoutUrls,
        metadata: &CheckoutMetadata,
    ) -> AppResult<CheckoutSession>;
}
