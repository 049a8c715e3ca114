use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::application::app_error::{AppError, AppResult};
use crate::application::ports::payment_provider::{
    CheckoutMetadata, CheckoutSession, CheckoutUrls, PaymentProviderPort,
};
use crate::domain::entities::payment::Payment;
use crate::domain::entities::subscription_plan::{Plan, PlanType};
use crate::domain::entities::traveler::Traveler;
use crate::domain::entities::user::UserRole;

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait TravelerRepo: Send + Sync {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Traveler>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Traveler>>;

    /// Atomically record a completed checkout: insert the payment row and
    /// update the traveler's subscription window, both or neither.
    ///
    /// Returns `None` when `transaction_id` was already recorded — the
    /// redelivered-event case — in which case nothing is written.
    async fn apply_checkout_completed(
        &self,
        traveler_id: Uuid,
        plan: PlanType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        amount_cents: i64,
        transaction_id: &str,
    ) -> AppResult<Option<Payment>>;
}

// ============================================================================
// Plan Catalog
// ============================================================================

/// Static table of purchasable tiers, built once from config. Read-only.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

impl PlanCatalog {
    pub fn new(monthly_price_id: Option<String>, yearly_price_id: Option<String>) -> Self {
        Self {
            plans: vec![
                Plan {
                    plan_type: PlanType::Free,
                    price_cents: 0,
                    duration: "Lifetime (Limited)",
                    stripe_price_id: None,
                },
                Plan {
                    plan_type: PlanType::Monthly,
                    price_cents: 999,
                    duration: "1 month",
                    stripe_price_id: monthly_price_id,
                },
                Plan {
                    plan_type: PlanType::Yearly,
                    price_cents: 9999,
                    duration: "1 year",
                    stripe_price_id: yearly_price_id,
                },
            ],
        }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn get(&self, plan_type: PlanType) -> Option<&Plan> {
        self.plans.iter().find(|p| p.plan_type == plan_type)
    }
}

// ============================================================================
// Status projection
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStatusView {
    pub plan: PlanType,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
}

// ============================================================================
// Use Cases
// ============================================================================

/// Plan catalog reads, checkout orchestration, and the traveler-facing
/// subscription status projection.
#[derive(Clone)]
pub struct SubscriptionUseCases {
    traveler_repo: Arc<dyn TravelerRepo>,
    payment_provider: Arc<dyn PaymentProviderPort>,
    catalog: PlanCatalog,
    client_url: String,
}

impl SubscriptionUseCases {
    pub fn new(
        traveler_repo: Arc<dyn TravelerRepo>,
        payment_provider: Arc<dyn PaymentProviderPort>,
        catalog: PlanCatalog,
        client_url: String,
    ) -> Self {
        Self {
            traveler_repo,
            payment_provider,
            catalog,
            client_url,
        }
    }

    pub fn plans(&self) -> &[Plan] {
        self.catalog.plans()
    }

    /// Validate eligibility and open a checkout session with the processor.
    ///
    /// There is no upgrade/downgrade path: an active subscription must fully
    /// lapse before a new checkout is allowed.
    #[instrument(skip(self))]
    pub async fn create_checkout(
        &self,
        email: &str,
        role: UserRole,
        plan_type: PlanType,
    ) -> AppResult<CheckoutSession> {
        match role {
            UserRole::Traveler => {}
            UserRole::Admin => return Err(AppError::Forbidden),
        }

        let traveler = self
            .traveler_repo
            .get_by_email(email)
            .await?
            .ok_or(AppError::NotFound)?;

        if plan_type == PlanType::Free {
            return Err(AppError::InvalidInput(
                "Cannot subscribe to FREE plan".into(),
            ));
        }

        if traveler.is_subscription_active(Utc::now()) {
            return Err(AppError::InvalidInput(
                "You already have an active subscription".into(),
            ));
        }

        let plan = self.catalog.get(plan_type).ok_or(AppError::NotFound)?;
        let price_id = plan.stripe_price_id.as_deref().ok_or_else(|| {
            AppError::Internal(format!(
                "No Stripe price id configured for plan {}",
                plan.plan_type.as_str()
            ))
        })?;

        let urls = CheckoutUrls {
            success_url: format!(
                "{}/payment/success?session_id={{CHECKOUT_SESSION_ID}}",
                self.client_url
            ),
            cancel_url: format!("{}/payment/cancel", self.client_url),
        };
        let metadata = CheckoutMetadata {
            traveler_id: traveler.id,
            plan_type,
        };

        self.payment_provider
            .create_checkout_session(price_id, &urls, &metadata)
            .await
    }

    /// Current subscription state as reported to the traveler. The effective
    /// plan is FREE whenever the subscription has lapsed, and `isVerified`
    /// is forced false while inactive.
    #[instrument(skip(self))]
    pub async fn my_status(&self, email: &str) -> AppResult<SubscriptionStatusView> {
        let traveler = self
            .traveler_repo
            .get_by_email(email)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = Utc::now();
        let is_active = traveler.is_subscription_active(now);

        Ok(SubscriptionStatusView {
            plan: traveler.effective_plan(now),
            start: traveler.subscription_start,
            end: traveler.subscription_end,
            is_active,
            is_verified: if is_active { traveler.is_verified } else { false },
        })
    }
}
