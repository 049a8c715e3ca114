use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::subscription_plan::PlanType;

/// Immutable payment record, written only by the webhook processor.
///
/// `transaction_id` is the payment processor's checkout-session id and is
/// UNIQUE at the storage level; it is the idempotency key that makes
/// redelivered webhook events no-ops.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: Uuid,
    pub traveler_id: Uuid,
    pub amount_cents: i64,
    pub plan: PlanType,
    pub status: String,
    pub transaction_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

pub const PAYMENT_STATUS_SUCCEEDED: &str = "succeeded";
