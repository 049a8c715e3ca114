use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::subscription_plan::PlanType;

/// Traveler profile, 1:1 with a `User` of role TRAVELER.
///
/// The subscription fields are historical: an expired MONTHLY traveler still
/// carries `subscription_plan = Monthly`. Callers must go through
/// `is_subscription_active` / the status projection to get the effective plan.
#[derive(Debug, Clone)]
pub struct Traveler {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub subscription_plan: PlanType,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub is_verified: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Traveler {
    /// Active-subscribed iff the plan is paid and `subscription_end` is in
    /// the future.
    pub fn is_subscription_active(&self, now: DateTime<Utc>) -> bool {
        self.subscription_plan != PlanType::Free
            && self.subscription_end.map(|end| end > now).unwrap_or(false)
    }

    /// Effective plan reported outward: FREE whenever the subscription has
    /// lapsed, regardless of the stored historical value.
    pub fn effective_plan(&self, now: DateTime<Utc>) -> PlanType {
        if self.is_subscription_active(now) {
            self.subscription_plan
        } else {
            PlanType::Free
        }
    }
}
