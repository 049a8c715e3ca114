use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_plan", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanType {
    Free,
    Monthly,
    Yearly,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Free => "FREE",
            PlanType::Monthly => "MONTHLY",
            PlanType::Yearly => "YEARLY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FREE" => Some(PlanType::Free),
            "MONTHLY" => Some(PlanType::Monthly),
            "YEARLY" => Some(PlanType::Yearly),
            _ => None,
        }
    }
}

/// One purchasable (or free) subscription tier.
///
/// `stripe_price_id` is the external price reference attached at checkout;
/// `Free` never has one and is never purchasable.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub price_cents: i64,
    pub duration: &'static str,
    #[serde(rename = "stripePriceId")]
    pub stripe_price_id: Option<String>,
}
