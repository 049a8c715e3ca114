use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use uuid::Uuid;

use crate::application::app_error::{AppError, AppResult};
use crate::application::use_cases::subscription::TravelerRepo;
use crate::domain::entities::subscription_plan::PlanType;
use crate::infra::stripe_client::StripeClient;

pub const EVENT_CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// New subscription end for a paid plan starting at `start`.
///
/// Calendar-aware: `checked_add_months` clamps to the last valid day of the
/// target month, so Jan 31 + 1 month lands on Feb 28 (29 in leap years).
pub fn subscription_end(start: DateTime<Utc>, plan: PlanType) -> Option<DateTime<Utc>> {
    match plan {
        PlanType::Free => None,
        PlanType::Monthly => start.checked_add_months(Months::new(1)),
        PlanType::Yearly => start.checked_add_months(Months::new(12)),
    }
}

/// Processes inbound payment-processor events.
///
/// Delivery is at-least-once; the effect must be at-most-once. Signature and
/// payload problems are logged and swallowed so the processor always sees
/// 200 — misconfigured secrets therefore fail silently on the request path
/// and must be caught from the WARN logs. Storage errors do propagate (the
/// resulting 500 makes the processor redeliver, and the idempotency key
/// makes the redelivery safe).
#[derive(Clone)]
pub struct WebhookUseCases {
    traveler_repo: Arc<dyn TravelerRepo>,
    webhook_secret: SecretString,
}

impl WebhookUseCases {
    pub fn new(traveler_repo: Arc<dyn TravelerRepo>, webhook_secret: SecretString) -> Self {
        Self {
            traveler_repo,
            webhook_secret,
        }
    }

    #[instrument(skip_all)]
    pub async fn handle(&self, raw_body: &str, signature_header: Option<&str>) -> AppResult<()> {
        let Some(signature) = signature_header else {
            tracing::warn!("Webhook rejected: missing signature header");
            return Ok(());
        };

        if let Err(e) = StripeClient::verify_webhook_signature(
            raw_body,
            signature,
            self.webhook_secret.expose_secret(),
        ) {
            tracing::warn!(error = %e, "Webhook rejected: signature verification failed");
            return Ok(());
        }

        let event: serde_json::Value = match serde_json::from_str(raw_body) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Webhook rejected: unparseable payload");
                return Ok(());
            }
        };

        let event_type = event["type"].as_str().unwrap_or("");
        if event_type != EVENT_CHECKOUT_COMPLETED {
            tracing::debug!(event_type, "Ignoring webhook event type");
            return Ok(());
        }

        let session = &event["data"]["object"];
        // The session id doubles as the idempotency key; without it two
        // distinct malformed events would dedupe against each other.
        let Some(session_id) = session["id"].as_str().filter(|id| !id.is_empty()) else {
            tracing::warn!("Webhook aborted: missing session id");
            return Ok(());
        };

        let (traveler_id, plan_type) = match extract_metadata(session) {
            Some(pair) => pair,
            None => {
                tracing::warn!(session_id, "Webhook aborted: missing or invalid metadata");
                return Ok(());
            }
        };

        let now = Utc::now();
        let end = subscription_end(now, plan_type)
            .ok_or_else(|| AppError::Internal("Subscription end date overflow".into()))?;
        let amount_cents = session["amount_total"].as_i64().unwrap_or(0);

        match self
            .traveler_repo
            .apply_checkout_completed(traveler_id, plan_type, now, end, amount_cents, session_id)
            .await?
        {
            Some(payment) => {
                tracing::info!(
                    %traveler_id,
                    plan = plan_type.as_str(),
                    payment_id = %payment.id,
                    session_id,
                    "Subscription activated"
                );
            }
            None => {
                tracing::info!(session_id, "Duplicate webhook delivery ignored");
            }
        }

        Ok(())
    }
}

/// Pull `{travelerId, planType}` back out of the session metadata. Both are
/// required; anything missing or unparseable aborts the whole event.
fn extract_metadata(session: &serde_json::Value) -> Option<(Uuid, PlanType)> {
    let metadata = &session["metadata"];
    let traveler_id = Uuid::parse_str(metadata["travelerId"].as_str()?).ok()?;
    let plan_type = PlanType::parse(metadata["planType"].as_str()?)?;
    Some((traveler_id, plan_type))
}
