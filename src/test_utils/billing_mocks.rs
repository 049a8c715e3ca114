//! In-memory mocks for billing: traveler repo, payment provider stub, and a
//! helper that signs webhook payloads the way the processor does.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::{
    application::app_error::{AppError, AppResult},
    application::ports::payment_provider::{
        CheckoutMetadata, CheckoutSession, CheckoutUrls, PaymentProviderPort,
    },
    application::use_cases::subscription::TravelerRepo,
    domain::entities::{
        payment::{Payment, PAYMENT_STATUS_SUCCEEDED},
        subscription_plan::PlanType,
        traveler::Traveler,
    },
};

// ============================================================================
// InMemoryTravelerRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryTravelerRepo {
    pub travelers: Mutex<HashMap<Uuid, Traveler>>,
    pub payments: Mutex<Vec<Payment>>,
}

impl InMemoryTravelerRepo {
    pub fn with_travelers(travelers: Vec<Traveler>) -> Self {
        let map: HashMap<Uuid, Traveler> =
            travelers.into_iter().map(|t| (t.id, t)).collect();
        Self {
            travelers: Mutex::new(map),
            payments: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, traveler: Traveler) {
        self.travelers.lock().unwrap().insert(traveler.id, traveler);
    }

    /// Synchronous read for assertions.
    pub fn get_by_id_sync(&self, id: Uuid) -> Option<Traveler> {
        self.travelers.lock().unwrap().get(&id).cloned()
    }

    pub fn payments_for(&self, traveler_id: Uuid) -> Vec<Payment> {
        self.payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.traveler_id == traveler_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TravelerRepo for InMemoryTravelerRepo {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Traveler>> {
        Ok(self
            .travelers
            .lock()
            .unwrap()
            .values()
            .find(|t| t.email == email)
            .cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Traveler>> {
        Ok(self.travelers.lock().unwrap().get(&id).cloned())
    }

    async fn apply_checkout_completed(
        &self,
        traveler_id: Uuid,
        plan: PlanType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        amount_cents: i64,
        transaction_id: &str,
    ) -> AppResult<Option<Payment>> {
        let mut payments = self.payments.lock().unwrap();
        if payments.iter().any(|p| p.transaction_id == transaction_id) {
            return Ok(None);
        }

        let mut travelers = self.travelers.lock().unwrap();
        let traveler = travelers.get_mut(&traveler_id).ok_or(AppError::NotFound)?;
        traveler.subscription_plan = plan;
        traveler.subscription_start = Some(start);
        traveler.subscription_end = Some(end);
        traveler.is_verified = true;

        let payment = Payment {
            id: Uuid::new_v4(),
            traveler_id,
            amount_cents,
            plan,
            status: PAYMENT_STATUS_SUCCEEDED.to_string(),
            transaction_id: transaction_id.to_string(),
            created_at: Some(Utc::now()),
        };
        payments.push(payment.clone());
        Ok(Some(payment))
    }
}

// ============================================================================
// StubPaymentProvider
// ============================================================================

/// What the stub saw on its last `create_checkout_session` call.
#[derive(Debug, Clone)]
pub struct RecordedCheckout {
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: CheckoutMetadata,
}

/// Payment provider stub that records requests and returns a fixed session.
#[derive(Default)]
pub struct StubPaymentProvider {
    last_request: Mutex<Option<RecordedCheckout>>,
}

impl StubPaymentProvider {
    pub fn last_request(&self) -> Option<RecordedCheckout> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProviderPort for StubPaymentProvider {
    async fn create_checkout_session(
        &self,
        price_id: &str,
        urls: &CheckoutUrls,
        metadata: &CheckoutMetadata,
    ) -> AppResult<CheckoutSession> {
        *self.last_request.lock().unwrap() = Some(RecordedCheckout {
            price_id: price_id.to_string(),
            success_url: urls.success_url.clone(),
            cancel_url: urls.cancel_url.clone(),
            metadata: metadata.clone(),
        });

        Ok(CheckoutSession {
            session_id: "cs_test_stub".to_string(),
            url: "https://checkout.stripe.test/cs_test_stub".to_string(),
        })
    }
}

// ============================================================================
// Webhook signing helper
// ============================================================================

/// Produce a `t=..,v1=..` signature header over `payload`, the same scheme
/// the processor uses, so tests can exercise real verification.
pub fn sign_webhook_payload(payload: &str, secret: &str) -> String {
    let ts = Utc::now().timestamp();
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(format!("{}.{}", ts, payload).as_bytes());
    format!("t={},v1={}", ts, hex::encode(mac.finalize().into_bytes()))
}
