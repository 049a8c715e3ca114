use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    application::app_error::{AppError, AppResult},
    application::use_cases::subscription::TravelerRepo,
    domain::entities::payment::{Payment, PAYMENT_STATUS_SUCCEEDED},
    domain::entities::subscription_plan::PlanType,
    domain::entities::traveler::Traveler,
};

fn row_to_traveler(row: &sqlx::postgres::PgRow) -> Traveler {
    Traveler {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        subscription_plan: row.get("subscription_plan"),
        subscription_start: row.get("subscription_start"),
        subscription_end: row.get("subscription_end"),
        is_verified: row.get("is_verified"),
        created_at: row.get("created_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, email, name, subscription_plan, subscription_start, subscription_end,
    is_verified, created_at
"#;

#[async_trait]
impl TravelerRepo for PostgresPersistence {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Traveler>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM travelers WHERE email = $1",
            SELECT_COLS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_traveler))
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Traveler>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM travelers WHERE id = $1",
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_traveler))
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
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        // The UNIQUE constraint on transaction_id is the idempotency key:
        // a redelivered event inserts nothing and we bail out before
        // touching the traveler row.
        let inserted = sqlx::query(
            r#"
                INSERT INTO payments (id, traveler_id, amount_cents, plan, status, transaction_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (transaction_id) DO NOTHING
                RETURNING id, traveler_id, amount_cents, plan, status, transaction_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(traveler_id)
        .bind(amount_cents)
        .bind(plan)
        .bind(PAYMENT_STATUS_SUCCEEDED)
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::from)?;

        let Some(row) = inserted else {
            tx.rollback().await.map_err(AppError::from)?;
            return Ok(None);
        };

        let updated = sqlx::query(
            r#"
                UPDATE travelers
                SET subscription_plan = $2,
                    subscription_start = $3,
                    subscription_end = $4,
                    is_verified = true
                WHERE id = $1
            "#,
        )
        .bind(traveler_id)
        .bind(plan)
        .bind(start)
        .bind(end)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(AppError::from)?;
            return Err(AppError::NotFound);
        }

        tx.commit().await.map_err(AppError::from)?;

        Ok(Some(Payment {
            id: row.get("id"),
            traveler_id: row.get("traveler_id"),
            amount_cents: row.get("amount_cents"),
            plan: row.get("plan"),
            status: row.get("status"),
            transaction_id: row.get("transaction_id"),
            created_at: row.get("created_at"),
        }))
    }
}
