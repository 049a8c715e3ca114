use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    application::app_error::{AppError, AppResult},
    application::use_cases::auth::UserRepo,
    domain::entities::subscription_plan::PlanType,
    domain::entities::traveler::Traveler,
    domain::entities::user::{User, UserRole, UserStatus},
};

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        status: row.get("status"),
        need_password_change: row.get("need_password_change"),
        created_at: row.get("created_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, email, password_hash, role, status, need_password_change, created_at
"#;

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            SELECT_COLS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn create_traveler_account(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> AppResult<Traveler> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let user_id = Uuid::new_v4();
        sqlx::query(
            r#"
                INSERT INTO users (id, email, password_hash, role, status, need_password_change)
                VALUES ($1, $2, $3, $4, $5, false)
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(password_hash)
        .bind(UserRole::Traveler)
        .bind(UserStatus::Active)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        let row = sqlx::query(
            r#"
                INSERT INTO travelers (id, email, name, subscription_plan, is_verified)
                VALUES ($1, $2, $3, $4, false)
                RETURNING id, email, name, subscription_plan, subscription_start,
                          subscription_end, is_verified, created_at
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(name)
        .bind(PlanType::Free)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;

        Ok(Traveler {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            subscription_plan: row.get("subscription_plan"),
            subscription_start: row.get("subscription_start"),
            subscription_end: row.get("subscription_end"),
            is_verified: row.get("is_verified"),
            created_at: row.get("created_at"),
        })
    }
}
