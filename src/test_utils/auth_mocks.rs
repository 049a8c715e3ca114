//! In-memory mock implementations for identity-related repository traits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::app_error::{AppError, AppResult},
    application::use_cases::auth::UserRepo,
    domain::entities::{
        subscription_plan::PlanType,
        traveler::Traveler,
        user::{User, UserRole, UserStatus},
    },
};

/// In-memory `UserRepo`, keyed by email.
///
/// Also holds the traveler profiles created through registration so
/// `create_traveler_account` behaves like the transactional real thing.
#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<String, User>>,
    pub travelers: Mutex<HashMap<String, Traveler>>,
}

impl InMemoryUserRepo {
    pub fn with_users(users: Vec<User>) -> Self {
        let map: HashMap<String, User> =
            users.into_iter().map(|u| (u.email.clone(), u)).collect();
        Self {
            users: Mutex::new(map),
            travelers: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.email.clone(), user);
    }

    pub fn get(&self, email: &str) -> Option<User> {
        self.users.lock().unwrap().get(email).cloned()
    }

    /// Flip an account's status mid-test (deactivation scenarios).
    pub fn set_status(&self, email: &str, status: UserStatus) {
        if let Some(user) = self.users.lock().unwrap().get_mut(email) {
            user.status = status;
        }
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(email).cloned())
    }

    async fn create_traveler_account(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> AppResult<Traveler> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(email) {
            return Err(AppError::InvalidInput("Email already registered".into()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: UserRole::Traveler,
            status: UserStatus::Active,
            need_password_change: false,
            created_at: Some(chrono::Utc::now()),
        };
        let traveler = Traveler {
            id: user.id,
            email: email.to_string(),
            name: name.to_string(),
            subscription_plan: PlanType::Free,
            subscription_start: None,
            subscription_end: None,
            is_verified: false,
            created_at: user.created_at,
        };

        users.insert(email.to_string(), user);
        self.travelers
            .lock()
            .unwrap()
            .insert(email.to_string(), traveler.clone());
        Ok(traveler)
    }
}
