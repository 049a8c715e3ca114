//! Test data factories for creating valid test fixtures.
//!
//! Each factory creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{
    subscription_plan::PlanType,
    traveler::Traveler,
    user::{User, UserRole, UserStatus},
};

/// Create a test user with sensible defaults (active traveler).
///
/// The default `password_hash` is not a real bcrypt hash; override it when a
/// test actually verifies a password.
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let mut user = User {
        id: Uuid::new_v4(),
        email: "traveler@example.com".to_string(),
        password_hash: "$2b$04$invalidinvalidinvalidinvalidinvalidinvalidinvalidinv".to_string(),
        role: UserRole::Traveler,
        status: UserStatus::Active,
        need_password_change: false,
        created_at: Some(test_datetime()),
    };
    overrides(&mut user);
    user
}

/// Create a test traveler profile with sensible defaults (no subscription).
pub fn create_test_traveler(overrides: impl FnOnce(&mut Traveler)) -> Traveler {
    let mut traveler = Traveler {
        id: Uuid::new_v4(),
        email: "traveler@example.com".to_string(),
        name: "Test Traveler".to_string(),
        subscription_plan: PlanType::Free,
        subscription_start: None,
        subscription_end: None,
        is_verified: false,
        created_at: Some(test_datetime()),
    };
    overrides(&mut traveler);
    traveler
}

/// Returns a consistent test datetime (2026-01-15 12:00:00 UTC).
fn test_datetime() -> DateTime<Utc> {
    chrono::TimeZone::with_ymd_and_hms(&Utc, 2026, 1, 15, 12, 0, 0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_with_defaults() {
        let user = create_test_user(|_| {});
        assert_eq!(user.role, UserRole::Traveler);
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn test_create_user_with_overrides() {
        let user = create_test_user(|u| {
            u.email = "admin@example.com".to_string();
            u.role = UserRole::Admin;
        });
        assert_eq!(user.email, "admin@example.com");
        assert_eq!(user.role, UserRole::Admin);
    }

    #[test]
    fn test_create_traveler_with_defaults() {
        let traveler = create_test_traveler(|_| {});
        assert_eq!(traveler.subscription_plan, PlanType::Free);
        assert!(traveler.subscription_end.is_none());
        assert!(!traveler.is_verified);
    }
}
