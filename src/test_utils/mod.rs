//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository implementations for mocking persistence
//! - A builder for constructing `AppState` with test dependencies

mod app_state_builder;
mod auth_mocks;
mod billing_mocks;
mod factories;

pub use app_state_builder::*;
pub use auth_mocks::*;
pub use billing_mocks::*;
pub use factories::*;
