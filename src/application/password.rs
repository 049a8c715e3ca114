use crate::application::app_error::{AppError, AppResult};

/// Minimum acceptable bcrypt work factor for stored credentials.
pub const MIN_COST: u32 = 10;

pub fn hash(plaintext: &str, cost: u32) -> AppResult<String> {
    bcrypt::hash(plaintext, cost).map_err(|e| AppError::Internal(e.to_string()))
}

/// Check a plaintext secret against a stored salted hash. The cost factor is
/// embedded in the hash itself, so verification needs no configuration.
pub fn matches(plaintext: &str, hashed: &str) -> AppResult<bool> {
    bcrypt::verify(plaintext, hashed).map_err(|e| AppError::Internal(e.to_string()))
}
