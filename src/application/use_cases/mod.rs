pub mod auth;
pub mod subscription;
pub mod webhook;
