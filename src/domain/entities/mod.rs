pub mod payment;
pub mod subscription_plan;
pub mod traveler;
pub mod user;
