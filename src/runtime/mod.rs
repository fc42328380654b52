pub mod lifetime;
pub mod quota_reset;
