pub mod auth;
pub mod check_ins;
pub mod health;
pub mod progress;
