pub mod analysis;
pub mod check_in;
pub mod mood;
pub mod user;
