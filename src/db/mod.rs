pub mod check_ins;
pub mod pool;
pub mod sessions;
pub mod users;

pub use pool::create_pool;
