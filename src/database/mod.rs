pub mod achievements;
pub mod connection;
pub mod models;
pub mod progress;
pub mod setup;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use models::*;
