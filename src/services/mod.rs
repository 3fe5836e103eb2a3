pub mod progress;
pub mod server;
