pub mod config;
pub mod executor;
pub mod interactive;
pub mod session;
