pub mod config;
pub mod http;
pub mod memory;
pub mod models;
pub mod store;
