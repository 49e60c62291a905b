pub mod analysis;
pub mod changelog;
pub mod config;
pub mod db;
pub mod fetcher;
pub mod monitor;
pub mod notifications;
pub mod speech;
pub mod web;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
