pub mod app_config;
pub mod config;

pub use config::Config;
