pub mod cli;
pub mod message;
pub mod native_host;
