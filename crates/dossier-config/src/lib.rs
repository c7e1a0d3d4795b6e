pub mod config;
pub mod emphasis;
pub mod error;
pub mod search;
pub mod templates;

pub use config::Config;
pub use error::ConfigError;
