mod error;
mod toolkit_config;

pub use error::ConfigError;
pub use toolkit_config::*;
