pub mod api;
pub mod cli;
pub mod config;
pub mod logging;

pub use api::{ApiError, AppState, router, run_http_server};
pub use config::{ConfigError, ServerConfig};
