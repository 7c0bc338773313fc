//! Server configuration.
//!
//! Settings come from an optional TOML file; any field left out takes its
//! default. Command-line flags are applied on top by the binary.
//!
//! ```toml
//! bind_address = "0.0.0.0"
//! port = 8080
//! log_level = "info"
//! log_file = "payroll.log"
//! strict_convergence = true
//!
//! [solver]
//! tolerance = "0.005"
//! max_newton_iterations = 80
//! ```

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use payroll_core::SolverConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors that can occur while loading or validating [`ServerConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {message}")]
    Read { path: PathBuf, message: String },

    #[error("malformed config: {0}")]
    Parse(String),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),

    #[error(transparent)]
    Solver(#[from] payroll_core::PayrollError),
}

/// Everything the `serve` command needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: IpAddr,
    pub port: u16,

    /// Any `EnvFilter` directive; `RUST_LOG` still wins at startup.
    pub log_level: String,
    pub log_file: Option<PathBuf>,

    /// Answer `422` instead of returning a best-effort gross.
    pub strict_convergence: bool,

    pub solver: SolverConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            log_level: "info".to_string(),
            log_file: None,
            strict_convergence: false,
            solver: SolverConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the log directive and the solver tuning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))?;
        self.solver.validate()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}
