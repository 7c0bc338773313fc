//! Command-line definition for the `payroll` binary.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ServerConfig;

/// Egyptian payroll calculator: gross to net, net to gross, and amounts in
/// words.
#[derive(Debug, Parser)]
#[command(name = "payroll", version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file. Flags given here override its values.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `info,payroll_core=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Address to bind.
        #[arg(long)]
        bind: Option<IpAddr>,

        #[arg(short, long)]
        port: Option<u16>,

        /// Answer 422 when the solver only reaches a best-effort gross.
        #[arg(long)]
        strict: bool,
    },

    /// Compute net pay and deductions from a gross salary.
    Net {
        #[arg(value_parser = parse_amount)]
        gross: Decimal,

        /// Insured salary; defaults to the gross capped at the statutory limit.
        #[arg(short, long, value_parser = parse_amount)]
        contribution: Option<Decimal>,
    },

    /// Find the gross salary that produces a net salary.
    Gross {
        #[arg(value_parser = parse_amount)]
        net: Decimal,

        /// Fail instead of printing a best-effort gross.
        #[arg(long)]
        strict: bool,
    },

    /// Spell an amount out in words.
    Words {
        #[arg(value_parser = parse_amount, allow_negative_numbers = true)]
        amount: Decimal,

        /// `en` or `ar`.
        #[arg(short, long, default_value = "en")]
        language: String,
    },
}

impl Cli {
    /// Applies the global and subcommand flags on top of `config`.
    pub fn apply_overrides(
        &self,
        config: &mut ServerConfig,
    ) {
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        match &self.command {
            Command::Serve { bind, port, strict } => {
                if let Some(bind) = bind {
                    config.bind_address = *bind;
                }
                if let Some(port) = port {
                    config.port = *port;
                }
                config.strict_convergence |= *strict;
            }
            Command::Gross { strict, .. } => config.strict_convergence |= *strict,
            Command::Net { .. } | Command::Words { .. } => {}
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{input}' is not an amount")]
pub struct ParseAmountError {
    input: String,
}

/// Parses an amount, allowing `,` as a thousands separator.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized: String = s.trim().chars().filter(|c| *c != ',').collect();
    normalized.parse().map_err(|_| ParseAmountError {
        input: s.to_string(),
    })
}
