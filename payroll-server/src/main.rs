use anyhow::{Context, Result};
use clap::Parser;
use payroll_core::{DeductionPipeline, GrossSolver, Language, cap_contribution};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use payroll_server::api::{
    BreakdownBody, CalculateGrossResponse, CalculateNetResponse, WordsResponse,
};
use payroll_server::cli::{Cli, Command};
use payroll_server::{ServerConfig, logging, run_http_server};

// ─── configuration ───────────────────────────────────────────────────────────

/// Config file (if any), then command-line overrides.
fn load_config(cli: &Cli) -> Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ServerConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

// ─── output ──────────────────────────────────────────────────────────────────

fn print_json<T: Serialize>(body: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(body).context("Failed to encode JSON")?;
    println!("{text}");
    Ok(())
}

fn print_breakdown(breakdown: &BreakdownBody) {
    let rows = [
        ("Gross salary", breakdown.gross_salary),
        ("Contribution salary", breakdown.contribution_salary),
        ("Company share", breakdown.company_share),
        ("Employee share", breakdown.employee_share),
        ("Martyrs fund", breakdown.martyrs_fund),
        ("Annual tax base", breakdown.annual_tax_base),
        ("Annual tax", breakdown.annual_tax),
        ("Monthly tax", breakdown.monthly_tax),
        ("Total deductions", breakdown.total_deductions),
        ("Net salary", breakdown.net_salary),
    ];
    for (label, amount) in rows {
        println!("{label:<20} {amount:>14}");
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

fn net_command(
    gross: Decimal,
    contribution: Option<Decimal>,
    json: bool,
) -> Result<()> {
    let contribution = match contribution {
        Some(c) if c > Decimal::ZERO => c,
        _ => cap_contribution(gross).amount(),
    };
    let breakdown = DeductionPipeline::statutory()
        .calculate(gross, contribution)
        .context("Failed to compute net salary")?;
    let response = CalculateNetResponse::new(&breakdown);

    if json {
        return print_json(&response);
    }
    print_breakdown(&response.breakdown);
    Ok(())
}

fn gross_command(
    config: &ServerConfig,
    net: Decimal,
    json: bool,
) -> Result<()> {
    let solver = GrossSolver::new(DeductionPipeline::statutory(), config.solver.clone())
        .context("Invalid solver configuration")?;

    let mut result = solver.solve(net).context("Failed to solve for gross")?;
    if config.strict_convergence {
        result = result.into_exact()?;
    } else if !result.is_exact() {
        warn!(residual = %result.residual, "best-effort gross; precision degraded");
    }
    debug!(iterations = result.iterations, convergence = ?result.convergence, "solved");

    let breakdown = solver
        .pipeline()
        .calculate(result.gross_salary, result.contribution_salary)
        .context("Failed to evaluate solved gross")?;
    let response = CalculateGrossResponse::new(&result, &breakdown);

    if json {
        return print_json(&response);
    }
    print_breakdown(&response.breakdown);
    println!(
        "{:<20} {:>14}",
        "Convergence",
        format!("{:?} ({})", response.convergence, response.iterations)
    );
    Ok(())
}

fn words_command(
    amount: Decimal,
    language: &str,
    json: bool,
) -> Result<()> {
    let language = Language::parse(language)
        .with_context(|| format!("Unsupported language '{language}' (expected 'en' or 'ar')"))?;

    let response = WordsResponse::render(amount, language)?;

    if json {
        return print_json(&response);
    }
    println!("{}", response.text);
    Ok(())
}

async fn run(
    cli: &Cli,
    config: &ServerConfig,
) -> Result<()> {
    match &cli.command {
        Command::Serve { .. } => run_http_server(config).await,
        Command::Net {
            gross,
            contribution,
        } => net_command(*gross, *contribution, cli.json),
        Command::Gross { net, .. } => gross_command(config, *net, cli.json),
        Command::Words { amount, language } => words_command(*amount, language, cli.json),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(
        cli.log_level
            .as_deref()
            .unwrap_or(logging::DEFAULT_DIRECTIVE),
    )?;

    let config = load_config(&cli)?;
    if std::env::var_os("RUST_LOG").is_none() {
        logging::set_log_level(&config.log_level)?;
    }
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }

    let result = run(&cli, &config).await;
    logging::disable_file_logging();
    result
}
