use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use payroll_data::PayrollBatch;
use tracing_subscriber::EnvFilter;

/// Run a CSV file of salaries through the payroll engine.
///
/// The CSV file should have the following columns:
/// - employee_id: Any identifier, copied to the output
/// - direction: `gross` to compute net, `net` to solve for gross
/// - amount: The gross salary or the target net salary
/// - contribution_salary: Optional; empty applies the contribution cap
#[derive(Parser, Debug)]
#[command(name = "payroll-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing payroll rows
    #[arg(short, long)]
    file: PathBuf,

    /// Where to write the breakdown CSV (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail the run when a net row only reaches a best-effort gross
    #[arg(short, long, default_value_t = false)]
    strict: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    eprintln!("Reading payroll rows from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = PayrollBatch::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    eprintln!("Parsed {} rows from CSV", records.len());

    let batch = PayrollBatch::statutory(args.strict);
    let outcomes = batch
        .run(&records)
        .context("Failed to process payroll rows")?;

    let written = match &args.output {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("Failed to create: {}", path.display()))?;
            PayrollBatch::write(out, &outcomes)
                .with_context(|| format!("Failed to write: {}", path.display()))?
        }
        None => PayrollBatch::write(io::stdout().lock(), &outcomes)
            .context("Failed to write to stdout")?,
    };

    eprintln!("Successfully wrote {} breakdown rows.", written);

    Ok(())
}
