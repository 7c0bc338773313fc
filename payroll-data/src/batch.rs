//! Batch payroll runs over CSV files.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter.
//!
//! | Column                | Required | Type    | Notes                                         |
//! |-----------------------|----------|---------|-----------------------------------------------|
//! | `employee_id`         | yes      | string  | Copied to the output unchanged                |
//! | `direction`           | yes      | string  | `gross` (gross → net) or `net` (net → gross)  |
//! | `amount`              | yes      | decimal | Gross salary or target net salary             |
//! | `contribution_salary` | no       | decimal | Gross rows only; empty or ≤ 0 applies the cap |
//!
//! ### Example
//!
//! ```csv
//! employee_id,direction,amount,contribution_salary
//! E-001,gross,10000.00,
//! E-002,net,8302.50,
//! ```
//!
//! Every output row carries the full deduction breakdown of the (given or
//! solved) gross salary, rounded to cents, and the gross in legal wording.

use std::io::{Read, Write};

use payroll_core::{
    Convergence, DeductionBreakdown, GrossSolver, Language, PayrollError, cap_contribution,
    legal_amount_text,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while running a payroll batch.
#[derive(Debug, Error)]
pub enum PayrollBatchError {
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("unrecognised direction '{direction}' on row {row} (expected 'gross' or 'net')")]
    InvalidDirection { direction: String, row: usize },

    #[error("row {row}: {source}")]
    Payroll {
        row: usize,
        #[source]
        source: PayrollError,
    },
}

impl From<csv::Error> for PayrollBatchError {
    fn from(err: csv::Error) -> Self {
        PayrollBatchError::Csv(err.to_string())
    }
}

/// Which way a row converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `amount` is a gross salary; compute net.
    Gross,
    /// `amount` is a target net salary; solve for gross.
    Net,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gross" | "gross-to-net" => Some(Self::Gross),
            "net" | "net-to-gross" => Some(Self::Net),
            _ => None,
        }
    }
}

/// A single row of the input CSV.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PayrollRecord {
    pub employee_id: String,
    pub direction: String,
    pub amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub contribution_salary: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// One output row: the breakdown for a processed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub employee_id: String,
    pub direction: Direction,
    pub gross_salary: Decimal,
    pub contribution_salary: Decimal,
    pub company_share: Decimal,
    pub employee_share: Decimal,
    pub martyrs_fund: Decimal,
    pub annual_tax_base: Decimal,
    pub monthly_tax: Decimal,
    pub net_salary: Decimal,
    /// Empty for gross rows.
    pub convergence: Option<Convergence>,
    pub gross_in_words_en: String,
    pub gross_in_words_ar: String,
}

/// Runs rows of a payroll CSV through the deduction pipeline or its inverse.
pub struct PayrollBatch<'a> {
    solver: GrossSolver<'a>,
    strict: bool,
}

impl PayrollBatch<'static> {
    /// Batch over the statutory schedule with default solver tuning.
    pub fn statutory(strict: bool) -> Self {
        Self::new(GrossSolver::statutory(), strict)
    }
}

impl<'a> PayrollBatch<'a> {
    /// With `strict` set, a net row whose solve only reaches a best-effort
    /// estimate fails the batch instead of being written.
    pub fn new(
        solver: GrossSolver<'a>,
        strict: bool,
    ) -> Self {
        Self { solver, strict }
    }

    /// Parse payroll records from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<PayrollRecord>, PayrollBatchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: PayrollRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Process every record. Stops at the first invalid row; row numbers in
    /// errors are 1-based (header = row 0).
    pub fn run(
        &self,
        records: &[PayrollRecord],
    ) -> Result<Vec<BatchOutcome>, PayrollBatchError> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| self.process(record, index + 1))
            .collect()
    }

    /// Write outcomes as CSV with a header row. Returns the number of rows.
    pub fn write<W: Write>(
        writer: W,
        outcomes: &[BatchOutcome],
    ) -> Result<usize, PayrollBatchError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for outcome in outcomes {
            csv_writer.serialize(outcome)?;
        }
        csv_writer
            .flush()
            .map_err(|e| PayrollBatchError::Csv(e.to_string()))?;
        Ok(outcomes.len())
    }

    fn process(
        &self,
        record: &PayrollRecord,
        row: usize,
    ) -> Result<BatchOutcome, PayrollBatchError> {
        let direction = Direction::parse(&record.direction).ok_or_else(|| {
            PayrollBatchError::InvalidDirection {
                direction: record.direction.clone(),
                row,
            }
        })?;
        let at_row = |source| PayrollBatchError::Payroll { row, source };

        let (breakdown, convergence) = match direction {
            Direction::Gross => {
                if record.amount <= Decimal::ZERO {
                    return Err(at_row(PayrollError::InvalidInput {
                        field: "gross_salary",
                        value: record.amount,
                    }));
                }
                let contribution = match record.contribution_salary {
                    Some(c) if c > Decimal::ZERO => c,
                    _ => cap_contribution(record.amount).amount(),
                };
                let breakdown = self
                    .solver
                    .pipeline()
                    .calculate(record.amount, contribution)
                    .map_err(at_row)?;
                (breakdown, None)
            }
            Direction::Net => {
                if record.contribution_salary.is_some() {
                    warn!(
                        employee_id = %record.employee_id,
                        row,
                        "contribution salary ignored for net rows"
                    );
                }
                let mut result = self.solver.solve(record.amount).map_err(at_row)?;
                if self.strict {
                    result = result.into_exact().map_err(at_row)?;
                } else if !result.is_exact() {
                    warn!(
                        employee_id = %record.employee_id,
                        row,
                        residual = %result.residual,
                        "best-effort gross written"
                    );
                }
                let breakdown = self
                    .solver
                    .pipeline()
                    .calculate(result.gross_salary, result.contribution_salary)
                    .map_err(at_row)?;
                (breakdown, Some(result.convergence))
            }
        };

        debug!(employee_id = %record.employee_id, row, ?direction, "row processed");
        outcome(record, direction, &breakdown, convergence).map_err(at_row)
    }
}

fn outcome(
    record: &PayrollRecord,
    direction: Direction,
    breakdown: &DeductionBreakdown,
    convergence: Option<Convergence>,
) -> Result<BatchOutcome, PayrollError> {
    let rounded = breakdown.rounded();
    Ok(BatchOutcome {
        employee_id: record.employee_id.clone(),
        direction,
        gross_salary: rounded.gross_salary,
        contribution_salary: rounded.contribution_salary,
        company_share: rounded.company_share,
        employee_share: rounded.employee_share,
        martyrs_fund: rounded.martyrs_fund,
        annual_tax_base: rounded.annual_tax_base,
        monthly_tax: rounded.monthly_tax,
        net_salary: rounded.net_salary,
        convergence,
        gross_in_words_en: legal_amount_text(breakdown.gross_salary, Language::English)?,
        gross_in_words_ar: legal_amount_text(breakdown.gross_salary, Language::Arabic)?,
    })
}
