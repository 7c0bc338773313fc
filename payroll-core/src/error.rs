use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::TaxScheduleError;

/// Errors produced by the payroll engine.
///
/// Every failure is local and recoverable; nothing in the engine panics on
/// bad input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayrollError {
    /// A required amount was negative, non-positive where a positive value is
    /// needed, or outside the supported range.
    #[error("invalid {field}: {value}")]
    InvalidInput { field: &'static str, value: Decimal },

    /// The solver exhausted both its Newton and bisection budgets. Only
    /// raised when a caller asks for an exact result.
    #[error(
        "no gross salary found for net {target_net} within tolerance \
         (best effort {best_effort}, residual {residual})"
    )]
    NonConvergent {
        target_net: Decimal,
        best_effort: Decimal,
        residual: Decimal,
    },

    /// A solver configuration value is outside its valid range.
    #[error("invalid solver configuration: {0}")]
    InvalidSolverConfig(String),

    #[error("invalid tax schedule: {0}")]
    TaxSchedule(#[from] TaxScheduleError),
}

impl PayrollError {
    pub(crate) fn invalid(
        field: &'static str,
        value: Decimal,
    ) -> Self {
        Self::InvalidInput { field, value }
    }
}
