use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PayrollError;

/// How the inverse solver arrived at its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Convergence {
    /// Newton-Raphson met the tolerance.
    Newton,
    /// Newton gave up and the bisection fallback met the tolerance.
    Bisection,
    /// Neither phase met the tolerance; the gross is the last bisection
    /// midpoint and its precision is degraded.
    BestEffort,
}

/// Gross salary recovered from a target net salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverResult {
    pub target_net: Decimal,
    pub gross_salary: Decimal,
    /// Contribution salary derived from `gross_salary` by the cap rule.
    pub contribution_salary: Decimal,
    /// Newton plus bisection iterations performed.
    pub iterations: u32,
    /// Net produced by `gross_salary` minus the target.
    pub residual: Decimal,
    pub convergence: Convergence,
}

impl SolverResult {
    pub fn is_exact(&self) -> bool {
        self.convergence != Convergence::BestEffort
    }

    /// Returns the result unchanged if it met the tolerance, or
    /// [`PayrollError::NonConvergent`] for a best-effort estimate.
    pub fn into_exact(self) -> Result<Self, PayrollError> {
        if self.is_exact() {
            Ok(self)
        } else {
            Err(PayrollError::NonConvergent {
                target_net: self.target_net,
                best_effort: self.gross_salary,
                residual: self.residual,
            })
        }
    }
}
