//! Net-to-gross inverse solver.
//!
//! Finds the gross salary whose capped deduction pipeline yields a target net
//! salary. Net pay is continuous and strictly increasing in gross but only
//! piecewise linear: its slope changes at every tax band edge and at the
//! contribution cap. The solver runs a damped Newton-Raphson iteration on a
//! forward-difference slope and falls back to bisection when the slope is
//! degenerate or Newton fails to settle.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::{Convergence, solve_gross_from_net};
//!
//! let result = solve_gross_from_net(dec!(8302.50)).unwrap();
//!
//! assert!((result.gross_salary - dec!(10000)).abs() < dec!(0.02));
//! assert_eq!(result.convergence, Convergence::Newton);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{MAX_AMOUNT, ensure_positive};
use crate::calculations::contribution::cap_contribution;
use crate::calculations::deductions::DeductionPipeline;
use crate::{Convergence, PayrollError, SolverResult};

/// Tuning parameters for [`GrossSolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Largest acceptable |net − target|, in currency units.
    pub tolerance: Decimal,

    /// First Newton guess as a multiple of the target net.
    pub initial_guess_factor: Decimal,

    /// Forward-difference step as a fraction of the current guess.
    pub derivative_step_ratio: Decimal,

    /// Slopes flatter than this abandon Newton for bisection.
    pub min_slope: Decimal,

    pub max_newton_iterations: u32,
    pub max_bisection_iterations: u32,

    pub bounds: GrossBounds,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
            initial_guess_factor: Decimal::new(15, 1),
            derivative_step_ratio: Decimal::new(1, 3),
            min_slope: Decimal::new(1, 4),
            max_newton_iterations: 50,
            max_bisection_iterations: 50,
            bounds: GrossBounds::default(),
        }
    }
}

impl SolverConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// [`PayrollError::InvalidSolverConfig`] if a tolerance, ratio or factor is
    /// non-positive, an iteration budget is zero, or the bounds are inconsistent.
    pub fn validate(&self) -> Result<(), PayrollError> {
        if self.tolerance <= Decimal::ZERO {
            return Err(PayrollError::InvalidSolverConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.derivative_step_ratio <= Decimal::ZERO {
            return Err(PayrollError::InvalidSolverConfig(format!(
                "derivative step ratio must be positive, got {}",
                self.derivative_step_ratio
            )));
        }
        if self.min_slope <= Decimal::ZERO {
            return Err(PayrollError::InvalidSolverConfig(format!(
                "minimum slope must be positive, got {}",
                self.min_slope
            )));
        }
        if self.max_bisection_iterations == 0 {
            return Err(PayrollError::InvalidSolverConfig(
                "bisection needs at least one iteration".to_string(),
            ));
        }
        self.bounds.validate()?;
        if self.initial_guess_factor < self.bounds.floor_factor
            || self.initial_guess_factor > self.bounds.ceiling_factor
        {
            return Err(PayrollError::InvalidSolverConfig(format!(
                "initial guess factor {} lies outside [{}, {}]",
                self.initial_guess_factor, self.bounds.floor_factor, self.bounds.ceiling_factor
            )));
        }
        Ok(())
    }
}

/// Interval that always contains the gross salary for a target net.
///
/// Deductions never take net pay below roughly 64% of gross, so for this tax
/// model the gross lies in `[net, 5 × net]`. Newton steps that leave the
/// interval are pulled back to a point well inside it, and bisection searches
/// the tighter `[net, 3 × net]`. All bounds are multiples of the target net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrossBounds {
    pub floor_factor: Decimal,
    pub ceiling_factor: Decimal,
    /// Where a Newton step that fell below the floor restarts.
    pub reset_low_factor: Decimal,
    /// Where a Newton step that overshot the ceiling restarts.
    pub reset_high_factor: Decimal,
    pub bisection_ceiling_factor: Decimal,
}

impl Default for GrossBounds {
    fn default() -> Self {
        Self {
            floor_factor: Decimal::ONE,
            ceiling_factor: Decimal::new(5, 0),
            reset_low_factor: Decimal::new(11, 1),
            reset_high_factor: Decimal::new(3, 0),
            bisection_ceiling_factor: Decimal::new(3, 0),
        }
    }
}

impl GrossBounds {
    fn validate(&self) -> Result<(), PayrollError> {
        let ordered = Decimal::ZERO < self.floor_factor
            && self.floor_factor <= self.reset_low_factor
            && self.reset_low_factor <= self.reset_high_factor
            && self.reset_high_factor <= self.ceiling_factor
            && self.floor_factor < self.bisection_ceiling_factor
            && self.bisection_ceiling_factor <= self.ceiling_factor;
        if ordered {
            Ok(())
        } else {
            Err(PayrollError::InvalidSolverConfig(format!(
                "bounds must satisfy 0 < floor <= reset_low <= reset_high <= ceiling \
                 and floor < bisection_ceiling <= ceiling, got {self:?}"
            )))
        }
    }

    /// Pulls a Newton step that left `[floor, ceiling] × target` back inside.
    pub fn clamp(
        &self,
        gross: Decimal,
        target_net: Decimal,
    ) -> Decimal {
        if gross < target_net * self.floor_factor {
            target_net * self.reset_low_factor
        } else if gross > target_net * self.ceiling_factor {
            target_net * self.reset_high_factor
        } else {
            gross
        }
    }

    /// Initial bisection interval for `target_net`.
    pub fn bisection_interval(
        &self,
        target_net: Decimal,
    ) -> (Decimal, Decimal) {
        (
            target_net * self.floor_factor,
            target_net * self.bisection_ceiling_factor,
        )
    }
}

/// Inverts a [`DeductionPipeline`] with the contribution cap applied.
#[derive(Debug, Clone)]
pub struct GrossSolver<'a> {
    pipeline: DeductionPipeline<'a>,
    config: SolverConfig,
}

impl GrossSolver<'static> {
    /// Solver over the statutory pipeline with default tuning.
    pub fn statutory() -> Self {
        Self {
            pipeline: DeductionPipeline::statutory(),
            config: SolverConfig::default(),
        }
    }
}

impl<'a> GrossSolver<'a> {
    /// # Errors
    ///
    /// [`PayrollError::InvalidSolverConfig`] if `config` fails validation.
    pub fn new(
        pipeline: DeductionPipeline<'a>,
        config: SolverConfig,
    ) -> Result<Self, PayrollError> {
        config.validate()?;
        Ok(Self { pipeline, config })
    }

    pub fn pipeline(&self) -> DeductionPipeline<'a> {
        self.pipeline
    }

    /// Finds the gross salary that nets `target_net`.
    ///
    /// A result that misses the tolerance after both phases is still returned,
    /// tagged [`Convergence::BestEffort`]; use [`SolverResult::into_exact`] to
    /// turn it into an error.
    ///
    /// # Errors
    ///
    /// [`PayrollError::InvalidInput`] if `target_net` is not positive or is out
    /// of range.
    pub fn solve(
        &self,
        target_net: Decimal,
    ) -> Result<SolverResult, PayrollError> {
        let target_net = ensure_positive("target_net", target_net)?;
        let config = &self.config;
        // Every evaluated gross stays below ceiling × target plus one derivative step.
        let reach = config.bounds.ceiling_factor * (Decimal::ONE + config.derivative_step_ratio);
        if target_net > MAX_AMOUNT / reach {
            return Err(PayrollError::invalid("target_net", target_net));
        }

        let mut gross = target_net * config.initial_guess_factor;
        for iteration in 1..=config.max_newton_iterations {
            let net = self.net_at(gross)?;
            let error = net - target_net;
            if error.abs() < config.tolerance {
                debug!(%target_net, %gross, iteration, "newton converged");
                return Ok(self.result(target_net, gross, iteration, error, Convergence::Newton));
            }

            let step = gross * config.derivative_step_ratio;
            let slope = (self.net_at(gross + step)? - net) / step;
            let newton_step = match error.checked_div(slope) {
                Some(newton_step) if slope.abs() >= config.min_slope => newton_step,
                _ => {
                    debug!(%target_net, %gross, %slope, "slope too flat, switching to bisection");
                    return self.bisect(target_net, iteration);
                }
            };

            gross = config.bounds.clamp(gross - newton_step, target_net);
        }

        warn!(
            %target_net,
            iterations = config.max_newton_iterations,
            "newton did not converge, switching to bisection"
        );
        self.bisect(target_net, config.max_newton_iterations)
    }

    fn bisect(
        &self,
        target_net: Decimal,
        prior_iterations: u32,
    ) -> Result<SolverResult, PayrollError> {
        let config = &self.config;
        let (mut low, mut high) = config.bounds.bisection_interval(target_net);
        let mut gross = (low + high) / Decimal::TWO;

        for iteration in 1..=config.max_bisection_iterations {
            let difference = self.net_at(gross)? - target_net;
            if difference.abs() < config.tolerance {
                debug!(%target_net, %gross, iteration, "bisection converged");
                return Ok(self.result(
                    target_net,
                    gross,
                    prior_iterations + iteration,
                    difference,
                    Convergence::Bisection,
                ));
            }

            if difference > Decimal::ZERO {
                high = gross;
            } else {
                low = gross;
            }
            gross = (low + high) / Decimal::TWO;
        }

        let residual = self.net_at(gross)? - target_net;
        warn!(
            %target_net,
            %gross,
            %residual,
            "bisection exhausted its budget, returning best-effort gross"
        );
        Ok(self.result(
            target_net,
            gross,
            prior_iterations + config.max_bisection_iterations,
            residual,
            Convergence::BestEffort,
        ))
    }

    fn net_at(
        &self,
        gross: Decimal,
    ) -> Result<Decimal, PayrollError> {
        Ok(self.pipeline.calculate_capped(gross)?.net_salary)
    }

    fn result(
        &self,
        target_net: Decimal,
        gross: Decimal,
        iterations: u32,
        residual: Decimal,
        convergence: Convergence,
    ) -> SolverResult {
        SolverResult {
            target_net,
            gross_salary: gross,
            contribution_salary: cap_contribution(gross).amount(),
            iterations,
            residual,
            convergence,
        }
    }
}

/// Solves with the statutory pipeline and default tuning.
/// See [`GrossSolver::solve`].
pub fn solve_gross_from_net(target_net: Decimal) -> Result<SolverResult, PayrollError> {
    GrossSolver::statutory().solve(target_net)
}
