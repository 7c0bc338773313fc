//! Payroll calculations: the statutory tax schedule, the contribution cap,
//! the gross-to-net deduction pipeline and its numerical inverse.

pub mod common;
pub mod contribution;
pub mod deductions;
pub mod schedule;
pub mod solver;

pub use contribution::{CONTRIBUTION_CAP, cap_contribution};
pub use deductions::{DeductionPipeline, compute_net};
pub use schedule::{TaxSchedule, TaxScheduleError};
pub use solver::{GrossBounds, GrossSolver, SolverConfig, solve_gross_from_net};
