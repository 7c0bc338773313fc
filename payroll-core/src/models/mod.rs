mod contribution_salary;
mod deduction_breakdown;
mod language;
mod solver_result;
mod tax_bracket;

pub use contribution_salary::ContributionSalary;
pub use deduction_breakdown::DeductionBreakdown;
pub use language::Language;
pub use solver_result::{Convergence, SolverResult};
pub use tax_bracket::TaxBracket;
