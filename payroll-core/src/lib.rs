pub mod calculations;
pub mod error;
pub mod models;
pub mod words;

pub use calculations::{
    DeductionPipeline, GrossSolver, SolverConfig, TaxSchedule, cap_contribution, compute_net,
    solve_gross_from_net,
};
pub use error::PayrollError;
pub use models::*;
pub use words::{legal_amount_text, render_amount, render_words};
