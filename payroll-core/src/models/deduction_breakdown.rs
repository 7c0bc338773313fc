use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;

/// Result of one pass through the deduction pipeline.
///
/// Amounts are monthly unless the field name says otherwise, and are kept at
/// full precision so the solver can evaluate the pipeline repeatedly without
/// rounding drift. Use [`DeductionBreakdown::rounded`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    pub gross_salary: Decimal,
    pub contribution_salary: Decimal,

    /// Employer's social insurance share. Not deducted from net pay.
    pub company_share: Decimal,
    pub employee_share: Decimal,
    pub martyrs_fund: Decimal,

    /// Annualised income subject to tax, after the personal exemption. May be
    /// negative, in which case no tax is due.
    pub annual_tax_base: Decimal,
    pub annual_tax: Decimal,
    pub monthly_tax: Decimal,

    pub net_salary: Decimal,
}

impl DeductionBreakdown {
    /// Total withheld from the employee: everything between gross and net.
    pub fn total_deductions(&self) -> Decimal {
        self.employee_share + self.monthly_tax + self.martyrs_fund
    }

    /// Copy with every amount rounded half-up to two decimal places.
    pub fn rounded(&self) -> Self {
        Self {
            gross_salary: round_half_up(self.gross_salary),
            contribution_salary: round_half_up(self.contribution_salary),
            company_share: round_half_up(self.company_share),
            employee_share: round_half_up(self.employee_share),
            martyrs_fund: round_half_up(self.martyrs_fund),
            annual_tax_base: round_half_up(self.annual_tax_base),
            annual_tax: round_half_up(self.annual_tax),
            monthly_tax: round_half_up(self.monthly_tax),
            net_salary: round_half_up(self.net_salary),
        }
    }
}
