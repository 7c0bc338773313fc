//! JSON bodies. Field names are camelCase on the wire; decimals are
//! serialized as strings and accepted as strings or numbers.

use payroll_core::calculations::common::round_half_up;
use payroll_core::{
    Convergence, DeductionBreakdown, Language, PayrollError, SolverResult, legal_amount_text,
    render_amount,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const SUCCESS: &str = "success";
const ERROR: &str = "error";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateNetRequest {
    pub gross_salary: Decimal,
    /// Absent or non-positive values fall back to the contribution cap.
    #[serde(default)]
    pub contribution_salary: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateGrossRequest {
    pub net_salary: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordsRequest {
    pub amount: Decimal,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownBody {
    pub gross_salary: Decimal,
    pub contribution_salary: Decimal,
    pub company_share: Decimal,
    pub employee_share: Decimal,
    pub martyrs_fund: Decimal,
    pub annual_tax_base: Decimal,
    pub annual_tax: Decimal,
    pub monthly_tax: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
}

impl From<&DeductionBreakdown> for BreakdownBody {
    fn from(breakdown: &DeductionBreakdown) -> Self {
        let rounded = breakdown.rounded();
        Self {
            gross_salary: rounded.gross_salary,
            contribution_salary: rounded.contribution_salary,
            company_share: rounded.company_share,
            employee_share: rounded.employee_share,
            martyrs_fund: rounded.martyrs_fund,
            annual_tax_base: rounded.annual_tax_base,
            annual_tax: rounded.annual_tax,
            monthly_tax: rounded.monthly_tax,
            total_deductions: round_half_up(breakdown.total_deductions()),
            net_salary: rounded.net_salary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateNetResponse {
    pub status: String,
    pub net_salary: Decimal,
    pub breakdown: BreakdownBody,
}

impl CalculateNetResponse {
    pub fn new(breakdown: &DeductionBreakdown) -> Self {
        let breakdown = BreakdownBody::from(breakdown);
        Self {
            status: SUCCESS.to_string(),
            net_salary: breakdown.net_salary,
            breakdown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateGrossResponse {
    pub status: String,
    pub gross_salary: Decimal,
    pub contribution_salary: Decimal,
    /// Net produced by the rounded gross, for the client to display.
    pub net_salary: Decimal,
    pub convergence: Convergence,
    pub iterations: u32,
    pub residual: Decimal,
    pub breakdown: BreakdownBody,
}

impl CalculateGrossResponse {
    /// `breakdown` is the pipeline evaluated at `result.gross_salary`.
    pub fn new(
        result: &SolverResult,
        breakdown: &DeductionBreakdown,
    ) -> Self {
        let breakdown = BreakdownBody::from(breakdown);
        Self {
            status: SUCCESS.to_string(),
            gross_salary: breakdown.gross_salary,
            contribution_salary: breakdown.contribution_salary,
            net_salary: breakdown.net_salary,
            convergence: result.convergence,
            iterations: result.iterations,
            residual: round_half_up(result.residual),
            breakdown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordsResponse {
    pub status: String,
    pub language: String,
    pub words: Vec<String>,
    /// Legal wording with the currency phrase; the bare words for zero and
    /// negative amounts.
    pub text: String,
}

impl WordsResponse {
    /// Renders `amount` rounded to a whole pound.
    pub fn render(
        amount: Decimal,
        language: Language,
    ) -> Result<Self, PayrollError> {
        let words = render_amount(amount, language)?;
        let text = if amount > Decimal::ZERO {
            legal_amount_text(amount, language)?
        } else {
            words.join(" ")
        };
        Ok(Self {
            status: SUCCESS.to_string(),
            language: language.as_str().to_string(),
            words,
            text,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self {
            status: ERROR.to_string(),
            error,
        }
    }
}
