//! Gross-to-net deduction pipeline.
//!
//! # Pipeline
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Company social insurance share: contribution × 18.75% (informational) |
//! | 2    | Employee social insurance share: contribution × 11% |
//! | 3    | Martyrs fund levy: gross × 0.05% |
//! | 4    | Annual tax base: (gross − employee share) × 12 − 20,000 exemption |
//! | 5    | Monthly tax: annual tax from the schedule ÷ 12 |
//! | 6    | Net: gross − employee share − monthly tax − martyrs fund |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::compute_net;
//!
//! let breakdown = compute_net(dec!(10000), dec!(10000)).unwrap();
//!
//! assert_eq!(breakdown.employee_share, dec!(1100));
//! assert_eq!(breakdown.monthly_tax, dec!(592.50));
//! assert_eq!(breakdown.net_salary, dec!(8302.50));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::ensure_non_negative;
use crate::calculations::contribution::cap_contribution;
use crate::calculations::schedule::TaxSchedule;
use crate::{DeductionBreakdown, PayrollError};

pub const COMPANY_SHARE_RATE: Decimal = Decimal::from_parts(1875, 0, 0, false, 4);
pub const EMPLOYEE_SHARE_RATE: Decimal = Decimal::from_parts(11, 0, 0, false, 2);
pub const MARTYRS_FUND_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 4);
/// Personal exemption subtracted from annualised taxable pay.
pub const ANNUAL_EXEMPTION: Decimal = Decimal::from_parts(20_000, 0, 0, false, 0);

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Evaluates the deduction pipeline against a tax schedule.
#[derive(Debug, Clone, Copy)]
pub struct DeductionPipeline<'a> {
    schedule: &'a TaxSchedule,
}

impl DeductionPipeline<'static> {
    /// Pipeline over the statutory tax schedule.
    pub fn statutory() -> Self {
        Self::new(TaxSchedule::statutory())
    }
}

impl<'a> DeductionPipeline<'a> {
    pub fn new(schedule: &'a TaxSchedule) -> Self {
        Self { schedule }
    }

    /// Runs the full pipeline for a gross and contribution salary.
    ///
    /// The contribution salary is taken as given; capping is the caller's
    /// job (see [`DeductionPipeline::calculate_capped`]).
    ///
    /// # Errors
    ///
    /// [`PayrollError::InvalidInput`] if either amount is negative or out of
    /// range.
    pub fn calculate(
        &self,
        gross: Decimal,
        contribution: Decimal,
    ) -> Result<DeductionBreakdown, PayrollError> {
        let gross = ensure_non_negative("gross_salary", gross)?;
        let contribution = ensure_non_negative("contribution_salary", contribution)?;

        let company_share = self.company_share(contribution);
        let employee_share = self.employee_share(contribution);
        let martyrs_fund = self.martyrs_fund(gross);
        let annual_tax_base = self.annual_tax_base(gross, employee_share);
        let annual_tax = self.schedule.tax_for(annual_tax_base);
        let monthly_tax = annual_tax / MONTHS_PER_YEAR;
        let net_salary = gross - employee_share - monthly_tax - martyrs_fund;

        Ok(DeductionBreakdown {
            gross_salary: gross,
            contribution_salary: contribution,
            company_share,
            employee_share,
            martyrs_fund,
            annual_tax_base,
            annual_tax,
            monthly_tax,
            net_salary,
        })
    }

    /// Runs the pipeline with the contribution salary derived from `gross`
    /// by the cap rule.
    pub fn calculate_capped(
        &self,
        gross: Decimal,
    ) -> Result<DeductionBreakdown, PayrollError> {
        self.calculate(gross, cap_contribution(gross).amount())
    }

    fn company_share(
        &self,
        contribution: Decimal,
    ) -> Decimal {
        contribution * COMPANY_SHARE_RATE
    }

    fn employee_share(
        &self,
        contribution: Decimal,
    ) -> Decimal {
        contribution * EMPLOYEE_SHARE_RATE
    }

    fn martyrs_fund(
        &self,
        gross: Decimal,
    ) -> Decimal {
        gross * MARTYRS_FUND_RATE
    }

    fn annual_tax_base(
        &self,
        gross: Decimal,
        employee_share: Decimal,
    ) -> Decimal {
        (gross - employee_share) * MONTHS_PER_YEAR - ANNUAL_EXEMPTION
    }
}

/// Runs the statutory pipeline. See [`DeductionPipeline::calculate`].
pub fn compute_net(
    gross: Decimal,
    contribution: Decimal,
) -> Result<DeductionBreakdown, PayrollError> {
    DeductionPipeline::statutory().calculate(gross, contribution)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, proptest};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::contribution::CONTRIBUTION_CAP;

    fn capped_net(gross: Decimal) -> Decimal {
        DeductionPipeline::statutory()
            .calculate_capped(gross)
            .unwrap()
            .net_salary
    }

    // =========================================================================
    // rate constant tests
    // =========================================================================

    #[test]
    fn rate_constants_match_statutory_values() {
        assert_eq!(COMPANY_SHARE_RATE, dec!(0.1875));
        assert_eq!(EMPLOYEE_SHARE_RATE, dec!(0.11));
        assert_eq!(MARTYRS_FUND_RATE, dec!(0.0005));
        assert_eq!(ANNUAL_EXEMPTION, dec!(20000));
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_ten_thousand_gross() {
        let breakdown = compute_net(dec!(10000), dec!(10000)).unwrap();

        assert_eq!(
            breakdown,
            DeductionBreakdown {
                gross_salary: dec!(10000),
                contribution_salary: dec!(10000),
                company_share: dec!(1875),
                employee_share: dec!(1100),
                martyrs_fund: dec!(5),
                annual_tax_base: dec!(86800),
                annual_tax: dec!(7110),
                monthly_tax: dec!(592.50),
                net_salary: dec!(8302.50),
            }
        );
    }

    #[test]
    fn calculate_net_equals_gross_minus_deductions() {
        let breakdown = compute_net(dec!(23456.78), dec!(14500)).unwrap();

        assert_eq!(
            breakdown.net_salary,
            breakdown.gross_salary - breakdown.total_deductions()
        );
    }

    #[test]
    fn calculate_company_share_is_not_deducted() {
        let breakdown = compute_net(dec!(5000), dec!(5000)).unwrap();

        assert_eq!(breakdown.company_share, dec!(937.5));
        assert_eq!(breakdown.total_deductions(), dec!(552.5));
    }

    #[test]
    fn calculate_below_exemption_owes_no_tax() {
        // (3000 - 330) * 12 - 20000 = 12040, inside the zero-rate band.
        let breakdown = compute_net(dec!(3000), dec!(3000)).unwrap();

        assert_eq!(breakdown.annual_tax_base, dec!(12040));
        assert_eq!(breakdown.monthly_tax, dec!(0));
        assert_eq!(breakdown.net_salary, dec!(2668.5));
    }

    #[test]
    fn calculate_negative_tax_base_owes_no_tax() {
        let breakdown = compute_net(dec!(1000), dec!(1000)).unwrap();

        assert!(breakdown.annual_tax_base < Decimal::ZERO);
        assert_eq!(breakdown.annual_tax, dec!(0));
    }

    #[test]
    fn calculate_zero_gross_yields_zero_breakdown() {
        let breakdown = compute_net(dec!(0), dec!(0)).unwrap();

        assert_eq!(breakdown.net_salary, dec!(0));
        assert_eq!(breakdown.total_deductions(), dec!(0));
        assert_eq!(breakdown.annual_tax_base, dec!(-20000));
    }

    #[test]
    fn calculate_rejects_negative_gross() {
        assert_eq!(
            compute_net(dec!(-1), dec!(0)),
            Err(PayrollError::InvalidInput {
                field: "gross_salary",
                value: dec!(-1)
            })
        );
    }

    #[test]
    fn calculate_rejects_negative_contribution() {
        assert_eq!(
            compute_net(dec!(1000), dec!(-5)),
            Err(PayrollError::InvalidInput {
                field: "contribution_salary",
                value: dec!(-5)
            })
        );
    }

    #[test]
    fn calculate_does_not_cap_explicit_contribution() {
        let breakdown = compute_net(dec!(20000), dec!(20000)).unwrap();

        assert_eq!(breakdown.employee_share, dec!(2200));
    }

    #[test]
    fn calculate_capped_applies_contribution_cap() {
        let breakdown = DeductionPipeline::statutory()
            .calculate_capped(dec!(20000))
            .unwrap();

        assert_eq!(breakdown.contribution_salary, CONTRIBUTION_CAP);
        assert_eq!(breakdown.employee_share, dec!(1595));
    }

    #[test]
    fn calculate_top_band_salary() {
        // (200000 - 1595) * 12 - 20000 = 2360860 annual base.
        let breakdown = DeductionPipeline::statutory()
            .calculate_capped(dec!(200000))
            .unwrap();

        assert_eq!(breakdown.annual_tax_base, dec!(2360860));
        assert_eq!(breakdown.annual_tax, dec!(593986.500));
        assert_eq!(breakdown.rounded().monthly_tax, dec!(49498.88));
    }

    #[test]
    fn rounded_rounds_every_field_to_cents() {
        let breakdown = compute_net(dec!(12345.678), dec!(12345.678)).unwrap().rounded();

        assert_eq!(breakdown.gross_salary, dec!(12345.68));
        assert_eq!(breakdown.employee_share, dec!(1358.02));
        assert_eq!(breakdown.martyrs_fund, dec!(6.17));
    }

    // =========================================================================
    // monotonicity tests
    // =========================================================================

    #[test]
    fn net_is_non_decreasing_across_contribution_cap() {
        let mut gross = dec!(14000);
        let mut previous = capped_net(gross);
        while gross <= dec!(15000) {
            gross += dec!(0.25);
            let net = capped_net(gross);
            assert!(net >= previous, "net fell at gross {gross}: {previous} -> {net}");
            previous = net;
        }
    }

    #[test]
    fn net_is_non_decreasing_over_dense_grid() {
        let mut gross = Decimal::ZERO;
        let mut previous = capped_net(gross);
        while gross <= dec!(250000) {
            gross += dec!(7.5);
            let net = capped_net(gross);
            assert!(net >= previous, "net fell at gross {gross}: {previous} -> {net}");
            previous = net;
        }
    }

    #[test]
    fn net_is_non_decreasing_around_bracket_boundaries() {
        let schedule = TaxSchedule::statutory();
        for bracket in schedule.brackets() {
            let Some(edge) = bracket.max_income else {
                continue;
            };
            // Gross salaries whose annual base lands on `edge`, on either
            // side of the contribution cap.
            let uncapped = (edge + ANNUAL_EXEMPTION) / dec!(12) / (Decimal::ONE - EMPLOYEE_SHARE_RATE);
            let capped = (edge + ANNUAL_EXEMPTION) / dec!(12) + CONTRIBUTION_CAP * EMPLOYEE_SHARE_RATE;
            for centre in [uncapped, capped] {
                let mut gross = centre - Decimal::ONE;
                let mut previous = capped_net(gross);
                while gross < centre + Decimal::ONE {
                    gross += dec!(0.01);
                    let net = capped_net(gross);
                    assert!(net >= previous, "net fell at gross {gross}");
                    previous = net;
                }
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(256))]

        #[test]
        fn prop_net_is_monotonic_in_gross(
            low_cents in 0u64..500_000_000,
            delta_cents in 0u64..5_000_000,
        ) {
            let low = Decimal::new(low_cents as i64, 2);
            let high = low + Decimal::new(delta_cents as i64, 2);

            prop_assert!(capped_net(low) <= capped_net(high));
        }

        #[test]
        fn prop_net_never_exceeds_gross(gross_cents in 0u64..500_000_000) {
            let gross = Decimal::new(gross_cents as i64, 2);
            let breakdown = DeductionPipeline::statutory().calculate_capped(gross).unwrap();

            prop_assert!(breakdown.net_salary <= gross);
            prop_assert!(breakdown.net_salary >= Decimal::ZERO);
        }
    }
}
