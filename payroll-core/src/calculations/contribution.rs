//! Social insurance contribution salary.

use rust_decimal::Decimal;

use crate::ContributionSalary;

/// Ceiling on the salary subject to social insurance contributions.
pub const CONTRIBUTION_CAP: Decimal = Decimal::from_parts(14_500, 0, 0, false, 0);

/// Derives the contribution salary from a gross salary.
///
/// Gross salaries below the cap contribute in full; anything at or above it
/// contributes exactly the cap. Every caller, whether it holds a user-supplied
/// gross or a solver guess, goes through this function.
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::cap_contribution;
///
/// assert_eq!(cap_contribution(dec!(10000)).amount(), dec!(10000));
/// assert_eq!(cap_contribution(dec!(25000)).amount(), dec!(14500));
/// ```
pub fn cap_contribution(gross: Decimal) -> ContributionSalary {
    if gross < CONTRIBUTION_CAP {
        ContributionSalary::new(gross)
    } else {
        ContributionSalary::new(CONTRIBUTION_CAP)
    }
}
