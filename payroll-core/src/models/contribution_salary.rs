use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

/// Salary subject to social insurance contributions.
///
/// Only [`crate::cap_contribution`] builds one, so a value of this type always
/// honours the contribution cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContributionSalary(Decimal);

impl ContributionSalary {
    pub(crate) fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(self) -> Decimal {
        self.0
    }
}

impl From<ContributionSalary> for Decimal {
    fn from(value: ContributionSalary) -> Self {
        value.0
    }
}

impl fmt::Display for ContributionSalary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.0.fmt(f)
    }
}
