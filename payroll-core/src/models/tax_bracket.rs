use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of the annual income tax schedule.
///
/// `base_tax` is the tax accumulated by every band below `min_income`, so the
/// tax for an income inside this band is `base_tax + tax_rate * (income - min_income)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
}

impl TaxBracket {
    /// Returns true if `income` falls in this band (lower bound exclusive,
    /// upper bound inclusive).
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income > self.min_income && self.max_income.is_none_or(|max| income <= max)
    }

    /// Tax owed once income reaches the top of this band, or `None` for the
    /// open-ended band.
    pub fn tax_at_upper_bound(&self) -> Option<Decimal> {
        self.max_income
            .map(|max| self.base_tax + (max - self.min_income) * self.tax_rate)
    }
}
