//! Annual income tax schedule.
//!
//! The statutory schedule is a fixed progressive table. Each band carries the
//! tax accumulated below it, so evaluating an income is a single lookup:
//!
//! | Annual base            | Rate  | Base tax |
//! |------------------------|-------|----------|
//! | 0 – 40,000             | 0%    | 0        |
//! | 40,000 – 55,000        | 10%   | 0        |
//! | 55,000 – 70,000        | 15%   | 1,500    |
//! | 70,000 – 200,000       | 20%   | 3,750    |
//! | 200,000 – 400,000      | 22.5% | 29,750   |
//! | 400,000 – 600,000      | 25%   | 74,750   |
//! | 600,000 – 1,200,000    | 25%   | 124,750  |
//! | above 1,200,000        | 27.5% | 274,750  |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::TaxSchedule;
//!
//! let schedule = TaxSchedule::statutory();
//!
//! assert_eq!(schedule.tax_for(dec!(86800)), dec!(7110.0));
//! assert_eq!(schedule.tax_for(dec!(-5000)), dec!(0));
//! ```

use std::sync::LazyLock;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::TaxBracket;

static STATUTORY: LazyLock<TaxSchedule> = LazyLock::new(|| {
    let schedule = TaxSchedule {
        brackets: vec![
            bracket(0, Some(40_000), Decimal::ZERO, 0),
            bracket(40_000, Some(55_000), Decimal::new(10, 2), 0),
            bracket(55_000, Some(70_000), Decimal::new(15, 2), 1_500),
            bracket(70_000, Some(200_000), Decimal::new(20, 2), 3_750),
            bracket(200_000, Some(400_000), Decimal::new(225, 3), 29_750),
            bracket(400_000, Some(600_000), Decimal::new(25, 2), 74_750),
            bracket(600_000, Some(1_200_000), Decimal::new(25, 2), 124_750),
            bracket(1_200_000, None, Decimal::new(275, 3), 274_750),
        ],
    };
    debug!(bands = schedule.brackets.len(), "statutory tax schedule initialised");
    schedule
});

fn bracket(
    min_income: i64,
    max_income: Option<i64>,
    tax_rate: Decimal,
    base_tax: i64,
) -> TaxBracket {
    TaxBracket {
        min_income: Decimal::from(min_income),
        max_income: max_income.map(Decimal::from),
        tax_rate,
        base_tax: Decimal::from(base_tax),
    }
}

/// Reasons a bracket table cannot be used as a tax schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxScheduleError {
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    #[error("first bracket must start at 0, starts at {0}")]
    FirstBracketNotZero(Decimal),

    #[error("bracket {index} is empty or inverted")]
    EmptyBracket { index: usize },

    #[error("bracket {index} does not start where the previous one ends")]
    NotContiguous { index: usize },

    #[error("only the last bracket may be open-ended (bracket {index})")]
    OpenEndedBeforeLast { index: usize },

    #[error("last bracket must be open-ended")]
    LastBracketBounded,

    #[error("bracket {index} has rate {rate} outside [0, 1]")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} base tax {actual} breaks continuity, expected {expected}")]
    Discontinuous {
        index: usize,
        expected: Decimal,
        actual: Decimal,
    },
}

/// An ordered, validated progressive tax table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxSchedule {
    brackets: Vec<TaxBracket>,
}

impl TaxSchedule {
    /// Builds a schedule after checking that the brackets are contiguous,
    /// strictly increasing, open-ended only at the top and continuous.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, TaxScheduleError> {
        let first = brackets.first().ok_or(TaxScheduleError::NoTaxBrackets)?;
        if first.min_income != Decimal::ZERO {
            return Err(TaxScheduleError::FirstBracketNotZero(first.min_income));
        }
        if first.base_tax != Decimal::ZERO {
            return Err(TaxScheduleError::Discontinuous {
                index: 0,
                expected: Decimal::ZERO,
                actual: first.base_tax,
            });
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
                return Err(TaxScheduleError::InvalidRate {
                    index,
                    rate: bracket.tax_rate,
                });
            }
            match bracket.max_income {
                Some(max) if max <= bracket.min_income => {
                    return Err(TaxScheduleError::EmptyBracket { index });
                }
                Some(_) if index == last_index => {
                    return Err(TaxScheduleError::LastBracketBounded);
                }
                None if index != last_index => {
                    return Err(TaxScheduleError::OpenEndedBeforeLast { index });
                }
                _ => {}
            }
        }

        for (index, pair) in brackets.windows(2).enumerate() {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.max_income != Some(upper.min_income) {
                return Err(TaxScheduleError::NotContiguous { index: index + 1 });
            }
            let expected = lower.tax_at_upper_bound().unwrap_or(lower.base_tax);
            if upper.base_tax != expected {
                return Err(TaxScheduleError::Discontinuous {
                    index: index + 1,
                    expected,
                    actual: upper.base_tax,
                });
            }
        }

        Ok(Self { brackets })
    }

    /// The fixed statutory schedule, built once on first use.
    pub fn statutory() -> &'static TaxSchedule {
        &STATUTORY
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Annual tax owed on `annual_base`. Zero for a non-positive base.
    pub fn tax_for(
        &self,
        annual_base: Decimal,
    ) -> Decimal {
        if annual_base <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        // Validation guarantees an open-ended top band, so a match always exists.
        self.brackets
            .iter()
            .find(|b| b.contains(annual_base))
            .map(|b| b.base_tax + (annual_base - b.min_income) * b.tax_rate)
            .unwrap_or(Decimal::ZERO)
    }
}
