//! Number-to-words rendering for amounts printed on payroll documents.
//!
//! Amounts are rounded to the nearest whole pound before rendering. Each
//! language has its own digit-grouping rules; see [`english`] and [`arabic`].

pub mod arabic;
pub mod english;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::calculations::common::{MAX_AMOUNT, ensure_positive, round_to_whole};
use crate::{Language, PayrollError};

const ENGLISH_CURRENCY_SUFFIX: &str = "Egyptian Pounds Only";
const ARABIC_CURRENCY_PREFIX: &str = "فقط";
const ARABIC_CURRENCY_SUFFIX: &str = "جنيهاً مصرياً لا غير";

/// Renders a whole amount as a sequence of words.
///
/// # Errors
///
/// [`PayrollError::InvalidInput`] for Arabic input that is negative or too
/// large for the Arabic grouping rules.
///
/// ```
/// use payroll_core::{Language, render_words};
///
/// assert_eq!(render_words(0, Language::English).unwrap(), vec!["Zero"]);
/// assert_eq!(
///     render_words(1001, Language::English).unwrap().join(" "),
///     "One Thousand One"
/// );
/// assert_eq!(render_words(100, Language::Arabic).unwrap().join(" "), "مائة");
/// ```
pub fn render_words(
    amount: i64,
    language: Language,
) -> Result<Vec<String>, PayrollError> {
    match language {
        Language::English => Ok(english::render(amount)),
        Language::Arabic => {
            let unsigned = u64::try_from(amount)
                .map_err(|_| PayrollError::invalid("amount", Decimal::from(amount)))?;
            arabic::render(unsigned)
                .ok_or_else(|| PayrollError::invalid("amount", Decimal::from(amount)))
        }
    }
}

/// Rounds `amount` to a whole unit (halves away from zero) and renders it.
pub fn render_amount(
    amount: Decimal,
    language: Language,
) -> Result<Vec<String>, PayrollError> {
    let whole = round_to_whole(amount);
    if whole.abs() > MAX_AMOUNT {
        return Err(PayrollError::invalid("amount", amount));
    }
    let whole = whole
        .to_i64()
        .ok_or_else(|| PayrollError::invalid("amount", amount))?;
    render_words(whole, language)
}

/// The full legal wording of a positive amount, with the currency phrase.
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::{Language, legal_amount_text};
///
/// assert_eq!(
///     legal_amount_text(dec!(1500.4), Language::English).unwrap(),
///     "One Thousand Five Hundred Egyptian Pounds Only"
/// );
/// ```
pub fn legal_amount_text(
    amount: Decimal,
    language: Language,
) -> Result<String, PayrollError> {
    let amount = ensure_positive("amount", amount)?;
    let words = render_amount(amount, language)?.join(" ");
    Ok(match language {
        Language::English => format!("{words} {ENGLISH_CURRENCY_SUFFIX}"),
        Language::Arabic => {
            format!("{ARABIC_CURRENCY_PREFIX} {words} {ARABIC_CURRENCY_SUFFIX}")
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn render_words_english_zero() {
        assert_eq!(render_words(0, Language::English).unwrap(), vec!["Zero"]);
    }

    #[test]
    fn render_words_arabic_rejects_negative() {
        assert_eq!(
            render_words(-5, Language::Arabic),
            Err(PayrollError::InvalidInput {
                field: "amount",
                value: dec!(-5)
            })
        );
    }

    #[test]
    fn render_words_arabic_renders_billions() {
        assert_eq!(
            render_words(3_000_000_000, Language::Arabic).unwrap(),
            vec!["ثلاثة", "مليارات"]
        );
    }

    #[test]
    fn render_words_arabic_rejects_above_a_million_billion() {
        assert!(render_words(1_000_000_000_000_001, Language::Arabic).is_err());
    }

    #[test]
    fn legal_amount_text_covers_every_accepted_amount() {
        assert!(legal_amount_text(MAX_AMOUNT, Language::Arabic).is_ok());
        assert!(legal_amount_text(MAX_AMOUNT, Language::English).is_ok());
    }

    #[test]
    fn render_amount_rounds_to_nearest_unit() {
        assert_eq!(
            render_amount(dec!(8302.50), Language::English).unwrap().join(" "),
            "Eight Thousand Three Hundred Three"
        );
        assert_eq!(
            render_amount(dec!(8302.49), Language::English).unwrap().join(" "),
            "Eight Thousand Three Hundred Two"
        );
    }

    #[test]
    fn render_amount_rejects_out_of_range() {
        assert!(render_amount(MAX_AMOUNT * dec!(10), Language::English).is_err());
    }

    #[test]
    fn legal_amount_text_english() {
        assert_eq!(
            legal_amount_text(dec!(10000), Language::English).unwrap(),
            "Ten Thousand Egyptian Pounds Only"
        );
    }

    #[test]
    fn legal_amount_text_arabic() {
        assert_eq!(
            legal_amount_text(dec!(2000), Language::Arabic).unwrap(),
            "فقط ألفان جنيهاً مصرياً لا غير"
        );
    }

    #[test]
    fn legal_amount_text_rejects_zero() {
        assert!(legal_amount_text(dec!(0), Language::Arabic).is_err());
    }
}
