//! English amounts: three-digit groups with short-scale names.

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];
const TEENS: [&str; 10] = [
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];
// u64::MAX has seven three-digit groups.
const SCALES: [&str; 7] = [
    "",
    "Thousand",
    "Million",
    "Billion",
    "Trillion",
    "Quadrillion",
    "Quintillion",
];

/// Renders `amount` in English words, e.g. `1001` → `One Thousand One`.
pub fn render(amount: i64) -> Vec<String> {
    if amount == 0 {
        return vec!["Zero".to_string()];
    }

    let mut words = Vec::new();
    if amount < 0 {
        words.push("Negative");
    }

    let mut groups = Vec::with_capacity(SCALES.len());
    let mut remaining = amount.unsigned_abs();
    while remaining > 0 {
        groups.push((remaining % 1000) as usize);
        remaining /= 1000;
    }

    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        push_hundreds(&mut words, group);
        if !SCALES[scale].is_empty() {
            words.push(SCALES[scale]);
        }
    }

    words.into_iter().map(str::to_string).collect()
}

fn push_hundreds(
    words: &mut Vec<&'static str>,
    mut group: usize,
) {
    if group >= 100 {
        words.push(ONES[group / 100]);
        words.push("Hundred");
        group %= 100;
    }
    if group >= 20 {
        words.push(TENS[group / 10]);
        group %= 10;
    }
    if group >= 10 {
        words.push(TEENS[group - 10]);
        group = 0;
    }
    if group > 0 {
        words.push(ONES[group]);
    }
}
