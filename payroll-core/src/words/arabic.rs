//! Arabic amounts.
//!
//! Tens are read units-first joined by "و" (واحد وعشرون), and thousands,
//! millions and billions take the singular, dual or plural form depending on
//! their count. Amounts above a million billion have no rendering.

const ZERO: &str = "صفر";
const ONES: [&str; 10] = [
    "", "واحد", "اثنان", "ثلاثة", "أربعة", "خمسة", "ستة", "سبعة", "ثمانية", "تسعة",
];
const TEENS: [&str; 10] = [
    "عشرة",
    "أحد عشر",
    "اثنا عشر",
    "ثلاثة عشر",
    "أربعة عشر",
    "خمسة عشر",
    "ستة عشر",
    "سبعة عشر",
    "ثمانية عشر",
    "تسعة عشر",
];
const TENS: [&str; 10] = [
    "", "", "عشرون", "ثلاثون", "أربعون", "خمسون", "ستون", "سبعون", "ثمانون", "تسعون",
];
const HUNDREDS: [&str; 10] = [
    "",
    "مائة",
    "مئتان",
    "ثلاثمائة",
    "أربعمائة",
    "خمسمائة",
    "ستمائة",
    "سبعمائة",
    "ثمانمائة",
    "تسعمائة",
];

/// Singular, dual and plural forms of a scale word.
struct Scale {
    value: u64,
    singular: &'static str,
    dual: &'static str,
    plural: &'static str,
}

const BILLION: Scale = Scale {
    value: 1_000_000_000,
    singular: "مليار",
    dual: "ملياران",
    plural: "مليارات",
};
const MILLION: Scale = Scale {
    value: 1_000_000,
    singular: "مليون",
    dual: "مليونان",
    plural: "ملايين",
};
const THOUSAND: Scale = Scale {
    value: 1_000,
    singular: "ألف",
    dual: "ألفان",
    plural: "ألاف",
};

/// Largest renderable amount, a million billion.
pub const LIMIT: u64 = 1_000_000_000_000_000;

/// Renders `amount` in Arabic words, or `None` above [`LIMIT`].
pub fn render(amount: u64) -> Option<Vec<String>> {
    if amount > LIMIT {
        return None;
    }
    if amount == 0 {
        return Some(vec![ZERO.to_string()]);
    }
    Some(
        compose(amount)
            .split_whitespace()
            .map(str::to_string)
            .collect(),
    )
}

fn compose(n: u64) -> String {
    match n {
        0..10 => ONES[n as usize].to_string(),
        10..20 => TEENS[(n - 10) as usize].to_string(),
        20..100 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                units => format!("{} و{tens}", ONES[units as usize]),
            }
        }
        100..1_000 => with_remainder(HUNDREDS[(n / 100) as usize].to_string(), n % 100),
        1_000..1_000_000 => scaled(n, &THOUSAND),
        1_000_000..1_000_000_000 => scaled(n, &MILLION),
        _ => scaled(n, &BILLION),
    }
}

fn scaled(
    n: u64,
    scale: &Scale,
) -> String {
    let count = n / scale.value;
    let head = match count {
        1 => scale.singular.to_string(),
        2 => scale.dual.to_string(),
        3..=10 => format!("{} {}", compose(count), scale.plural),
        _ => format!("{} {}", compose(count), scale.singular),
    };
    with_remainder(head, n % scale.value)
}

fn with_remainder(
    head: String,
    remainder: u64,
) -> String {
    if remainder == 0 {
        head
    } else {
        format!("{head} و{}", compose(remainder))
    }
}
