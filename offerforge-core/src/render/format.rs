//! Fixed two-decimal number formatting with locale separators.

use crate::render::i18n::Locale;

/// `100000.0` -> `100 000,00` for Hungarian. Values are printed as given:
/// no currency conversion happens here.
pub fn format_amount(value: f64, locale: Locale) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let sep = locale.thousands_separator();
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(*ch);
    }

    // -0.00 prints as 0,00
    let negative = value < 0.0 && fixed.bytes().any(|b| (b'1'..=b'9').contains(&b));
    format!(
        "{}{}{}{}",
        if negative { "-" } else { "" },
        grouped,
        locale.decimal_separator(),
        frac_part
    )
}

pub fn format_money(value: f64, currency: &str, locale: Locale) -> String {
    format!("{} {}", format_amount(value, locale), currency)
}
