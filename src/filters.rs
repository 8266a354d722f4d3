//! Money formatting for the rendered report.
//!
//! Format: sign + currency symbol + whole units with thousands separator.
//! The symbol always sits directly against the digits; no whitespace is
//! ever emitted between them.

/// CSS class for amounts above zero.
pub const POSITIVE_CLASS: &str = "positive";
/// CSS class for amounts below zero and for over-budget remainders.
pub const NEGATIVE_CLASS: &str = "negative";
/// CSS class for the grouped row of zero-valued entries.
pub const ZERO_CLASS: &str = "zero";

/// Format cents as a signed whole-unit amount, e.g. -12345 -> "-$123".
pub fn format_amount(cents: i64, symbol: &str) -> String {
    let units = round_to_units(cents);
    if units < 0 {
        format!("-{}{}", symbol, format_with_thousands(-units))
    } else {
        format!("{}{}", symbol, format_with_thousands(units))
    }
}

/// Format the magnitude only, e.g. -12345 -> "$123".
pub fn format_magnitude(cents: i64, symbol: &str) -> String {
    format!(
        "{}{}",
        symbol,
        format_with_thousands(round_to_units(cents).abs())
    )
}

/// CSS class for a signed amount; zero gets no color class.
pub fn amount_class(cents: i64) -> &'static str {
    if cents > 0 {
        POSITIVE_CLASS
    } else if cents < 0 {
        NEGATIVE_CLASS
    } else {
        ""
    }
}

/// Share of `total` formatted as "12.3%", rounded to one decimal place.
/// A zero (or negative) total suppresses the percentage instead of
/// dividing by zero.
pub fn percent_of(weight_cents: i64, total_cents: i64) -> Option<String> {
    if total_cents <= 0 {
        return None;
    }
    let tenths = (weight_cents.abs() * 1000 + total_cents / 2) / total_cents;
    Some(format!("{}.{}%", tenths / 10, tenths % 10))
}

/// Round cents to whole currency units, half away from zero.
fn round_to_units(cents: i64) -> i64 {
    let sign = if cents < 0 { -1 } else { 1 };
    sign * ((cents.abs() + 50) / 100)
}

fn format_with_thousands(n: i64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let chars: Vec<char> = s.chars().rev().collect();
    let mut result = Vec::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result.iter().rev().collect()
}
