//! Decimal-string money parsing.
//!
//! Firefly III sends amounts as decimal strings. Parsing goes straight to
//! i64 cents; floating point is never involved.

/// Parse a decimal amount string into signed cents.
///
/// Accepts "123", "123.4", "-0.05"; fractional digits beyond two are
/// truncated. Returns None for anything that does not parse cleanly.
pub fn parse_cents(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if s.is_empty() {
        return None;
    }

    let (whole_str, frac_str) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s, ""),
    };
    if whole_str.is_empty() && frac_str.is_empty() {
        return None;
    }
    if !whole_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = if whole_str.is_empty() {
        0
    } else {
        whole_str.parse().ok()?
    };
    let frac: i64 = match frac_str.len() {
        0 => 0,
        1 => parse_digits(frac_str)? * 10,
        _ => parse_digits(frac_str.get(..2)?)?,
    };

    let cents = whole.checked_mul(100)?.checked_add(frac)?;
    Some(if negative { -cents } else { cents })
}

fn parse_digits(s: &str) -> Option<i64> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
