use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Convert a SQLite REAL aggregate into a Decimal amount
///
/// NULL aggregates (AVG over no rows) become zero. Non-finite values cannot
/// come out of SUM/AVG over stored amounts and are also treated as zero.
pub fn from_real(value: Option<f64>) -> Decimal {
    value.and_then(Decimal::from_f64).unwrap_or(Decimal::ZERO)
}

/// Share of `part` in `total` as a percentage; zero when the total is zero
pub fn percentage(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    part / total * Decimal::ONE_HUNDRED
}

/// Format an amount with thousands separators and two decimals: `$1,234.50`
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

/// Format a share with one decimal: `25.0%`
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", rounded)
}

/// Format a count with thousands separators: `12,345`
pub fn format_count(count: i64) -> String {
    let digits = count.unsigned_abs().to_string();
    let sign = if count < 0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
