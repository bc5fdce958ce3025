//! Formatting utilities used for CLI and invoice outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Money with two decimals: 250.0 → "250.00".
pub fn format_amount(v: f64) -> String {
    format!("{:.2}", v)
}

/// Quantities print without a trailing ".00" when they are whole numbers.
pub fn format_quantity(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

pub fn money(currency: &str, v: f64) -> String {
    format!("{}{}", currency, format_amount(v))
}

/// Parse a number typed by the user.
///
/// Anything that is not a finite, non-negative number becomes `0.0`, which
/// the editor then rejects when adding an item. Separators are not
/// guessed: "1,000" and "1,5" are both invalid.
pub fn parse_amount(s: &str) -> f64 {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}
