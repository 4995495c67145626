//! Numbers typed by a user: either `.` or `,` may be the decimal separator.
//!
//! Parsing is strict. Text that is not a finite real number is rejected instead of being
//! read as zero.

/// "3.5", "3,5", "-2", "1e-6", "1,5e3" -> Some(f64); "", "1,5.2", "abc", "inf", "NaN" -> None
pub fn parse_real(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let commas = trimmed.matches(',').count();
    let dots = trimmed.matches('.').count();
    if commas + dots > 1 {
        return None;
    }
    // only digits, sign, separator and exponent; keeps "inf" and "nan" out
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | ',' | 'e' | 'E'))
    {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// values separated by `separator`, each parsed with [`parse_real`]; None if any value is invalid
pub fn parse_real_list(text: &str, separator: char) -> Option<Vec<f64>> {
    text.split(separator).map(parse_real).collect()
}
