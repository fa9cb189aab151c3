//! Currency formatting shared by the summary block and the narrative

/// The single currency symbol used in all rendered text
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format a number with a fixed number of decimals and comma thousands separators
///
/// Rounds half away from zero, so `2.5` with zero decimals renders as `3`.
pub fn format_number(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value.abs() * factor).round() / factor;
    let plain = format!("{:.*}", decimals, rounded);

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format an amount prefixed with the currency symbol
pub fn format_currency(value: f64, decimals: usize) -> String {
    format!("{}{}", CURRENCY_SYMBOL, format_number(value, decimals))
}

/// Parse a number rendered by [`format_number`]
pub fn parse_number(s: &str) -> Option<f64> {
    s.replace(',', "").trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(0.0, 2), "0.00");
        assert_eq!(format_number(999.0, 2), "999.00");
        assert_eq!(format_number(1000.0, 2), "1,000.00");
        assert_eq!(format_number(12000.0, 2), "12,000.00");
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(1800.0, 0), "1,800");
    }

    #[test]
    fn test_format_number_rounding() {
        assert_eq!(format_number(2.5, 0), "3");
        assert_eq!(format_number(45.04, 1), "45.0");
        assert_eq!(format_number(45.06, 1), "45.1");
        assert_eq!(format_number(10799.6, 0), "10,800");
        assert_eq!(format_number(-1234.5, 0), "-1,235");
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(12000.0, 2), "₹12,000.00");
        assert_eq!(format_currency(10800.0, 0), "₹10,800");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12,000.00"), Some(12000.0));
        assert_eq!(parse_number("45.0"), Some(45.0));
        assert_eq!(parse_number("abc"), None);
    }
}
