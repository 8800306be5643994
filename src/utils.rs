//! Small helpers.

/// Round to `decimals` places and group the integer part by thousands,
/// e.g. `1500000.0` -> `"1,500,000"`.
pub fn format_amount(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let raw = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Parse an operator-typed number: "100,000", "12%", " 8.5 ".
pub fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(1_500_000.0, 0), "1,500,000");
        assert_eq!(format_amount(50_000.4, 0), "50,000");
        assert_eq!(format_amount(999.0, 0), "999");
        assert_eq!(format_amount(1234.567, 2), "1,234.57");
        assert_eq!(format_amount(-12_345.0, 0), "-12,345");
        assert_eq!(format_amount(0.0, 0), "0");
    }

    #[test]
    fn tiny_negative_does_not_print_minus_zero() {
        assert_eq!(format_amount(-0.2, 0), "0");
    }

    #[test]
    fn percentages_use_one_decimal() {
        assert_eq!(format_pct(8.0), "8.0%");
        assert_eq!(format_pct(-7.04), "-7.0%");
    }

    #[test]
    fn numbers_accept_separators_and_percent() {
        assert_eq!(parse_number("100,000"), Some(100_000.0));
        assert_eq!(parse_number(" 12% "), Some(12.0));
        assert_eq!(parse_number("1_000.5"), Some(1000.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn keys_are_normalized() {
        assert_eq!(normalize_key(" Fixed-Cost "), "fixed_cost");
    }
}
