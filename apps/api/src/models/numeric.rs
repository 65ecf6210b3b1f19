//! Lenient number extraction for free-text form values and catalog minimums.
//!
//! Nothing here fails: text that carries no usable number yields `None`, and
//! callers treat `None` as "unknown" rather than as an error.

/// Parses the longest numeric prefix of `text` after leading whitespace,
/// e.g. `"7.5 overall"` → 7.5. Returns `None` when no digit leads the text.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digit_count = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digit_count > 0 {
            digit_count += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digit_count == 0 {
        return None;
    }

    // Exponent only counts when digits follow it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Keeps only ASCII digits and reads them as one number: `"300+"` → 300.
/// Decimal points are dropped too, so this is meant for integer-scaled tests.
pub fn extract_digits(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Keeps digits and dots, then parses the leading number: `"3.0+"` → 3.0.
pub fn extract_decimal(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    parse_leading_number(&kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number_plain() {
        assert_eq!(parse_leading_number("6.5"), Some(6.5));
        assert_eq!(parse_leading_number("  310"), Some(310.0));
        assert_eq!(parse_leading_number("-2"), Some(-2.0));
    }

    #[test]
    fn test_leading_number_with_suffix() {
        assert_eq!(parse_leading_number("7.5 overall"), Some(7.5));
        assert_eq!(parse_leading_number("320+"), Some(320.0));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("1e2x"), Some(100.0));
        assert_eq!(parse_leading_number("3e"), Some(3.0));
    }

    #[test]
    fn test_leading_number_rejects_text() {
        assert_eq!(parse_leading_number(""), None);
        assert_eq!(parse_leading_number("abc"), None);
        assert_eq!(parse_leading_number("."), None);
        assert_eq!(parse_leading_number("-"), None);
        assert_eq!(parse_leading_number("score 7"), None);
    }

    #[test]
    fn test_extract_digits_strips_decoration() {
        assert_eq!(extract_digits("300+"), Some(300.0));
        assert_eq!(extract_digits("GRE: 315 min"), Some(315.0));
        assert_eq!(extract_digits("Required"), None);
    }

    #[test]
    fn test_extract_decimal_keeps_fraction() {
        assert_eq!(extract_decimal("3.0+"), Some(3.0));
        assert_eq!(extract_decimal("6.5"), Some(6.5));
        assert_eq!(extract_decimal("n/a"), None);
    }
}
