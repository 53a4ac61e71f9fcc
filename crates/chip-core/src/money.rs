//! Chip amount parsing, rounding, and display.
//!
//! Amounts are plain `f64` dollars. Every value that gets stored goes
//! through [`round_cents`] first, so two amounts compare equal exactly when
//! they display the same.

/// Buy-in used when the add-player amount is empty or unparseable.
pub const DEFAULT_BUY_IN: f64 = 10.0;

/// Round to two decimal places, halves toward positive infinity.
///
/// `12.345` → `12.35`, `-2.005` → `-2.0`.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0 + 0.5).floor() / 100.0
}

/// Parse a chip amount typed by the user.
///
/// Leading whitespace is skipped and the longest numeric prefix is used, so
/// `"12abc"` parses as `12`. Returns `None` when there is no numeric prefix,
/// or when the value is negative or not finite.
pub fn parse_amount(input: &str) -> Option<f64> {
    let text = input.trim_start();
    let end = numeric_prefix_len(text);
    if end == 0 {
        return None;
    }
    let value: f64 = text[..end].parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Parse and round, falling back to `fallback` on failure.
pub fn parse_amount_or(input: &str, fallback: f64) -> f64 {
    parse_amount(input).map(round_cents).unwrap_or(fallback)
}

/// Format as dollars with two decimals, e.g. `$65.00`.
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Format with an explicit sign, e.g. `+$5.00` or `-$5.00`.
pub fn format_signed_money(amount: f64) -> String {
    let rounded = round_cents(amount);
    if rounded < 0.0 {
        format!("-${:.2}", -rounded)
    } else if rounded > 0.0 {
        format!("+${:.2}", rounded)
    } else {
        "$0.00".to_string()
    }
}

/// Format seconds as `HH:MM:SS`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Byte length of the `[+-]digits[.digits][e[+-]digits]` prefix of `text`,
/// or 0 if it contains no digits before the exponent.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        // A lone "." only counts when digits surround it.
        if digits > 0 {
            i = j;
        }
    }

    if digits == 0 {
        return 0;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_cents(12.345), 12.35);
        assert_eq!(round_cents(10.0), 10.0);
        assert_eq!(round_cents(0.004), 0.0);
        assert_eq!(round_cents(-2.005), -2.0);
    }

    #[test]
    fn parses_numeric_prefix() {
        assert_eq!(parse_amount("20"), Some(20.0));
        assert_eq!(parse_amount("  7.5"), Some(7.5));
        assert_eq!(parse_amount("12abc"), Some(12.0));
        assert_eq!(parse_amount(".5"), Some(0.5));
        assert_eq!(parse_amount("5."), Some(5.0));
        assert_eq!(parse_amount("1e2"), Some(100.0));
        assert_eq!(parse_amount("3e"), Some(3.0));
    }

    #[test]
    fn rejects_garbage_and_negatives() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("."), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("1e400"), None);
    }

    #[test]
    fn fallback_applies_only_on_failure() {
        assert_eq!(parse_amount_or("abc", DEFAULT_BUY_IN), 10.0);
        assert_eq!(parse_amount_or("", 3.0), 3.0);
        assert_eq!(parse_amount_or("12.345", 3.0), 12.35);
    }

    #[test]
    fn money_display() {
        assert_eq!(format_money(65.0), "$65.00");
        assert_eq!(format_money(0.5), "$0.50");
        assert_eq!(format_signed_money(-5.0), "-$5.00");
        assert_eq!(format_signed_money(2.5), "+$2.50");
        assert_eq!(format_signed_money(0.0), "$0.00");
    }

    #[test]
    fn duration_display() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(61), "00:01:01");
        assert_eq!(format_duration(3723), "01:02:03");
    }
}
