//! VND amount formatting, matching `Intl.NumberFormat("vi-VN", { style: "currency", currency: "VND" })`.

/// Currency sign placed after the amount
pub const VND_SYMBOL: char = '₫';

/// Formats an amount as `1.500.000 ₫`: no fraction digits, `.` grouping,
/// a no-break space before the sign. Halves round away from zero.
pub fn format_vnd(amount: f64) -> String {
    format!("{}\u{a0}{}", format_grouped(amount), VND_SYMBOL)
}

/// Rounds to whole units and inserts `.` between digit triads.
pub fn format_grouped(amount: f64) -> String {
    let rounded = amount.round();
    // -0.4 rounds to -0; show it as plain zero
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vnd() {
        assert_eq!(format_vnd(1_500_000.0), "1.500.000\u{a0}₫");
        assert_eq!(format_vnd(0.0), "0\u{a0}₫");
        assert_eq!(format_vnd(999.0), "999\u{a0}₫");
        assert_eq!(format_vnd(1000.0), "1.000\u{a0}₫");
        assert_eq!(format_vnd(-2_500_000.0), "-2.500.000\u{a0}₫");
    }

    #[test]
    fn test_format_vnd_rounds_to_whole_units() {
        assert_eq!(format_vnd(1234.5), "1.235\u{a0}₫");
        assert_eq!(format_vnd(1234.4), "1.234\u{a0}₫");
        assert_eq!(format_vnd(-0.4), "0\u{a0}₫");
    }

    #[test]
    fn test_format_grouped_large_values() {
        assert_eq!(format_grouped(1_234_567_890.0), "1.234.567.890");
        assert_eq!(format_grouped(100_000.0), "100.000");
    }
}
