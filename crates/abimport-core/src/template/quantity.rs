//! Free-text quantity to numeric effort.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ASCII only: Unicode digits would match `\d` but not parse as f64.
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// Convert a quantity such as "8 Tage" into a number.
///
/// Uses the first run of digits anywhere in the text; separators are not
/// interpreted, so "2,5 Tage" gives 2.0. Text without digits gives 0.0.
/// Never fails and always returns a finite, non-negative value.
pub fn normalize_quantity(raw: &str) -> f64 {
    DIGIT_RUN
        .find(raw)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|v| if v.is_finite() { v } else { f64::MAX })
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_number() {
        assert_eq!(normalize_quantity("8"), 8.0);
        assert_eq!(normalize_quantity("10"), 10.0);
    }

    #[test]
    fn test_number_with_unit() {
        assert_eq!(normalize_quantity("8 Tage"), 8.0);
        assert_eq!(normalize_quantity("ca. 12h"), 12.0);
    }

    #[test]
    fn test_first_run_wins() {
        assert_eq!(normalize_quantity("8 Tage, 2 Wochen"), 8.0);
        assert_eq!(normalize_quantity("2,5 Tage"), 2.0);
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(normalize_quantity(""), 0.0);
        assert_eq!(normalize_quantity("pauschal"), 0.0);
        assert_eq!(normalize_quantity("٣ Tage"), 0.0);
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(normalize_quantity("007"), 7.0);
    }

    #[test]
    fn test_huge_run_stays_finite() {
        let raw = "9".repeat(400);
        let value = normalize_quantity(&raw);
        assert!(value.is_finite());
        assert_eq!(value, f64::MAX);
    }

    #[test]
    fn test_total_over_arbitrary_text() {
        for raw in ["-5", "€ 1.200,00", "\u{0}\u{ffff}", "   ", "x-1y"] {
            let value = normalize_quantity(raw);
            assert!(value.is_finite() && value >= 0.0, "{raw:?} -> {value}");
        }
        assert_eq!(normalize_quantity("-5"), 5.0);
    }
}
