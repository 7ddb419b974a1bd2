//! Numeric helpers.

/// Rounds a value to two decimal places, half away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of `part` relative to `whole`, rounded to two decimal places.
///
/// Returns 0 when `whole` is not positive.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    round_to_hundredths(part as f64 / whole as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_hundredths() {
        assert_eq!(round_to_hundredths(33.333333), 33.33);
        assert_eq!(round_to_hundredths(66.666666), 66.67);
        assert_eq!(round_to_hundredths(30.0), 30.0);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(3, 10), 30.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(0, 1000), 0.0);
        assert_eq!(percentage(1000, 1000), 100.0);
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(5, 0), 0.0);
    }
}
