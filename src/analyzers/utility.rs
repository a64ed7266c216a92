/// `part` as a percentage of `total`. A zero total yields 0.0.
pub fn pct(part: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Rounds the stored value to one decimal place, ties to even.
///
/// `{:.1}` formats the exact binary value, so 0.15 (stored just below the
/// tie) goes down and an exact tie like 11.25 goes to 11.2.
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(pct(50, 100), 50.0);
        assert_eq!(pct(1, 4), 25.0);
        assert_eq!(pct(10, 80), 12.5);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(0.00008), 0.0);
        assert_eq!(round1(12.5), 12.5);
    }

    #[test]
    fn test_round1_ties_go_to_even() {
        assert_eq!(round1(0.25), 0.2);
        assert_eq!(round1(0.75), 0.8);
        assert_eq!(round1(11.25), 11.2);
        assert_eq!(round1(-0.25), -0.2);
    }

    #[test]
    fn test_round1_uses_stored_value() {
        // 0.15 and 0.35 are stored just below the tie
        assert_eq!(round1(0.15), 0.1);
        assert_eq!(round1(0.35), 0.3);
        assert_eq!(round1(pct(3, 2000)), 0.1);
    }
}
