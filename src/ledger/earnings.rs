// Earnings calculation for clip submissions

/// Earnings owed for a clip: `rate` currency units per 100,000 views.
///
/// Computed once at submission time and stored on the clip; a later rate
/// change never recomputes historical earnings.
pub fn earnings(views: i64, rate: f64) -> f64 {
    (views as f64 / 100_000.0) * rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earnings_at_rate_boundary() {
        assert_eq!(earnings(100_000, 20.0), 20.0);
        assert_eq!(earnings(250_000, 20.0), 50.0);
    }

    #[test]
    fn test_earnings_below_threshold() {
        assert_eq!(earnings(50_000, 20.0), 10.0);
        assert_eq!(earnings(1, 20.0), 0.0002);
    }

    #[test]
    fn test_earnings_scales_with_rate() {
        assert_eq!(earnings(100_000, 35.0), 35.0);
        assert_eq!(earnings(200_000, 0.0), 0.0);
    }
}
