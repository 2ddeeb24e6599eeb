//! Helpers for currency amounts stored as `f64`.
//!
//! Amounts are rounded to cents at service boundaries; raw intermediate math
//! stays unrounded so repeated recalculation does not accumulate drift.

/// Changes smaller than one cent are treated as "no change" and must not
/// trigger downstream updates or notifications.
pub const SIGNIFICANT_CHANGE: f64 = 0.01;

/// Tolerance for comparing amounts that should be equal.
pub const AMOUNT_EPSILON: f64 = 1e-9;

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn is_significant_change(old: f64, new: f64) -> bool {
    (new - old).abs() >= SIGNIFICANT_CHANGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_cents(10.004), 10.0);
        assert_eq!(round_cents(10.016), 10.02);
        assert_eq!(round_cents(500.0 / 3.0), 166.67);
        assert_eq!(round_cents(-2.679), -2.68);
    }

    #[test]
    fn sub_cent_changes_are_insignificant() {
        assert!(!is_significant_change(50.0, 50.004));
        assert!(is_significant_change(50.0, 50.01));
        assert!(is_significant_change(50.0, 49.99));
    }
}
