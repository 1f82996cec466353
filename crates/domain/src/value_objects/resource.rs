//! Health/chakra arithmetic.

/// Apply a signed delta to a resource pool, clamping the result into `[0, max]`.
///
/// The lower bound is applied first, so a negative `max` (never produced by
/// the sheet, but writable directly) yields `max`.
pub fn adjust(current: i32, delta: i32, max: i32) -> i32 {
    current.saturating_add(delta).max(0).min(max)
}

/// Whether a jutsu costing `chakra_cost`/`health_cost` can be used.
///
/// Chakra may be spent down to zero; health must stay strictly above the cost.
pub fn is_usable(chakra: i32, health: i32, chakra_cost: i32, health_cost: i32) -> bool {
    chakra >= chakra_cost && health > health_cost
}

/// Percentage used to draw a resource bar.
pub fn fill_percentage(current: i32, max: i32) -> f64 {
    if current <= 0 || max <= 0 {
        return 0.0;
    }
    f64::from(current) / f64::from(max) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_caps_at_max() {
        assert_eq!(adjust(100, 5, 100), 100);
        assert_eq!(adjust(97, 5, 100), 100);
    }

    #[test]
    fn adjust_floors_at_zero() {
        assert_eq!(adjust(3, -5, 100), 0);
        assert_eq!(adjust(0, -1, 50), 0);
    }

    #[test]
    fn adjust_inside_bounds() {
        assert_eq!(adjust(40, -1, 50), 39);
        assert_eq!(adjust(40, 5, 50), 45);
        assert_eq!(adjust(40, 0, 50), 40);
    }

    #[test]
    fn adjust_pulls_overfull_value_back_to_max() {
        // current > max can only come from a direct write
        assert_eq!(adjust(120, 0, 100), 100);
    }

    #[test]
    fn adjust_does_not_overflow() {
        assert_eq!(adjust(i32::MAX, i32::MAX, 10), 10);
        assert_eq!(adjust(i32::MIN, i32::MIN, 10), 0);
    }

    #[test]
    fn health_must_stay_strictly_above_cost() {
        assert!(!is_usable(10, 20, 10, 20));
        assert!(is_usable(10, 21, 10, 20));
    }

    #[test]
    fn chakra_may_reach_zero() {
        assert!(is_usable(10, 5, 10, 0));
        assert!(!is_usable(9, 5, 10, 0));
    }

    #[test]
    fn fill_percentage_handles_empty_and_zero_max() {
        assert_eq!(fill_percentage(0, 100), 0.0);
        assert_eq!(fill_percentage(-3, 100), 0.0);
        assert_eq!(fill_percentage(10, 0), 0.0);
        assert_eq!(fill_percentage(25, 50), 50.0);
    }
}
