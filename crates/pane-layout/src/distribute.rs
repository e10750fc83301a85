//! Proportional grow and shrink redistribution.
//!
//! When a row of children does not add up to the space a container has, the
//! surplus or deficit is handed out in equal snapped portions to the eligible
//! children. A child that reaches its limit (max when growing, min when
//! shrinking) drops out and the portion is recomputed for the rest. Whatever
//! cannot be handed out is returned to the caller.

use smallvec::SmallVec;

/// Spread `extra` over the eligible entries of `sizes`.
///
/// `limits` holds the ceiling of each entry when `extra` is positive and its
/// floor when negative. `snap_portion` snaps a per-entry share; the loop stops
/// once less than `unit` is left or every eligible entry is saturated.
///
/// Returns the amount that could not be distributed, with the sign of `extra`.
pub fn grow_or_shrink(
    sizes: &mut [f64],
    limits: &[f64],
    eligible: &[bool],
    extra: f64,
    unit: f64,
    snap_portion: impl Fn(f64) -> f64,
) -> f64 {
    let growing = extra > 0.0;
    let mut adjusting: SmallVec<[usize; 16]> = (0..sizes.len())
        .filter(|&i| eligible.get(i).copied().unwrap_or(false))
        .collect();
    let mut available = extra;

    while available.abs() >= unit && !adjusting.is_empty() {
        let portion = snap_portion(available / adjusting.len() as f64).abs();
        let before = available;

        adjusting.retain(|index| {
            let i = *index;
            if available.abs() < unit {
                return true;
            }
            let room = if growing {
                limits[i] - sizes[i]
            } else {
                sizes[i] - limits[i]
            }
            .max(0.0);
            let step = room.min(portion).min(available.abs());
            if growing {
                sizes[i] += step;
                available -= step;
            } else {
                sizes[i] -= step;
                available += step;
            }
            room > portion
        });

        if available == before {
            break;
        }
    }
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::SnapOptions;

    fn snapped(value: f64) -> f64 {
        SnapOptions::default().snap_portion_x(value)
    }

    #[test]
    fn test_single_grower_takes_all() {
        let mut sizes = [50.0, 50.0, 50.0];
        let limits = [50.0, f64::MAX, 50.0];
        let eligible = [false, true, false];
        let remaining = grow_or_shrink(&mut sizes, &limits, &eligible, 60.0, 1.0, snapped);
        assert_eq!(sizes, [50.0, 110.0, 50.0]);
        assert_eq!(remaining, 0.0);
    }

    #[test]
    fn test_saturated_child_drops_out() {
        let mut sizes = [10.0, 10.0];
        let limits = [15.0, 100.0];
        let remaining =
            grow_or_shrink(&mut sizes, &limits, &[true, true], 40.0, 1.0, snapped);
        // First pass gives 20 each, capped at 5 for the first; the rest goes to the second
        assert_eq!(sizes, [15.0, 45.0]);
        assert_eq!(remaining, 0.0);
    }

    #[test]
    fn test_unused_surplus_returned() {
        let mut sizes = [10.0, 10.0];
        let limits = [12.0, 13.0];
        let remaining =
            grow_or_shrink(&mut sizes, &limits, &[true, true], 20.0, 1.0, snapped);
        assert_eq!(sizes, [12.0, 13.0]);
        assert!((remaining - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_shrink_stops_at_min() {
        let mut sizes = [50.0, 50.0];
        let limits = [45.0, 0.0];
        let remaining =
            grow_or_shrink(&mut sizes, &limits, &[true, true], -30.0, 1.0, snapped);
        assert_eq!(sizes, [45.0, 25.0]);
        assert_eq!(remaining, 0.0);
    }

    #[test]
    fn test_odd_remainder_is_spread_in_units() {
        let mut sizes = [0.0, 0.0, 0.0];
        let limits = [f64::MAX; 3];
        let remaining =
            grow_or_shrink(&mut sizes, &limits, &[true, true, true], 10.0, 1.0, snapped);
        assert_eq!(sizes.iter().sum::<f64>(), 10.0);
        assert_eq!(sizes, [4.0, 3.0, 3.0]);
        assert_eq!(remaining, 0.0);
    }

    #[test]
    fn test_nothing_eligible() {
        let mut sizes = [10.0];
        let remaining = grow_or_shrink(&mut sizes, &[100.0], &[false], 5.0, 1.0, snapped);
        assert_eq!(remaining, 5.0);
        assert_eq!(sizes, [10.0]);
    }

    #[test]
    fn test_unsnapped_distributes_exactly() {
        let mut sizes = [0.0, 0.0, 0.0];
        let limits = [f64::MAX; 3];
        let snap = SnapOptions::DISABLED;
        let remaining = grow_or_shrink(
            &mut sizes,
            &limits,
            &[true, true, true],
            10.0,
            snap.unit(pane_core::Orientation::Horizontal),
            |v| snap.snap_portion_x(v),
        );
        assert!(remaining.abs() < 1e-9);
        assert!((sizes[0] - 10.0 / 3.0).abs() < 1e-9);
    }
}
