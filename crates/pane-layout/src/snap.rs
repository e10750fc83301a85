//! Pixel snapping.
//!
//! Sizes and positions computed by the layouts are snapped to device pixel
//! boundaries so edges render crisply. Spaces and positions round, sizes round
//! up and portions handed out during redistribution round toward zero but
//! never below one device unit. Each function is idempotent and monotonic,
//! which the redistribution loop relies on to converge.

use pane_core::Orientation;

/// Slack for values that are a hair off a pixel boundary.
const EPSILON: f64 = 1e-14;

/// Smallest amount left undistributed when snapping is off.
const UNSNAPPED_UNIT: f64 = 1e-9;

/// Snapping configuration of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapOptions {
    /// Whether values are snapped at all
    pub enabled: bool,
    /// Device pixels per layout unit, horizontally
    pub scale_x: f64,
    /// Device pixels per layout unit, vertically
    pub scale_y: f64,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

fn scaled_round(value: f64, scale: f64) -> f64 {
    (value * scale + 0.5).floor() / scale
}

fn scaled_floor(value: f64, scale: f64) -> f64 {
    (value * scale + EPSILON).floor() / scale
}

fn scaled_ceil(value: f64, scale: f64) -> f64 {
    (value * scale - EPSILON).ceil() / scale
}

fn portion(value: f64, scale: f64) -> f64 {
    let scaled = value * scale;
    let snapped = if scaled > 0.0 {
        (scaled + EPSILON).floor().max(1.0)
    } else {
        (scaled - EPSILON).ceil().min(-1.0)
    };
    snapped / scale
}

impl SnapOptions {
    /// No snapping; every value passes through unchanged.
    pub const DISABLED: SnapOptions = SnapOptions {
        enabled: false,
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the device scale for both axes.
    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    fn scale(&self, axis: Orientation) -> f64 {
        match axis {
            Orientation::Horizontal => self.scale_x,
            Orientation::Vertical => self.scale_y,
        }
    }

    /// Round a gap, margin or inset to the pixel grid.
    pub fn snap_space(&self, value: f64, axis: Orientation) -> f64 {
        if self.enabled {
            scaled_round(value, self.scale(axis))
        } else {
            value
        }
    }

    /// Round a size up to the pixel grid.
    pub fn snap_size(&self, value: f64, axis: Orientation) -> f64 {
        if self.enabled {
            scaled_ceil(value, self.scale(axis))
        } else {
            value
        }
    }

    /// Round a position to the pixel grid.
    pub fn snap_position(&self, value: f64, axis: Orientation) -> f64 {
        if self.enabled {
            scaled_round(value, self.scale(axis))
        } else {
            value
        }
    }

    /// Round a redistribution share toward zero, keeping at least one unit.
    pub fn snap_portion(&self, value: f64, axis: Orientation) -> f64 {
        if !self.enabled || value == 0.0 {
            return value;
        }
        portion(value, self.scale(axis))
    }

    /// Floor a value to the pixel grid without the one-unit minimum.
    pub fn snap_floor(&self, value: f64, axis: Orientation) -> f64 {
        if self.enabled {
            scaled_floor(value, self.scale(axis))
        } else {
            value
        }
    }

    /// One device pixel in layout units, or a negligible amount when off.
    pub fn unit(&self, axis: Orientation) -> f64 {
        if self.enabled {
            1.0 / self.scale(axis)
        } else {
            UNSNAPPED_UNIT
        }
    }

    pub fn snap_space_x(&self, value: f64) -> f64 {
        self.snap_space(value, Orientation::Horizontal)
    }

    pub fn snap_space_y(&self, value: f64) -> f64 {
        self.snap_space(value, Orientation::Vertical)
    }

    pub fn snap_size_x(&self, value: f64) -> f64 {
        self.snap_size(value, Orientation::Horizontal)
    }

    pub fn snap_size_y(&self, value: f64) -> f64 {
        self.snap_size(value, Orientation::Vertical)
    }

    pub fn snap_position_x(&self, value: f64) -> f64 {
        self.snap_position(value, Orientation::Horizontal)
    }

    pub fn snap_position_y(&self, value: f64) -> f64 {
        self.snap_position(value, Orientation::Vertical)
    }

    pub fn snap_portion_x(&self, value: f64) -> f64 {
        self.snap_portion(value, Orientation::Horizontal)
    }

    pub fn snap_portion_y(&self, value: f64) -> f64 {
        self.snap_portion(value, Orientation::Vertical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_rounds_half_up() {
        let snap = SnapOptions::default();
        assert!((snap.snap_space_x(2.5) - 3.0).abs() < 1e-9);
        assert!((snap.snap_space_x(2.49) - 2.0).abs() < 1e-9);
        assert!((snap.snap_space_x(-2.5) - -2.0).abs() < 1e-9);
    }

    #[test]
    fn test_size_rounds_up() {
        let snap = SnapOptions::default();
        assert!((snap.snap_size_x(10.01) - 11.0).abs() < 1e-9);
        assert!((snap.snap_size_x(10.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_size_respects_scale() {
        let snap = SnapOptions::default().with_scale(2.0, 2.0);
        assert!((snap.snap_size_y(10.2) - 10.5).abs() < 1e-9);
        assert!((snap.unit(Orientation::Vertical) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_portion_keeps_one_unit() {
        let snap = SnapOptions::default();
        assert!((snap.snap_portion_x(0.3) - 1.0).abs() < 1e-9);
        assert!((snap.snap_portion_x(-0.3) - -1.0).abs() < 1e-9);
        assert!((snap.snap_portion_x(7.9) - 7.0).abs() < 1e-9);
        assert_eq!(snap.snap_portion_x(0.0), 0.0);
    }

    #[test]
    fn test_disabled_passes_through() {
        let snap = SnapOptions::DISABLED;
        assert_eq!(snap.snap_size_x(10.01), 10.01);
        assert_eq!(snap.snap_portion_y(0.3), 0.3);
        assert_eq!(snap.snap_position_x(1.25), 1.25);
    }

    #[test]
    fn test_idempotent() {
        let snap = SnapOptions::default().with_scale(1.5, 1.25);
        for value in [0.1, 3.7, 12.33, -4.2, 99.999] {
            let size = snap.snap_size_x(value);
            assert_eq!(snap.snap_size_x(size), size);
            let portion = snap.snap_portion_y(value);
            assert_eq!(snap.snap_portion_y(portion), portion);
        }
    }
}
