//! Border widths.

use std::hash::{Hash, Hasher};

use crate::errors::{ValueError, ValueResult};
use crate::geometry::{Insets, Side};
use crate::hash::{same, StructuralHash};

/// Widths of the four sides of a border, with per-side percentage flags.
///
/// A side may be [`BorderWidths::AUTO`], which border images resolve to the
/// width of the matching slice. Percentages are fractions of the region width
/// (left and right) or height (top and bottom).
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "BorderWidthsRepr", into = "BorderWidthsRepr")
)]
pub struct BorderWidths {
    widths: [f64; 4],
    as_percentage: [bool; 4],
    hash: u64,
}

impl BorderWidths {
    /// Sentinel for "size from the content", only meaningful for border images.
    pub const AUTO: f64 = -1.0;

    /// Zero on every side.
    pub const EMPTY: BorderWidths = BorderWidths::build([0.0; 4], [false; 4]);

    /// One unit on every side.
    pub const DEFAULT: BorderWidths = BorderWidths::build([1.0; 4], [false; 4]);

    /// 100% on every side.
    pub const FULL: BorderWidths = BorderWidths::build([1.0; 4], [true; 4]);

    const fn build(widths: [f64; 4], as_percentage: [bool; 4]) -> Self {
        let hash = StructuralHash::new()
            .f64(widths[0])
            .f64(widths[1])
            .f64(widths[2])
            .f64(widths[3])
            .bool(as_percentage[0])
            .bool(as_percentage[1])
            .bool(as_percentage[2])
            .bool(as_percentage[3])
            .finish();
        Self {
            widths,
            as_percentage,
            hash,
        }
    }

    /// Same literal width on every side.
    pub fn uniform(width: f64) -> ValueResult<Self> {
        Self::new(width, width, width, width)
    }

    /// Literal widths, in the order top, right, bottom, left.
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> ValueResult<Self> {
        Self::from_parts([top, right, bottom, left], [false; 4])
    }

    /// Every width and every percentage flag, in the order top, right, bottom, left.
    pub fn from_parts(widths: [f64; 4], as_percentage: [bool; 4]) -> ValueResult<Self> {
        for width in widths {
            if width != Self::AUTO {
                ValueError::check_finite("border width", width)?;
                ValueError::check_non_negative("border width", width)?;
            }
        }
        Ok(Self::build(widths, as_percentage))
    }

    pub const fn top(&self) -> f64 {
        self.widths[0]
    }

    pub const fn right(&self) -> f64 {
        self.widths[1]
    }

    pub const fn bottom(&self) -> f64 {
        self.widths[2]
    }

    pub const fn left(&self) -> f64 {
        self.widths[3]
    }

    /// Width of one side, possibly AUTO or a fraction.
    pub const fn side(&self, side: Side) -> f64 {
        self.widths[side_index(side)]
    }

    /// Whether the width of `side` is a fraction.
    pub const fn is_percentage(&self, side: Side) -> bool {
        self.as_percentage[side_index(side)]
    }

    pub const fn is_auto(&self, side: Side) -> bool {
        self.widths[side_index(side)] == Self::AUTO
    }

    /// Whether any side is a fraction.
    pub fn has_percentages(&self) -> bool {
        self.as_percentage.iter().any(|flag| *flag)
    }

    /// Literal width of `side` for edge computation: AUTO and fractional sides
    /// count as zero.
    pub fn literal(&self, side: Side) -> f64 {
        if self.is_percentage(side) || self.is_auto(side) {
            0.0
        } else {
            self.side(side)
        }
    }

    /// Absolute widths for a `width` x `height` region. AUTO sides resolve to zero.
    pub fn resolve(&self, width: f64, height: f64) -> Insets {
        let value = |side: Side, extent: f64| {
            if self.is_auto(side) {
                0.0
            } else if self.is_percentage(side) {
                self.side(side) * extent
            } else {
                self.side(side)
            }
        };
        Insets::new(
            value(Side::Top, height),
            value(Side::Right, width),
            value(Side::Bottom, height),
            value(Side::Left, width),
        )
    }

    /// The hash computed at construction.
    pub const fn cached_hash(&self) -> u64 {
        self.hash
    }
}

const fn side_index(side: Side) -> usize {
    match side {
        Side::Top => 0,
        Side::Right => 1,
        Side::Bottom => 2,
        Side::Left => 3,
    }
}

impl Default for BorderWidths {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PartialEq for BorderWidths {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.as_percentage == other.as_percentage
            && self
                .widths
                .iter()
                .zip(other.widths.iter())
                .all(|(a, b)| same(*a, *b))
    }
}

impl Eq for BorderWidths {}

impl Hash for BorderWidths {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BorderWidthsRepr {
    widths: [f64; 4],
    #[serde(default)]
    as_percentage: [bool; 4],
}

#[cfg(feature = "serde")]
impl TryFrom<BorderWidthsRepr> for BorderWidths {
    type Error = ValueError;

    fn try_from(repr: BorderWidthsRepr) -> ValueResult<Self> {
        BorderWidths::from_parts(repr.widths, repr.as_percentage)
    }
}

#[cfg(feature = "serde")]
impl From<BorderWidths> for BorderWidthsRepr {
    fn from(widths: BorderWidths) -> Self {
        Self {
            widths: widths.widths,
            as_percentage: widths.as_percentage,
        }
    }
}
