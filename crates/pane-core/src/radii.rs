//! Corner radii of rounded rectangles.
//!
//! Each corner has a horizontal and a vertical radius, and each radius is either
//! a literal length or a fraction of the rectangle's width (horizontal radii) or
//! height (vertical radii).

use std::hash::{Hash, Hasher};

use crate::errors::{ValueError, ValueResult};
use crate::geometry::Insets;
use crate::hash::{same, StructuralHash};

/// The two radii of a single corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Corner {
    /// Radius along the x axis
    pub horizontal: f64,
    /// Radius along the y axis
    pub vertical: f64,
    /// `horizontal` is a fraction of the width
    pub horizontal_as_percentage: bool,
    /// `vertical` is a fraction of the height
    pub vertical_as_percentage: bool,
}

impl Corner {
    /// Square corner.
    pub const ZERO: Corner = Corner::new(0.0, 0.0);

    /// Elliptical corner with literal radii.
    pub const fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
            horizontal_as_percentage: false,
            vertical_as_percentage: false,
        }
    }

    /// Circular corner with a literal radius.
    pub const fn circular(radius: f64) -> Self {
        Self::new(radius, radius)
    }

    /// Elliptical corner with both radii given as fractions.
    pub const fn percent(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
            horizontal_as_percentage: true,
            vertical_as_percentage: true,
        }
    }

    const fn has_percentage(&self) -> bool {
        self.horizontal_as_percentage || self.vertical_as_percentage
    }

    const fn hash_into(&self, state: StructuralHash) -> StructuralHash {
        state
            .f64(self.horizontal)
            .f64(self.vertical)
            .bool(self.horizontal_as_percentage)
            .bool(self.vertical_as_percentage)
    }

    const fn same_as(&self, other: &Corner) -> bool {
        same(self.horizontal, other.horizontal)
            && same(self.vertical, other.vertical)
            && self.horizontal_as_percentage == other.horizontal_as_percentage
            && self.vertical_as_percentage == other.vertical_as_percentage
    }

    fn validate(self) -> ValueResult<Self> {
        for radius in [self.horizontal, self.vertical] {
            ValueError::check_finite("corner radius", radius)?;
            ValueError::check_non_negative("corner radius", radius)?;
        }
        Ok(self)
    }
}

/// Radii of the four corners, immutable with a precomputed hash.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "[Corner; 4]", into = "[Corner; 4]")
)]
pub struct CornerRadii {
    top_left: Corner,
    top_right: Corner,
    bottom_right: Corner,
    bottom_left: Corner,
    has_percent_based_radii: bool,
    hash: u64,
}

impl CornerRadii {
    /// Square corners everywhere.
    pub const EMPTY: CornerRadii =
        CornerRadii::build(Corner::ZERO, Corner::ZERO, Corner::ZERO, Corner::ZERO);

    const fn build(
        top_left: Corner,
        top_right: Corner,
        bottom_right: Corner,
        bottom_left: Corner,
    ) -> Self {
        let hash = bottom_left
            .hash_into(bottom_right.hash_into(top_right.hash_into(top_left.hash_into(
                StructuralHash::new(),
            ))))
            .finish();
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            has_percent_based_radii: top_left.has_percentage()
                || top_right.has_percentage()
                || bottom_right.has_percentage()
                || bottom_left.has_percentage(),
            hash,
        }
    }

    /// Same literal radius on every corner.
    pub fn uniform(radius: f64) -> ValueResult<Self> {
        Self::new(radius, radius, radius, radius, false)
    }

    /// Same fractional radius on every corner.
    pub fn uniform_percent(fraction: f64) -> ValueResult<Self> {
        Self::new(fraction, fraction, fraction, fraction, true)
    }

    /// Circular corners, all literal or all fractional.
    pub fn new(
        top_left: f64,
        top_right: f64,
        bottom_right: f64,
        bottom_left: f64,
        as_percent: bool,
    ) -> ValueResult<Self> {
        let corner = |radius: f64| Corner {
            horizontal: radius,
            vertical: radius,
            horizontal_as_percentage: as_percent,
            vertical_as_percentage: as_percent,
        };
        Self::from_corners(
            corner(top_left),
            corner(top_right),
            corner(bottom_right),
            corner(bottom_left),
        )
    }

    /// Fully general form: every radius and every percentage flag.
    pub fn from_corners(
        top_left: Corner,
        top_right: Corner,
        bottom_right: Corner,
        bottom_left: Corner,
    ) -> ValueResult<Self> {
        Ok(Self::build(
            top_left.validate()?,
            top_right.validate()?,
            bottom_right.validate()?,
            bottom_left.validate()?,
        ))
    }

    pub const fn top_left(&self) -> Corner {
        self.top_left
    }

    pub const fn top_right(&self) -> Corner {
        self.top_right
    }

    pub const fn bottom_right(&self) -> Corner {
        self.bottom_right
    }

    pub const fn bottom_left(&self) -> Corner {
        self.bottom_left
    }

    /// Corners in the order top-left, top-right, bottom-right, bottom-left.
    pub const fn corners(&self) -> [Corner; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Whether any radius is a fraction of the rectangle size.
    pub const fn has_percent_based_radii(&self) -> bool {
        self.has_percent_based_radii
    }

    /// Every corner has the same radii and percentage flags.
    pub fn is_uniform(&self) -> bool {
        let first = self.top_left;
        self.corners().iter().all(|corner| {
            same(corner.horizontal, first.horizontal)
                && same(corner.vertical, first.horizontal)
                && corner.horizontal_as_percentage == first.horizontal_as_percentage
                && corner.vertical_as_percentage == first.horizontal_as_percentage
        })
    }

    /// Resolve percentages against the inset rectangle of a `width` x `height`
    /// region and scale every radius down uniformly so that adjacent radii never
    /// overflow an edge.
    ///
    /// Returns [`CornerRadii::EMPTY`] when the inset rectangle is empty, and an
    /// equal copy of `self` when nothing needs resolving or scaling.
    pub fn normalize(&self, insets: &Insets, width: f64, height: f64) -> CornerRadii {
        let width = width - insets.horizontal();
        let height = height - insets.vertical();
        if width <= 0.0 || height <= 0.0 {
            return CornerRadii::EMPTY;
        }

        let resolve = |corner: Corner| {
            let h = if corner.horizontal_as_percentage {
                corner.horizontal * width
            } else {
                corner.horizontal
            };
            let v = if corner.vertical_as_percentage {
                corner.vertical * height
            } else {
                corner.vertical
            };
            (h, v)
        };
        let (tlh, tlv) = resolve(self.top_left);
        let (trh, trv) = resolve(self.top_right);
        let (brh, brv) = resolve(self.bottom_right);
        let (blh, blv) = resolve(self.bottom_left);

        let mut scale: f64 = 1.0;
        if tlh + trh > width {
            scale = scale.min(width / (tlh + trh));
        }
        if blh + brh > width {
            scale = scale.min(width / (blh + brh));
        }
        if tlv + blv > height {
            scale = scale.min(height / (tlv + blv));
        }
        if trv + brv > height {
            scale = scale.min(height / (trv + brv));
        }

        if !self.has_percent_based_radii && scale >= 1.0 {
            return *self;
        }

        let scaled = |h: f64, v: f64| Corner::new(h * scale, v * scale);
        CornerRadii::build(
            scaled(tlh, tlv),
            scaled(trh, trv),
            scaled(brh, brv),
            scaled(blh, blv),
        )
    }

    /// The hash computed at construction.
    pub const fn cached_hash(&self) -> u64 {
        self.hash
    }
}

impl Default for CornerRadii {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PartialEq for CornerRadii {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.top_left.same_as(&other.top_left)
            && self.top_right.same_as(&other.top_right)
            && self.bottom_right.same_as(&other.bottom_right)
            && self.bottom_left.same_as(&other.bottom_left)
    }
}

impl Eq for CornerRadii {}

impl Hash for CornerRadii {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl TryFrom<[Corner; 4]> for CornerRadii {
    type Error = ValueError;

    fn try_from([tl, tr, br, bl]: [Corner; 4]) -> ValueResult<Self> {
        CornerRadii::from_corners(tl, tr, br, bl)
    }
}

impl From<CornerRadii> for [Corner; 4] {
    fn from(radii: CornerRadii) -> Self {
        radii.corners()
    }
}
