//! Background image position and size.

use std::hash::{Hash, Hasher};

use crate::errors::{ValueError, ValueResult};
use crate::geometry::Side;
use crate::hash::{same, StructuralHash};

/// Where a background image is placed within its area.
///
/// Each axis is measured from a side: the horizontal position from the left or
/// right edge, the vertical position from the top or bottom edge. Percentage
/// positions align the same fraction of the image with that fraction of the area.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "BackgroundPositionRepr", into = "BackgroundPositionRepr")
)]
pub struct BackgroundPosition {
    horizontal_side: Side,
    horizontal_position: f64,
    horizontal_as_percentage: bool,
    vertical_side: Side,
    vertical_position: f64,
    vertical_as_percentage: bool,
    hash: u64,
}

impl BackgroundPosition {
    /// Top-left corner.
    pub const DEFAULT: BackgroundPosition =
        BackgroundPosition::build(Side::Left, 0.0, true, Side::Top, 0.0, true);

    /// Centered on both axes.
    pub const CENTER: BackgroundPosition =
        BackgroundPosition::build(Side::Left, 0.5, true, Side::Top, 0.5, true);

    const fn build(
        horizontal_side: Side,
        horizontal_position: f64,
        horizontal_as_percentage: bool,
        vertical_side: Side,
        vertical_position: f64,
        vertical_as_percentage: bool,
    ) -> Self {
        let hash = StructuralHash::new()
            .bool(matches!(horizontal_side, Side::Right))
            .f64(horizontal_position)
            .bool(horizontal_as_percentage)
            .bool(matches!(vertical_side, Side::Bottom))
            .f64(vertical_position)
            .bool(vertical_as_percentage)
            .finish();
        Self {
            horizontal_side,
            horizontal_position,
            horizontal_as_percentage,
            vertical_side,
            vertical_position,
            vertical_as_percentage,
            hash,
        }
    }

    /// Create a position. The horizontal side must be left or right and the
    /// vertical side top or bottom.
    pub fn new(
        horizontal_side: Side,
        horizontal_position: f64,
        horizontal_as_percentage: bool,
        vertical_side: Side,
        vertical_position: f64,
        vertical_as_percentage: bool,
    ) -> ValueResult<Self> {
        if !horizontal_side.is_horizontal_anchor() {
            return Err(ValueError::InvalidSide {
                field: "horizontal side",
                side: horizontal_side,
            });
        }
        if !vertical_side.is_vertical_anchor() {
            return Err(ValueError::InvalidSide {
                field: "vertical side",
                side: vertical_side,
            });
        }
        ValueError::check_finite("horizontal position", horizontal_position)?;
        ValueError::check_finite("vertical position", vertical_position)?;
        Ok(Self::build(
            horizontal_side,
            horizontal_position,
            horizontal_as_percentage,
            vertical_side,
            vertical_position,
            vertical_as_percentage,
        ))
    }

    pub const fn horizontal_side(&self) -> Side {
        self.horizontal_side
    }

    pub const fn horizontal_position(&self) -> f64 {
        self.horizontal_position
    }

    pub const fn is_horizontal_as_percentage(&self) -> bool {
        self.horizontal_as_percentage
    }

    pub const fn vertical_side(&self) -> Side {
        self.vertical_side
    }

    pub const fn vertical_position(&self) -> f64 {
        self.vertical_position
    }

    pub const fn is_vertical_as_percentage(&self) -> bool {
        self.vertical_as_percentage
    }

    /// The hash computed at construction.
    pub const fn cached_hash(&self) -> u64 {
        self.hash
    }
}

impl Default for BackgroundPosition {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PartialEq for BackgroundPosition {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.horizontal_side == other.horizontal_side
            && same(self.horizontal_position, other.horizontal_position)
            && self.horizontal_as_percentage == other.horizontal_as_percentage
            && self.vertical_side == other.vertical_side
            && same(self.vertical_position, other.vertical_position)
            && self.vertical_as_percentage == other.vertical_as_percentage
    }
}

impl Eq for BackgroundPosition {}

impl Hash for BackgroundPosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// How large a background image is drawn.
///
/// `contain` scales the image to fit the area, `cover` scales it to fill the
/// area. When both are requested, cover wins and contain reads as false.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "BackgroundSizeRepr", into = "BackgroundSizeRepr")
)]
pub struct BackgroundSize {
    width: f64,
    height: f64,
    width_as_percentage: bool,
    height_as_percentage: bool,
    contain: bool,
    cover: bool,
    hash: u64,
}

impl BackgroundSize {
    /// Sentinel for "derive from the image".
    pub const AUTO: f64 = -1.0;

    /// Intrinsic image size.
    pub const DEFAULT: BackgroundSize =
        BackgroundSize::build(Self::AUTO, Self::AUTO, true, true, false, false);

    const fn build(
        width: f64,
        height: f64,
        width_as_percentage: bool,
        height_as_percentage: bool,
        contain: bool,
        cover: bool,
    ) -> Self {
        let contain = contain && !cover;
        let hash = StructuralHash::new()
            .f64(width)
            .f64(height)
            .bool(width_as_percentage)
            .bool(height_as_percentage)
            .bool(contain)
            .bool(cover)
            .finish();
        Self {
            width,
            height,
            width_as_percentage,
            height_as_percentage,
            contain,
            cover,
            hash,
        }
    }

    /// Create a size. Width and height must be non-negative or [`BackgroundSize::AUTO`].
    pub fn new(
        width: f64,
        height: f64,
        width_as_percentage: bool,
        height_as_percentage: bool,
        contain: bool,
        cover: bool,
    ) -> ValueResult<Self> {
        if width != Self::AUTO {
            ValueError::check_non_negative("background width", width)?;
        }
        if height != Self::AUTO {
            ValueError::check_non_negative("background height", height)?;
        }
        Ok(Self::build(
            width,
            height,
            width_as_percentage,
            height_as_percentage,
            contain,
            cover,
        ))
    }

    /// Literal width and height.
    pub fn exact(width: f64, height: f64) -> ValueResult<Self> {
        Self::new(width, height, false, false, false, false)
    }

    /// Scale to fill the whole area, cropping the overflow.
    pub const fn cover() -> Self {
        Self::build(Self::AUTO, Self::AUTO, true, true, false, true)
    }

    /// Scale to fit inside the area.
    pub const fn contain() -> Self {
        Self::build(Self::AUTO, Self::AUTO, true, true, true, false)
    }

    pub const fn width(&self) -> f64 {
        self.width
    }

    pub const fn height(&self) -> f64 {
        self.height
    }

    pub const fn is_width_as_percentage(&self) -> bool {
        self.width_as_percentage
    }

    pub const fn is_height_as_percentage(&self) -> bool {
        self.height_as_percentage
    }

    pub const fn is_contain(&self) -> bool {
        self.contain
    }

    pub const fn is_cover(&self) -> bool {
        self.cover
    }

    /// The hash computed at construction.
    pub const fn cached_hash(&self) -> u64 {
        self.hash
    }
}

impl Default for BackgroundSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PartialEq for BackgroundSize {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && same(self.width, other.width)
            && same(self.height, other.height)
            && self.width_as_percentage == other.width_as_percentage
            && self.height_as_percentage == other.height_as_percentage
            && self.contain == other.contain
            && self.cover == other.cover
    }
}

impl Eq for BackgroundSize {}

impl Hash for BackgroundSize {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BackgroundPositionRepr {
    horizontal_side: Side,
    horizontal_position: f64,
    horizontal_as_percentage: bool,
    vertical_side: Side,
    vertical_position: f64,
    vertical_as_percentage: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<BackgroundPositionRepr> for BackgroundPosition {
    type Error = ValueError;

    fn try_from(r: BackgroundPositionRepr) -> ValueResult<Self> {
        BackgroundPosition::new(
            r.horizontal_side,
            r.horizontal_position,
            r.horizontal_as_percentage,
            r.vertical_side,
            r.vertical_position,
            r.vertical_as_percentage,
        )
    }
}

#[cfg(feature = "serde")]
impl From<BackgroundPosition> for BackgroundPositionRepr {
    fn from(p: BackgroundPosition) -> Self {
        Self {
            horizontal_side: p.horizontal_side,
            horizontal_position: p.horizontal_position,
            horizontal_as_percentage: p.horizontal_as_percentage,
            vertical_side: p.vertical_side,
            vertical_position: p.vertical_position,
            vertical_as_percentage: p.vertical_as_percentage,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BackgroundSizeRepr {
    width: f64,
    height: f64,
    width_as_percentage: bool,
    height_as_percentage: bool,
    #[serde(default)]
    contain: bool,
    #[serde(default)]
    cover: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<BackgroundSizeRepr> for BackgroundSize {
    type Error = ValueError;

    fn try_from(r: BackgroundSizeRepr) -> ValueResult<Self> {
        BackgroundSize::new(
            r.width,
            r.height,
            r.width_as_percentage,
            r.height_as_percentage,
            r.contain,
            r.cover,
        )
    }
}

#[cfg(feature = "serde")]
impl From<BackgroundSize> for BackgroundSizeRepr {
    fn from(s: BackgroundSize) -> Self {
        Self {
            width: s.width,
            height: s.height,
            width_as_percentage: s.width_as_percentage,
            height_as_percentage: s.height_as_percentage,
            contain: s.contain,
            cover: s.cover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_rejects_wrong_side() {
        let err = BackgroundPosition::new(Side::Top, 0.0, false, Side::Top, 0.0, false)
            .unwrap_err();
        assert_eq!(
            err,
            ValueError::InvalidSide {
                field: "horizontal side",
                side: Side::Top
            }
        );

        let err = BackgroundPosition::new(Side::Left, 0.0, false, Side::Right, 0.0, false)
            .unwrap_err();
        assert!(matches!(err, ValueError::InvalidSide { side: Side::Right, .. }));
    }

    #[test]
    fn test_position_equality() {
        let center = BackgroundPosition::new(Side::Left, 0.5, true, Side::Top, 0.5, true).unwrap();
        assert_eq!(center, BackgroundPosition::CENTER);
        assert_eq!(center.cached_hash(), BackgroundPosition::CENTER.cached_hash());

        let from_right =
            BackgroundPosition::new(Side::Right, 0.5, true, Side::Top, 0.5, true).unwrap();
        assert_ne!(from_right, BackgroundPosition::CENTER);
    }

    #[test]
    fn test_size_cover_wins() {
        let size = BackgroundSize::new(BackgroundSize::AUTO, BackgroundSize::AUTO, true, true, true, true)
            .unwrap();
        assert!(size.is_cover());
        assert!(!size.is_contain());
        assert_eq!(size, BackgroundSize::cover());
    }

    #[test]
    fn test_size_rejects_negative() {
        assert!(BackgroundSize::exact(-2.0, 10.0).is_err());
        assert!(BackgroundSize::exact(BackgroundSize::AUTO, 10.0).is_ok());
    }

    #[test]
    fn test_size_default_is_auto() {
        let size = BackgroundSize::default();
        assert!((size.width() - BackgroundSize::AUTO).abs() < 0.001);
        assert!((size.height() - BackgroundSize::AUTO).abs() < 0.001);
        assert!(!size.is_cover() && !size.is_contain());
    }
}
