//! Insets, bounds and alignment enums.

use std::hash::{Hash, Hasher};
use std::ops::Add;

use glam::DVec2;

use crate::hash::{same, StructuralHash};

/// The "unbounded" size. Max sizes default to this.
pub const MAX_SIZE: f64 = f64::MAX;

/// Distances from each edge of a rectangle, in the order top, right, bottom, left.
///
/// Any sign is allowed: negative insets extend outside the rectangle.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 4]", into = "[f64; 4]"))]
pub struct Insets {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
    hash: u64,
}

impl Insets {
    /// Zero on every side.
    pub const EMPTY: Insets = Insets::new(0.0, 0.0, 0.0, 0.0);

    /// Create insets from the four sides.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        let hash = StructuralHash::new()
            .f64(top)
            .f64(right)
            .f64(bottom)
            .f64(left)
            .finish();
        Self {
            top,
            right,
            bottom,
            left,
            hash,
        }
    }

    /// Same value on every side.
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// `vertical` for top and bottom, `horizontal` for left and right.
    pub const fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    pub const fn top(&self) -> f64 {
        self.top
    }

    pub const fn right(&self) -> f64 {
        self.right
    }

    pub const fn bottom(&self) -> f64 {
        self.bottom
    }

    pub const fn left(&self) -> f64 {
        self.left
    }

    /// Value of one side.
    pub const fn side(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// Left plus right.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Top plus bottom.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Per-side maximum of two insets.
    pub fn max(&self, other: &Insets) -> Insets {
        Insets::new(
            self.top.max(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
            self.left.max(other.left),
        )
    }

    /// Clamp every side to be at least zero.
    pub fn floor_zero(&self) -> Insets {
        self.max(&Insets::EMPTY)
    }

    /// Apply `f` to every side.
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Insets {
        Insets::new(f(self.top), f(self.right), f(self.bottom), f(self.left))
    }

    /// The hash computed at construction.
    pub const fn cached_hash(&self) -> u64 {
        self.hash
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PartialEq for Insets {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && same(self.top, other.top)
            && same(self.right, other.right)
            && same(self.bottom, other.bottom)
            && same(self.left, other.left)
    }
}

impl Eq for Insets {}

impl Hash for Insets {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl Add for Insets {
    type Output = Insets;

    fn add(self, rhs: Insets) -> Insets {
        Insets::new(
            self.top + rhs.top,
            self.right + rhs.right,
            self.bottom + rhs.bottom,
            self.left + rhs.left,
        )
    }
}

impl From<[f64; 4]> for Insets {
    fn from([top, right, bottom, left]: [f64; 4]) -> Self {
        Insets::new(top, right, bottom, left)
    }
}

impl From<Insets> for [f64; 4] {
    fn from(insets: Insets) -> Self {
        [insets.top, insets.right, insets.bottom, insets.left]
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Position relative to the parent
    pub x: f64,
    pub y: f64,
    /// Size
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create bounds with position and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create bounds from position and size vectors.
    pub fn from_vecs(position: DVec2, size: DVec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// The right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// The bottom edge (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// True when the width or height is not positive.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Intersection with another bounds, `None` when they do not overlap.
    pub fn intersect(&self, other: &Bounds) -> Option<Bounds> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x1 < x2 && y1 < y2 {
            Some(Bounds::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Bounding box of both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Bounds::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Grow by a uniform amount on every side.
    pub fn expand(&self, amount: f64) -> Bounds {
        self.outset_by(&Insets::uniform(amount))
    }

    /// Shrink by per-side insets.
    pub fn inset_by(&self, insets: &Insets) -> Bounds {
        Bounds::new(
            self.x + insets.left(),
            self.y + insets.top(),
            self.width - insets.horizontal(),
            self.height - insets.vertical(),
        )
    }

    /// Grow by per-side outsets.
    pub fn outset_by(&self, outsets: &Insets) -> Bounds {
        Bounds::new(
            self.x - outsets.left(),
            self.y - outsets.top(),
            self.width + outsets.horizontal(),
            self.height + outsets.vertical(),
        )
    }
}

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Horizontal alignment within an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HPos {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment within an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VPos {
    #[default]
    Top,
    Center,
    /// Align the node's baseline with the area's baseline offset
    Baseline,
    Bottom,
}

/// Combined horizontal and vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pos {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    BaselineLeft,
    BaselineCenter,
    BaselineRight,
}

impl Pos {
    /// Combine the two axis alignments.
    pub const fn new(vpos: VPos, hpos: HPos) -> Self {
        match (vpos, hpos) {
            (VPos::Top, HPos::Left) => Pos::TopLeft,
            (VPos::Top, HPos::Center) => Pos::TopCenter,
            (VPos::Top, HPos::Right) => Pos::TopRight,
            (VPos::Center, HPos::Left) => Pos::CenterLeft,
            (VPos::Center, HPos::Center) => Pos::Center,
            (VPos::Center, HPos::Right) => Pos::CenterRight,
            (VPos::Bottom, HPos::Left) => Pos::BottomLeft,
            (VPos::Bottom, HPos::Center) => Pos::BottomCenter,
            (VPos::Bottom, HPos::Right) => Pos::BottomRight,
            (VPos::Baseline, HPos::Left) => Pos::BaselineLeft,
            (VPos::Baseline, HPos::Center) => Pos::BaselineCenter,
            (VPos::Baseline, HPos::Right) => Pos::BaselineRight,
        }
    }

    pub const fn hpos(self) -> HPos {
        match self {
            Pos::TopLeft | Pos::CenterLeft | Pos::BottomLeft | Pos::BaselineLeft => HPos::Left,
            Pos::TopCenter | Pos::Center | Pos::BottomCenter | Pos::BaselineCenter => HPos::Center,
            Pos::TopRight | Pos::CenterRight | Pos::BottomRight | Pos::BaselineRight => {
                HPos::Right
            }
        }
    }

    pub const fn vpos(self) -> VPos {
        match self {
            Pos::TopLeft | Pos::TopCenter | Pos::TopRight => VPos::Top,
            Pos::CenterLeft | Pos::Center | Pos::CenterRight => VPos::Center,
            Pos::BottomLeft | Pos::BottomCenter | Pos::BottomRight => VPos::Bottom,
            Pos::BaselineLeft | Pos::BaselineCenter | Pos::BaselineRight => VPos::Baseline,
        }
    }
}

/// One edge of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Top, right, bottom, left.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub const fn is_horizontal_anchor(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    pub const fn is_vertical_anchor(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}
