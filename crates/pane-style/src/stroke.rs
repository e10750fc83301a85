//! Border strokes.
//!
//! A stroke draws a line of some width along each side of a region, optionally
//! inset from the region edges. Where the line sits relative to the inset edge
//! depends on the stroke type, and that placement is what the owning border
//! turns into insets and outsets.

use std::hash::{Hash, Hasher};

use pane_core::hash::{same, StructuralHash};
use pane_core::{BorderWidths, CornerRadii, Insets, Side, ValueError, ValueResult};
use smallvec::SmallVec;

use crate::paint::Paint;

/// Where a stroke is drawn relative to the edge it follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrokeType {
    /// Entirely inside the edge
    Inside,
    /// Half inside, half outside
    #[default]
    Centered,
    /// Entirely outside the edge
    Outside,
}

/// How stroke segments join at corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrokeLineJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

/// How open stroke ends are capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrokeLineCap {
    Square,
    #[default]
    Butt,
    Round,
}

/// Dash lengths, alternating dash and gap.
pub type DashArray = SmallVec<[f64; 4]>;

/// Line style of one side of a stroke.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "StrokeStyleRepr", into = "StrokeStyleRepr")
)]
pub struct BorderStrokeStyle {
    visible: bool,
    stroke_type: StrokeType,
    line_join: StrokeLineJoin,
    line_cap: StrokeLineCap,
    miter_limit: f64,
    dash_offset: f64,
    dash_array: DashArray,
    hash: u64,
}

impl BorderStrokeStyle {
    /// Create a visible style. Negative miter limits and dash lengths are rejected.
    pub fn new(
        stroke_type: StrokeType,
        line_join: StrokeLineJoin,
        line_cap: StrokeLineCap,
        miter_limit: f64,
        dash_offset: f64,
        dash_array: impl IntoIterator<Item = f64>,
    ) -> ValueResult<Self> {
        ValueError::check_non_negative("miter limit", miter_limit)?;
        let dash_array = dash_array
            .into_iter()
            .map(|dash| ValueError::check_non_negative("dash length", dash))
            .collect::<ValueResult<DashArray>>()?;
        Ok(Self::build(
            true,
            stroke_type,
            line_join,
            line_cap,
            miter_limit,
            dash_offset,
            dash_array,
        ))
    }

    fn build(
        visible: bool,
        stroke_type: StrokeType,
        line_join: StrokeLineJoin,
        line_cap: StrokeLineCap,
        miter_limit: f64,
        dash_offset: f64,
        dash_array: DashArray,
    ) -> Self {
        let hash = dash_array
            .iter()
            .fold(
                StructuralHash::new()
                    .bool(visible)
                    .word(stroke_type as u64)
                    .word(line_join as u64)
                    .word(line_cap as u64)
                    .f64(miter_limit)
                    .f64(dash_offset)
                    .word(dash_array.len() as u64),
                |state, dash| state.f64(*dash),
            )
            .finish();
        Self {
            visible,
            stroke_type,
            line_join,
            line_cap,
            miter_limit,
            dash_offset,
            dash_array,
            hash,
        }
    }

    /// No line. Sides with this style have zero width for geometry.
    pub fn none() -> Self {
        Self::build(
            false,
            StrokeType::Centered,
            StrokeLineJoin::Miter,
            StrokeLineCap::Butt,
            10.0,
            0.0,
            DashArray::new(),
        )
    }

    /// Continuous line.
    pub fn solid() -> Self {
        Self::build(
            true,
            StrokeType::Centered,
            StrokeLineJoin::Miter,
            StrokeLineCap::Butt,
            10.0,
            0.0,
            DashArray::new(),
        )
    }

    /// Round dots one width apart.
    pub fn dotted() -> Self {
        Self::build(
            true,
            StrokeType::Centered,
            StrokeLineJoin::Miter,
            StrokeLineCap::Round,
            10.0,
            0.0,
            SmallVec::from_slice(&[0.0, 2.0]),
        )
    }

    /// Dashes twice as long as the width.
    pub fn dashed() -> Self {
        Self::build(
            true,
            StrokeType::Centered,
            StrokeLineJoin::Miter,
            StrokeLineCap::Butt,
            10.0,
            0.0,
            SmallVec::from_slice(&[2.0, 1.4]),
        )
    }

    /// Same style with a different stroke type.
    pub fn with_stroke_type(self, stroke_type: StrokeType) -> Self {
        Self::build(
            self.visible,
            stroke_type,
            self.line_join,
            self.line_cap,
            self.miter_limit,
            self.dash_offset,
            self.dash_array,
        )
    }

    /// `template` with new width-like values.
    pub(crate) fn rebuilt(
        template: &BorderStrokeStyle,
        miter_limit: f64,
        dash_offset: f64,
        dash_array: DashArray,
    ) -> Self {
        Self::build(
            template.visible,
            template.stroke_type,
            template.line_join,
            template.line_cap,
            miter_limit.max(0.0),
            dash_offset,
            dash_array,
        )
    }

    /// True for the style that draws nothing.
    pub fn is_none(&self) -> bool {
        !self.visible
    }

    pub fn stroke_type(&self) -> StrokeType {
        self.stroke_type
    }

    pub fn line_join(&self) -> StrokeLineJoin {
        self.line_join
    }

    pub fn line_cap(&self) -> StrokeLineCap {
        self.line_cap
    }

    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    pub fn dash_offset(&self) -> f64 {
        self.dash_offset
    }

    pub fn dash_array(&self) -> &[f64] {
        &self.dash_array
    }

    pub fn cached_hash(&self) -> u64 {
        self.hash
    }
}

impl Default for BorderStrokeStyle {
    fn default() -> Self {
        Self::none()
    }
}

impl PartialEq for BorderStrokeStyle {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.visible == other.visible
            && self.stroke_type == other.stroke_type
            && self.line_join == other.line_join
            && self.line_cap == other.line_cap
            && same(self.miter_limit, other.miter_limit)
            && same(self.dash_offset, other.dash_offset)
            && self.dash_array.len() == other.dash_array.len()
            && self
                .dash_array
                .iter()
                .zip(other.dash_array.iter())
                .all(|(a, b)| same(*a, *b))
    }
}

impl Hash for BorderStrokeStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// Per-side values, in the order top, right, bottom, left.
pub type Sides<T> = [T; 4];

/// A stroked border layer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "StrokeRepr", into = "StrokeRepr"))]
pub struct BorderStroke {
    paints: Sides<Paint>,
    styles: Sides<BorderStrokeStyle>,
    radii: CornerRadii,
    widths: BorderWidths,
    insets: Insets,
    inner_edge: Insets,
    outer_edge: Insets,
    hash: u64,
}

impl BorderStroke {
    /// Same paint and style on every side.
    ///
    /// Missing arguments default to black, no line, square corners, one unit
    /// wide and no insets.
    pub fn new(
        paint: Option<Paint>,
        style: Option<BorderStrokeStyle>,
        radii: Option<CornerRadii>,
        widths: Option<BorderWidths>,
        insets: Option<Insets>,
    ) -> Self {
        let paint = paint.unwrap_or(Paint::BLACK);
        let style = style.unwrap_or_default();
        Self::from_parts(
            [paint.clone(), paint.clone(), paint.clone(), paint],
            [style.clone(), style.clone(), style.clone(), style],
            radii.unwrap_or_default(),
            widths.unwrap_or_default(),
            insets.unwrap_or_default(),
        )
    }

    /// Separate paint and style per side, in the order top, right, bottom, left.
    pub fn sides(
        paints: Sides<Option<Paint>>,
        styles: Sides<Option<BorderStrokeStyle>>,
        radii: Option<CornerRadii>,
        widths: Option<BorderWidths>,
        insets: Option<Insets>,
    ) -> Self {
        Self::from_parts(
            paints.map(|paint| paint.unwrap_or(Paint::BLACK)),
            styles.map(Option::unwrap_or_default),
            radii.unwrap_or_default(),
            widths.unwrap_or_default(),
            insets.unwrap_or_default(),
        )
    }

    /// Solid line of `width` on every side.
    pub fn solid(paint: impl Into<Paint>, width: f64) -> ValueResult<Self> {
        Ok(Self::new(
            Some(paint.into()),
            Some(BorderStrokeStyle::solid()),
            None,
            Some(BorderWidths::uniform(width)?),
            None,
        ))
    }

    pub(crate) fn from_parts(
        paints: Sides<Paint>,
        styles: Sides<BorderStrokeStyle>,
        radii: CornerRadii,
        widths: BorderWidths,
        insets: Insets,
    ) -> Self {
        let edge = |index: usize, side: Side| {
            let style = &styles[index];
            let width = if style.is_none() {
                0.0
            } else {
                widths.literal(side)
            };
            let inset = insets.side(side);
            match style.stroke_type {
                StrokeType::Inside => (inset + width, (-inset).max(0.0)),
                StrokeType::Centered => (inset + width / 2.0, (width / 2.0 - inset).max(0.0)),
                StrokeType::Outside => (inset, (width - inset).max(0.0)),
            }
        };
        let (top_in, top_out) = edge(0, Side::Top);
        let (right_in, right_out) = edge(1, Side::Right);
        let (bottom_in, bottom_out) = edge(2, Side::Bottom);
        let (left_in, left_out) = edge(3, Side::Left);

        let state = paints
            .iter()
            .fold(StructuralHash::new(), |state, paint| paint.hash_into(state));
        let hash = styles
            .iter()
            .fold(state, |state, style| state.word(style.hash))
            .word(radii.cached_hash())
            .word(widths.cached_hash())
            .word(insets.cached_hash())
            .finish();

        Self {
            paints,
            styles,
            radii,
            widths,
            insets,
            inner_edge: Insets::new(top_in, right_in, bottom_in, left_in),
            outer_edge: Insets::new(top_out, right_out, bottom_out, left_out),
            hash,
        }
    }

    pub fn paints(&self) -> &Sides<Paint> {
        &self.paints
    }

    pub fn styles(&self) -> &Sides<BorderStrokeStyle> {
        &self.styles
    }

    pub fn top_paint(&self) -> &Paint {
        &self.paints[0]
    }

    pub fn top_style(&self) -> &BorderStrokeStyle {
        &self.styles[0]
    }

    pub fn radii(&self) -> &CornerRadii {
        &self.radii
    }

    pub fn widths(&self) -> &BorderWidths {
        &self.widths
    }

    pub fn insets(&self) -> &Insets {
        &self.insets
    }

    /// Distance from the region edge to the inside of the line, per side.
    pub fn inner_edge(&self) -> &Insets {
        &self.inner_edge
    }

    /// Distance the line reaches outside the region edge, per side.
    pub fn outer_edge(&self) -> &Insets {
        &self.outer_edge
    }

    /// Same paint, style and width on every side.
    pub fn is_uniform(&self) -> bool {
        let widths = &self.widths;
        self.paints.iter().all(|paint| *paint == self.paints[0])
            && self.styles.iter().all(|style| *style == self.styles[0])
            && Side::ALL.iter().all(|side| {
                same(widths.side(*side), widths.top())
                    && widths.is_percentage(*side) == widths.is_percentage(Side::Top)
            })
    }

    pub fn cached_hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for BorderStroke {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.widths == other.widths
            && self.insets == other.insets
            && self.radii == other.radii
            && self.styles == other.styles
            && self.paints == other.paints
    }
}

impl Hash for BorderStroke {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct StrokeStyleRepr {
    #[serde(default = "default_visible")]
    visible: bool,
    stroke_type: StrokeType,
    line_join: StrokeLineJoin,
    line_cap: StrokeLineCap,
    miter_limit: f64,
    dash_offset: f64,
    #[serde(default)]
    dash_array: DashArray,
}

#[cfg(feature = "serde")]
fn default_visible() -> bool {
    true
}

#[cfg(feature = "serde")]
impl TryFrom<StrokeStyleRepr> for BorderStrokeStyle {
    type Error = ValueError;

    fn try_from(r: StrokeStyleRepr) -> ValueResult<Self> {
        if !r.visible {
            return Ok(BorderStrokeStyle::none());
        }
        BorderStrokeStyle::new(
            r.stroke_type,
            r.line_join,
            r.line_cap,
            r.miter_limit,
            r.dash_offset,
            r.dash_array,
        )
    }
}

#[cfg(feature = "serde")]
impl From<BorderStrokeStyle> for StrokeStyleRepr {
    fn from(s: BorderStrokeStyle) -> Self {
        Self {
            visible: s.visible,
            stroke_type: s.stroke_type,
            line_join: s.line_join,
            line_cap: s.line_cap,
            miter_limit: s.miter_limit,
            dash_offset: s.dash_offset,
            dash_array: s.dash_array,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct StrokeRepr {
    paints: Sides<Option<Paint>>,
    styles: Sides<Option<BorderStrokeStyle>>,
    radii: Option<CornerRadii>,
    widths: Option<BorderWidths>,
    insets: Option<Insets>,
}

#[cfg(feature = "serde")]
impl From<StrokeRepr> for BorderStroke {
    fn from(r: StrokeRepr) -> Self {
        BorderStroke::sides(r.paints, r.styles, r.radii, r.widths, r.insets)
    }
}

#[cfg(feature = "serde")]
impl From<BorderStroke> for StrokeRepr {
    fn from(s: BorderStroke) -> Self {
        Self {
            paints: s.paints.map(Some),
            styles: s.styles.map(Some),
            radii: Some(s.radii),
            widths: Some(s.widths),
            insets: Some(s.insets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn stroke(stroke_type: StrokeType, width: f64, inset: f64) -> BorderStroke {
        BorderStroke::new(
            Some(Color::BLACK.into()),
            Some(BorderStrokeStyle::solid().with_stroke_type(stroke_type)),
            None,
            Some(BorderWidths::uniform(width).unwrap()),
            Some(Insets::uniform(inset)),
        )
    }

    #[test]
    fn test_inside_edges() {
        let s = stroke(StrokeType::Inside, 4.0, 1.0);
        assert_eq!(s.inner_edge(), &Insets::uniform(5.0));
        assert_eq!(s.outer_edge(), &Insets::EMPTY);

        let s = stroke(StrokeType::Inside, 4.0, -3.0);
        assert_eq!(s.inner_edge(), &Insets::uniform(1.0));
        assert_eq!(s.outer_edge(), &Insets::uniform(3.0));
    }

    #[test]
    fn test_centered_edges() {
        let s = stroke(StrokeType::Centered, 4.0, 0.0);
        assert_eq!(s.inner_edge(), &Insets::uniform(2.0));
        assert_eq!(s.outer_edge(), &Insets::uniform(2.0));

        // Inset past half the width keeps the line inside
        let s = stroke(StrokeType::Centered, 4.0, 3.0);
        assert_eq!(s.inner_edge(), &Insets::uniform(5.0));
        assert_eq!(s.outer_edge(), &Insets::EMPTY);
    }

    #[test]
    fn test_outside_edges() {
        let s = stroke(StrokeType::Outside, 4.0, 1.0);
        assert_eq!(s.inner_edge(), &Insets::uniform(1.0));
        assert_eq!(s.outer_edge(), &Insets::uniform(3.0));
    }

    #[test]
    fn test_none_style_has_no_width() {
        let s = BorderStroke::new(
            None,
            Some(BorderStrokeStyle::none()),
            None,
            Some(BorderWidths::uniform(8.0).unwrap()),
            None,
        );
        assert_eq!(s.inner_edge(), &Insets::EMPTY);
        assert_eq!(s.outer_edge(), &Insets::EMPTY);
    }

    #[test]
    fn test_percentage_widths_contribute_zero() {
        let s = BorderStroke::new(
            None,
            Some(BorderStrokeStyle::solid().with_stroke_type(StrokeType::Inside)),
            None,
            Some(BorderWidths::FULL),
            None,
        );
        assert_eq!(s.inner_edge(), &Insets::EMPTY);
    }

    #[test]
    fn test_defaults() {
        let s = BorderStroke::new(None, None, None, None, None);
        assert_eq!(s.top_paint(), &Paint::BLACK);
        assert!(s.top_style().is_none());
        assert_eq!(s.widths(), &BorderWidths::DEFAULT);
        assert!(s.is_uniform());
    }

    #[test]
    fn test_not_uniform() {
        let s = BorderStroke::sides(
            [Some(Color::WHITE.into()), None, None, None],
            [None, None, None, None],
            None,
            None,
            None,
        );
        assert!(!s.is_uniform());
    }

    #[test]
    fn test_negative_miter_rejected() {
        let err = BorderStrokeStyle::new(
            StrokeType::Inside,
            StrokeLineJoin::Miter,
            StrokeLineCap::Butt,
            -1.0,
            0.0,
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ValueError::Negative { field: "miter limit", .. }));
    }

    #[test]
    fn test_style_equality() {
        assert_eq!(BorderStrokeStyle::solid(), BorderStrokeStyle::solid());
        assert_ne!(BorderStrokeStyle::solid(), BorderStrokeStyle::none());
        assert_ne!(BorderStrokeStyle::dotted(), BorderStrokeStyle::dashed());
    }
}
