//! Size negotiation helpers shared by the layouts.
//!
//! A layout asks each child for the size of the *area* it needs: the child's
//! own min, preferred or max size plus its margin, with the other dimension
//! resolved first when the child has a content bias. Baseline alignment adds
//! a complement (the part of a row below the baseline) to heights.
//!
//! Placement goes through [`LayoutContext::layout_in_area`], which sizes a
//! child within an area, aligns it and snaps the result.

use glam::DVec2;
use pane_core::{Bounds, HPos, Insets, Orientation, VPos, MAX_SIZE};
use tracing::trace;

use crate::node::Node;
use crate::snap::SnapOptions;

/// Clamp `pref` into `[min, max]`, letting `min` win when `min > max`.
pub fn bounded_size(min: f64, pref: f64, max: f64) -> f64 {
    let a = if pref >= min { pref } else { min };
    let b = if min >= max { min } else { max };
    if a <= b {
        a
    } else {
        b
    }
}

/// Offset of content `content_width` wide inside `width`.
pub fn compute_x_offset(width: f64, content_width: f64, hpos: HPos) -> f64 {
    match hpos {
        HPos::Left => 0.0,
        HPos::Center => (width - content_width) / 2.0,
        HPos::Right => width - content_width,
    }
}

/// Offset of content `content_height` tall inside `height`. Baseline counts as top.
pub fn compute_y_offset(height: f64, content_height: f64, vpos: VPos) -> f64 {
    match vpos {
        VPos::Top | VPos::Baseline => 0.0,
        VPos::Center => (height - content_height) / 2.0,
        VPos::Bottom => height - content_height,
    }
}

/// Baseline of a child, treating a non-resizable child's height as its baseline.
///
/// `None` is left only for resizable children whose baseline follows their height.
pub fn effective_baseline(child: &dyn Node) -> Option<f64> {
    child
        .baseline_offset()
        .or_else(|| (!child.is_resizable()).then(|| child.layout_bounds().height))
}

/// Size a node would take in an area, honoring its range and content bias.
pub fn bounded_node_size_with_bias(
    node: &dyn Node,
    area_width: f64,
    area_height: f64,
    fill_width: bool,
    fill_height: bool,
) -> DVec2 {
    let width_for = |height: Option<f64>| {
        let wanted = if fill_width {
            area_width
        } else {
            area_width.min(node.pref_width(height))
        };
        bounded_size(node.min_width(height), wanted, node.max_width(height))
    };
    let height_for = |width: Option<f64>| {
        let wanted = if fill_height {
            area_height
        } else {
            area_height.min(node.pref_height(width))
        };
        bounded_size(node.min_height(width), wanted, node.max_height(width))
    };

    match node.content_bias() {
        None => DVec2::new(width_for(None), height_for(None)),
        Some(Orientation::Horizontal) => {
            let width = width_for(None);
            DVec2::new(width, height_for(Some(width)))
        }
        Some(Orientation::Vertical) => {
            let height = height_for(None);
            DVec2::new(width_for(Some(height)), height)
        }
    }
}

/// Baseline complement: how far below their baseline children reach.
pub fn min_baseline_complement(children: &[&dyn Node]) -> f64 {
    baseline_complement(children, |child| child.min_height(None))
}

pub fn pref_baseline_complement(children: &[&dyn Node]) -> f64 {
    baseline_complement(children, |child| child.pref_height(None))
}

pub fn max_baseline_complement(children: &[&dyn Node]) -> f64 {
    baseline_complement(children, |child| child.max_height(None))
}

fn baseline_complement(children: &[&dyn Node], height: impl Fn(&dyn Node) -> f64) -> f64 {
    children.iter().fold(0.0, |complement: f64, child| {
        let Some(baseline) = child.baseline_offset() else {
            return complement;
        };
        let height = if child.is_resizable() {
            height(*child)
        } else {
            child.layout_bounds().height
        };
        complement.max(height - baseline)
    })
}

/// Margin sides after snapping.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// The container side of a layout pass: its insets, its current size and how
/// it snaps.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext {
    pub insets: Insets,
    pub width: f64,
    pub height: f64,
    pub snap: SnapOptions,
}

impl LayoutContext {
    /// Context for measuring, before the container has a size.
    pub fn new(insets: Insets, snap: SnapOptions) -> Self {
        Self {
            insets,
            width: 0.0,
            height: 0.0,
            snap,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn top(&self) -> f64 {
        self.snap.snap_space_y(self.insets.top())
    }

    pub fn right(&self) -> f64 {
        self.snap.snap_space_x(self.insets.right())
    }

    pub fn bottom(&self) -> f64 {
        self.snap.snap_space_y(self.insets.bottom())
    }

    pub fn left(&self) -> f64 {
        self.snap.snap_space_x(self.insets.left())
    }

    /// Width inside the snapped insets.
    pub fn content_width(&self) -> f64 {
        self.width - self.left() - self.right()
    }

    /// Height inside the snapped insets.
    pub fn content_height(&self) -> f64 {
        self.height - self.top() - self.bottom()
    }

    pub(crate) fn margin(&self, margin: Option<Insets>) -> Margin {
        match margin {
            None => Margin::default(),
            Some(m) => Margin {
                top: self.snap.snap_space_y(m.top()),
                right: self.snap.snap_space_x(m.right()),
                bottom: self.snap.snap_space_y(m.bottom()),
                left: self.snap.snap_space_x(m.left()),
            },
        }
    }

    pub fn adjust_width_by_margin(&self, width: f64, margin: Option<Insets>) -> f64 {
        width - self.margin(margin).horizontal()
    }

    pub fn adjust_height_by_margin(&self, height: f64, margin: Option<Insets>) -> f64 {
        height - self.margin(margin).vertical()
    }

    /// Height to measure a vertically biased child's width against.
    fn alt_height(
        &self,
        child: &dyn Node,
        baseline_complement: Option<f64>,
        margin: &Margin,
        height: Option<f64>,
        fill_height: bool,
    ) -> Option<f64> {
        let height = height?;
        if !child.is_resizable() || child.content_bias() != Some(Orientation::Vertical) {
            return None;
        }
        let content_height = match (child.baseline_offset(), baseline_complement) {
            (None, Some(complement)) => height - margin.vertical() - complement,
            _ => height - margin.vertical(),
        };
        let alt = if fill_height {
            bounded_size(
                child.min_height(None),
                content_height,
                child.max_height(None),
            )
        } else {
            bounded_size(
                child.min_height(None),
                child.pref_height(None),
                child.max_height(None).min(content_height),
            )
        };
        Some(self.snap.snap_size_y(alt))
    }

    /// Width to measure a horizontally biased child's height against.
    fn alt_width(
        &self,
        child: &dyn Node,
        margin: &Margin,
        width: Option<f64>,
        fallback: impl FnOnce() -> f64,
    ) -> Option<f64> {
        if !child.is_resizable() || child.content_bias() != Some(Orientation::Horizontal) {
            return None;
        }
        let alt = match width {
            Some(width) => bounded_size(
                child.min_width(None),
                width - margin.horizontal(),
                child.max_width(None),
            ),
            None => fallback(),
        };
        Some(self.snap.snap_size_x(alt))
    }

    pub fn child_min_area_width(
        &self,
        child: &dyn Node,
        baseline_complement: Option<f64>,
        margin: Option<Insets>,
        height: Option<f64>,
        fill_height: bool,
    ) -> f64 {
        let m = self.margin(margin);
        let alt = self.alt_height(child, baseline_complement, &m, height, fill_height);
        m.left + self.snap.snap_size_x(child.min_width(alt)) + m.right
    }

    pub fn child_pref_area_width(
        &self,
        child: &dyn Node,
        baseline_complement: Option<f64>,
        margin: Option<Insets>,
        height: Option<f64>,
        fill_height: bool,
    ) -> f64 {
        let m = self.margin(margin);
        let alt = self.alt_height(child, baseline_complement, &m, height, fill_height);
        let width = bounded_size(
            child.min_width(alt),
            child.pref_width(alt),
            child.max_width(alt),
        );
        m.left + self.snap.snap_size_x(width) + m.right
    }

    pub fn child_max_area_width(
        &self,
        child: &dyn Node,
        baseline_complement: Option<f64>,
        margin: Option<Insets>,
        height: Option<f64>,
        fill_height: bool,
    ) -> f64 {
        let mut max = child.max_width(None);
        if max == MAX_SIZE {
            return max;
        }
        let m = self.margin(margin);
        let alt = self.alt_height(child, baseline_complement, &m, height, fill_height);
        if alt.is_some() {
            max = child.max_width(alt);
        }
        m.left + self.snap.snap_size_x(bounded_size(child.min_width(alt), max, MAX_SIZE)) + m.right
    }

    pub fn child_min_area_height(
        &self,
        child: &dyn Node,
        min_baseline_complement: Option<f64>,
        margin: Option<Insets>,
        width: Option<f64>,
    ) -> f64 {
        let m = self.margin(margin);
        let alt = self.alt_width(child, &m, width, || child.max_width(None));
        let own = || m.top + self.snap.snap_size_y(child.min_height(alt)) + m.bottom;
        match min_baseline_complement {
            None => own(),
            Some(complement) => match effective_baseline(child) {
                None => own() + complement,
                Some(baseline) => baseline + complement,
            },
        }
    }

    pub fn child_pref_area_height(
        &self,
        child: &dyn Node,
        pref_baseline_complement: Option<f64>,
        margin: Option<Insets>,
        width: Option<f64>,
    ) -> f64 {
        let m = self.margin(margin);
        let alt = self.alt_width(child, &m, width, || {
            bounded_size(
                child.min_width(None),
                child.pref_width(None),
                child.max_width(None),
            )
        });
        let own = || {
            let height = bounded_size(
                child.min_height(alt),
                child.pref_height(alt),
                child.max_height(alt),
            );
            m.top + self.snap.snap_size_y(height) + m.bottom
        };
        match pref_baseline_complement {
            None => own(),
            Some(complement) => match effective_baseline(child) {
                None => own() + complement,
                Some(baseline) => m.top + baseline + complement + m.bottom,
            },
        }
    }

    pub fn child_max_area_height(
        &self,
        child: &dyn Node,
        max_baseline_complement: Option<f64>,
        margin: Option<Insets>,
        width: Option<f64>,
    ) -> f64 {
        let mut max = child.max_height(None);
        if max == MAX_SIZE {
            return max;
        }
        let m = self.margin(margin);
        let alt = self.alt_width(child, &m, width, || child.min_width(None));
        if alt.is_some() {
            max = child.max_height(alt);
        }
        match max_baseline_complement {
            None => {
                m.top
                    + self.snap.snap_size_y(bounded_size(child.min_height(alt), max, MAX_SIZE))
                    + m.bottom
            }
            Some(complement) => match effective_baseline(child) {
                None => {
                    let height = bounded_size(child.min_height(alt), child.max_height(alt), MAX_SIZE);
                    m.top + self.snap.snap_size_y(height) + m.bottom + complement
                }
                Some(baseline) => m.top + baseline + complement + m.bottom,
            },
        }
    }

    /// Largest min area width among `children`.
    ///
    /// `heights` yields the height each child is measured against, by index.
    pub fn max_min_area_width(
        &self,
        children: &[&dyn Node],
        margin_key: &str,
        heights: impl Fn(usize) -> Option<f64>,
        fill_height: bool,
    ) -> f64 {
        children.iter().enumerate().fold(0.0, |max: f64, (i, child)| {
            let margin = child.properties().insets(margin_key);
            max.max(self.child_min_area_width(*child, None, margin, heights(i), fill_height))
        })
    }

    /// Largest preferred area width among `children`.
    pub fn max_pref_area_width(
        &self,
        children: &[&dyn Node],
        margin_key: &str,
        heights: impl Fn(usize) -> Option<f64>,
        fill_height: bool,
    ) -> f64 {
        children.iter().enumerate().fold(0.0, |max: f64, (i, child)| {
            let margin = child.properties().insets(margin_key);
            max.max(self.child_pref_area_width(*child, None, margin, heights(i), fill_height))
        })
    }

    /// Largest min area height among `children`.
    ///
    /// With baseline alignment the result is the tallest ascent plus the
    /// deepest descent rather than the tallest child.
    pub fn max_min_area_height(
        &self,
        children: &[&dyn Node],
        margin_key: &str,
        widths: impl Fn(usize) -> Option<f64>,
        valignment: VPos,
    ) -> f64 {
        self.max_area_height(children, margin_key, widths, valignment, true)
    }

    /// Largest preferred area height among `children`, baseline aware.
    pub fn max_pref_area_height(
        &self,
        children: &[&dyn Node],
        margin_key: &str,
        widths: impl Fn(usize) -> Option<f64>,
        valignment: VPos,
    ) -> f64 {
        self.max_area_height(children, margin_key, widths, valignment, false)
    }

    fn max_area_height(
        &self,
        children: &[&dyn Node],
        margin_key: &str,
        widths: impl Fn(usize) -> Option<f64>,
        valignment: VPos,
        minimum: bool,
    ) -> f64 {
        if valignment != VPos::Baseline {
            return children.iter().enumerate().fold(0.0, |max: f64, (i, child)| {
                let margin = child.properties().insets(margin_key);
                let height = if minimum {
                    self.child_min_area_height(*child, None, margin, widths(i))
                } else {
                    self.child_pref_area_height(*child, None, margin, widths(i))
                };
                max.max(height)
            });
        }

        let mut max_above: f64 = 0.0;
        let mut max_below: f64 = 0.0;
        for (i, child) in children.iter().enumerate() {
            let m = self.margin(child.properties().insets(margin_key));
            let width = widths(i);
            let height = if minimum {
                self.snap.snap_size_y(child.min_height(width))
            } else {
                self.snap.snap_size_y(child.pref_height(width))
            };
            match effective_baseline(*child) {
                None => max_above = max_above.max(height + m.top),
                Some(baseline) => {
                    max_above = max_above.max(baseline + m.top);
                    max_below = max_below.max(self.snap.snap_space_y(height) - baseline + m.bottom);
                }
            }
        }
        max_above + max_below
    }

    /// Shared baseline offset for children aligned on their baseline in an
    /// area `area_height` tall.
    pub fn area_baseline_offset(
        &self,
        children: &[&dyn Node],
        margin_key: &str,
        position_to_width: impl Fn(usize) -> Option<f64>,
        area_height: f64,
        fill_height: impl Fn(usize) -> bool,
        min_complement: f64,
    ) -> f64 {
        children.iter().enumerate().fold(0.0, |offset: f64, (i, child)| {
            let m = self.margin(child.properties().insets(margin_key));
            let ascent = match child.baseline_offset() {
                Some(baseline) => baseline,
                None if !child.is_resizable() => child.layout_bounds().height,
                None => {
                    let alt = if child.content_bias() == Some(Orientation::Horizontal) {
                        position_to_width(i)
                    } else {
                        None
                    };
                    let space = area_height - min_complement - m.vertical();
                    if fill_height(i) {
                        bounded_size(child.min_height(alt), space, child.max_height(alt))
                    } else {
                        bounded_size(
                            child.min_height(alt),
                            child.pref_height(alt),
                            child.max_height(alt).min(space),
                        )
                    }
                }
            };
            offset.max(m.top + ascent)
        })
    }

    /// Size `child` within `area` and align it there.
    ///
    /// A resizable child is sized to its preferred size, or to the area when
    /// filling, always kept within its own min and max. The child is then
    /// positioned by `hpos` and `vpos`; with baseline alignment its baseline
    /// lands `area_baseline` below the top of the area.
    #[allow(clippy::too_many_arguments)]
    pub fn layout_in_area(
        &self,
        child: &mut dyn Node,
        area: Bounds,
        area_baseline: f64,
        margin: Option<Insets>,
        fill_width: bool,
        fill_height: bool,
        hpos: HPos,
        vpos: VPos,
    ) {
        let mut m = self.margin(margin);

        if vpos == VPos::Baseline {
            match effective_baseline(child) {
                None => m.bottom += self.snap.snap_space_y(area.height - area_baseline),
                Some(baseline) => m.top = self.snap.snap_space_y(area_baseline - baseline),
            }
        }

        if child.is_resizable() {
            let size = bounded_node_size_with_bias(
                child,
                area.width - m.horizontal(),
                area.height - m.vertical(),
                fill_width,
                fill_height,
            );
            child.resize(self.snap.snap_size_x(size.x), self.snap.snap_size_y(size.y));
        }
        self.position(child, area, area_baseline, &m, hpos, vpos);
    }

    /// Align `child` within `area` without resizing it.
    pub fn position_in_area(
        &self,
        child: &mut dyn Node,
        area: Bounds,
        area_baseline: f64,
        margin: Option<Insets>,
        hpos: HPos,
        vpos: VPos,
    ) {
        let m = self.margin(margin);
        self.position(child, area, area_baseline, &m, hpos, vpos);
    }

    fn position(
        &self,
        child: &mut dyn Node,
        area: Bounds,
        area_baseline: f64,
        m: &Margin,
        hpos: HPos,
        vpos: VPos,
    ) {
        let bounds = child.layout_bounds();
        let x_offset = m.left + compute_x_offset(area.width - m.horizontal(), bounds.width, hpos);
        let y_offset = if vpos == VPos::Baseline {
            match child.baseline_offset() {
                Some(baseline) => area_baseline - baseline,
                None => area_baseline - bounds.height,
            }
        } else {
            m.top + compute_y_offset(area.height - m.vertical(), bounds.height, vpos)
        };

        let x = self.snap.snap_position_x(area.x + x_offset);
        let y = self.snap.snap_position_y(area.y + y_offset);
        trace!(x, y, width = bounds.width, height = bounds.height, "position child");
        child.relocate(x - bounds.x, y - bounds.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Leaf;

    fn ctx() -> LayoutContext {
        LayoutContext::new(Insets::EMPTY, SnapOptions::default())
    }

    #[test]
    fn test_bounded_size_min_wins() {
        assert!((bounded_size(10.0, 5.0, 20.0) - 10.0).abs() < 1e-9);
        assert!((bounded_size(10.0, 50.0, 20.0) - 20.0).abs() < 1e-9);
        assert!((bounded_size(30.0, 25.0, 20.0) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_offsets() {
        assert!((compute_x_offset(100.0, 40.0, HPos::Center) - 30.0).abs() < 1e-9);
        assert!((compute_x_offset(100.0, 40.0, HPos::Right) - 60.0).abs() < 1e-9);
        assert_eq!(compute_y_offset(100.0, 40.0, VPos::Baseline), 0.0);
        assert!((compute_y_offset(100.0, 40.0, VPos::Bottom) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_pref_area_width_adds_margin() {
        let leaf = Leaf::new(40.0, 10.0);
        let margin = Some(Insets::new(1.0, 2.0, 3.0, 4.0));
        let width = ctx().child_pref_area_width(&leaf, None, margin, None, false);
        assert!((width - 46.0).abs() < 1e-9);
    }

    #[test]
    fn test_pref_area_width_snaps_up() {
        let leaf = Leaf::new(40.2, 10.0);
        let width = ctx().child_pref_area_width(&leaf, None, None, None, false);
        assert!((width - 41.0).abs() < 1e-9);
    }

    #[test]
    fn test_biased_height_uses_width() {
        let leaf = Leaf::new(100.0, 10.0).with_wrap(1000.0);
        let height = ctx().child_pref_area_height(&leaf, None, None, Some(40.0));
        assert!((height - 25.0).abs() < 1e-9);
        // Without a width the preferred width drives the height
        let height = ctx().child_pref_area_height(&leaf, None, None, None);
        assert!((height - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_area_width_unbounded() {
        let leaf = Leaf::new(40.0, 10.0);
        assert_eq!(
            ctx().child_max_area_width(&leaf, None, Some(Insets::uniform(5.0)), None, false),
            MAX_SIZE
        );
    }

    #[test]
    fn test_baseline_area_height() {
        let a = Leaf::new(20.0, 30.0).with_baseline(20.0);
        let b = Leaf::new(20.0, 16.0).with_baseline(4.0);
        let children: Vec<&dyn Node> = vec![&a, &b];
        // Ascent max(20, 4) plus descent max(10, 12)
        let height = ctx().max_pref_area_height(&children, "margin", |_| None, VPos::Baseline);
        assert!((height - 32.0).abs() < 1e-9);
        let plain = ctx().max_pref_area_height(&children, "margin", |_| None, VPos::Top);
        assert!((plain - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_complement() {
        let a = Leaf::new(20.0, 30.0).with_baseline(20.0);
        let b = Leaf::new(20.0, 16.0).with_baseline(4.0);
        let c = Leaf::new(20.0, 50.0);
        let children: Vec<&dyn Node> = vec![&a, &b, &c];
        assert!((pref_baseline_complement(&children) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_in_area_fill_and_align() {
        let mut leaf = Leaf::new(40.0, 10.0).with_max(60.0, 100.0);
        ctx().layout_in_area(
            &mut leaf,
            Bounds::new(10.0, 20.0, 100.0, 50.0),
            0.0,
            None,
            true,
            true,
            HPos::Center,
            VPos::Center,
        );
        // Width capped at max 60 and centered in 100
        assert_eq!(leaf.bounds_in_parent(), Bounds::new(30.0, 20.0, 60.0, 50.0));
    }

    #[test]
    fn test_layout_in_area_no_fill_uses_pref() {
        let mut leaf = Leaf::new(40.0, 10.0);
        ctx().layout_in_area(
            &mut leaf,
            Bounds::new(0.0, 0.0, 100.0, 50.0),
            0.0,
            Some(Insets::new(0.0, 5.0, 5.0, 0.0)),
            false,
            false,
            HPos::Right,
            VPos::Bottom,
        );
        assert_eq!(leaf.bounds_in_parent(), Bounds::new(55.0, 35.0, 40.0, 10.0));
    }

    #[test]
    fn test_layout_in_area_baseline() {
        let mut leaf = Leaf::new(40.0, 16.0).with_baseline(12.0);
        ctx().layout_in_area(
            &mut leaf,
            Bounds::new(0.0, 10.0, 100.0, 50.0),
            30.0,
            None,
            false,
            false,
            HPos::Left,
            VPos::Baseline,
        );
        assert!((leaf.layout_y() - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_child_is_only_positioned() {
        let mut leaf = Leaf::fixed(30.0, 10.0);
        ctx().layout_in_area(
            &mut leaf,
            Bounds::new(0.0, 0.0, 100.0, 100.0),
            0.0,
            None,
            true,
            true,
            HPos::Center,
            VPos::Top,
        );
        assert_eq!(leaf.bounds_in_parent(), Bounds::new(35.0, 0.0, 30.0, 10.0));
    }
}
