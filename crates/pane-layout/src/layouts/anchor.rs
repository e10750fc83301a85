//! Anchor layout: children pinned to container edges.
//!
//! Each child may carry top, left, bottom and right anchors. A resizable child
//! anchored on two opposite sides is stretched between them; otherwise the
//! leading anchor wins and a lone trailing anchor pins the trailing edge. A
//! child with no anchor on an axis keeps its current position on that axis.
//!
//! Vertically biased children have their height resolved before their width,
//! horizontally biased children the other way around.

use pane_core::Orientation;
use tracing::trace;

use super::{managed, managed_mut, set_constraint};
use crate::node::Node;
use crate::primitives::LayoutContext;
use crate::region::Layout;

pub const TOP_ANCHOR: &str = "pane-top-anchor";
pub const LEFT_ANCHOR: &str = "pane-left-anchor";
pub const BOTTOM_ANCHOR: &str = "pane-bottom-anchor";
pub const RIGHT_ANCHOR: &str = "pane-right-anchor";

#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorLayout;

#[derive(Debug, Clone, Copy, Default)]
struct Anchors {
    top: Option<f64>,
    left: Option<f64>,
    bottom: Option<f64>,
    right: Option<f64>,
}

impl Anchors {
    fn of(child: &dyn Node) -> Self {
        let properties = child.properties();
        Self {
            top: properties.number(TOP_ANCHOR),
            left: properties.number(LEFT_ANCHOR),
            bottom: properties.number(BOTTOM_ANCHOR),
            right: properties.number(RIGHT_ANCHOR),
        }
    }
}

impl AnchorLayout {
    /// Pin `child` this far below the top content edge.
    pub fn set_top_anchor(child: &mut dyn Node, value: Option<f64>) {
        set_constraint(child, TOP_ANCHOR, value.map(Into::into));
    }

    /// Distance from the top content edge, if pinned.
    pub fn top_anchor(child: &dyn Node) -> Option<f64> {
        child.properties().number(TOP_ANCHOR)
    }

    /// Pin `child` this far right of the left content edge.
    pub fn set_left_anchor(child: &mut dyn Node, value: Option<f64>) {
        set_constraint(child, LEFT_ANCHOR, value.map(Into::into));
    }

    /// Distance from the left content edge, if pinned.
    pub fn left_anchor(child: &dyn Node) -> Option<f64> {
        child.properties().number(LEFT_ANCHOR)
    }

    /// Pin `child` this far above the bottom content edge.
    pub fn set_bottom_anchor(child: &mut dyn Node, value: Option<f64>) {
        set_constraint(child, BOTTOM_ANCHOR, value.map(Into::into));
    }

    /// Distance from the bottom content edge, if pinned.
    pub fn bottom_anchor(child: &dyn Node) -> Option<f64> {
        child.properties().number(BOTTOM_ANCHOR)
    }

    /// Pin `child` this far left of the right content edge.
    pub fn set_right_anchor(child: &mut dyn Node, value: Option<f64>) {
        set_constraint(child, RIGHT_ANCHOR, value.map(Into::into));
    }

    /// Distance from the right content edge, if pinned.
    pub fn right_anchor(child: &dyn Node) -> Option<f64> {
        child.properties().number(RIGHT_ANCHOR)
    }

    /// Remove every anchor from `child`.
    pub fn clear_constraints(child: &mut dyn Node) {
        child
            .properties_mut()
            .remove_all(&[TOP_ANCHOR, LEFT_ANCHOR, BOTTOM_ANCHOR, RIGHT_ANCHOR]);
    }
}

/// Width of a child inside a container `area_width` wide.
fn child_width(
    ctx: &LayoutContext,
    child: &dyn Node,
    anchors: &Anchors,
    area_width: f64,
    height: Option<f64>,
) -> f64 {
    match (anchors.left, anchors.right) {
        (Some(left), Some(right)) if child.is_resizable() => {
            area_width - ctx.left() - ctx.right() - left - right
        }
        _ => ctx.child_pref_area_width(child, None, None, height, true),
    }
}

/// Height of a child inside a container `area_height` tall.
fn child_height(
    ctx: &LayoutContext,
    child: &dyn Node,
    anchors: &Anchors,
    area_height: f64,
    width: Option<f64>,
) -> f64 {
    match (anchors.top, anchors.bottom) {
        (Some(top), Some(bottom)) if child.is_resizable() => {
            area_height - ctx.top() - ctx.bottom() - top - bottom
        }
        _ => ctx.child_pref_area_height(child, None, None, width),
    }
}

impl AnchorLayout {
    fn compute_width(
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        minimum: bool,
        height: Option<f64>,
    ) -> f64 {
        let max = managed(children).iter().fold(0.0, |max: f64, child| {
            let anchors = Anchors::of(*child);
            let left = anchors.left.unwrap_or_else(|| {
                if anchors.right.is_some() {
                    0.0
                } else {
                    child.layout_bounds().x + child.layout_x()
                }
            });
            let right = anchors.right.unwrap_or(0.0);

            let for_height = match height {
                Some(height) if child.content_bias() == Some(Orientation::Vertical) => {
                    Some(child_height(ctx, *child, &anchors, height, None))
                }
                _ => None,
            };
            let both = anchors.left.is_some() && anchors.right.is_some();
            let area = if minimum && both && child.is_resizable() {
                child.min_width(for_height)
            } else {
                ctx.child_pref_area_width(*child, None, None, for_height, false)
            };
            max.max(left + area + right)
        });
        ctx.left() + max + ctx.right()
    }

    fn compute_height(
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        minimum: bool,
        width: Option<f64>,
    ) -> f64 {
        let max = managed(children).iter().fold(0.0, |max: f64, child| {
            let anchors = Anchors::of(*child);
            let top = anchors.top.unwrap_or_else(|| {
                if anchors.bottom.is_some() {
                    0.0
                } else {
                    child.layout_bounds().y + child.layout_y()
                }
            });
            let bottom = anchors.bottom.unwrap_or(0.0);

            let for_width = match width {
                Some(width) if child.content_bias() == Some(Orientation::Horizontal) => {
                    Some(child_width(ctx, *child, &anchors, width, None))
                }
                _ => None,
            };
            let both = anchors.top.is_some() && anchors.bottom.is_some();
            let area = if minimum && both && child.is_resizable() {
                child.min_height(for_width)
            } else {
                ctx.child_pref_area_height(*child, None, None, for_width)
            };
            max.max(top + area + bottom)
        });
        ctx.top() + max + ctx.bottom()
    }
}

impl Layout for AnchorLayout {
    fn compute_min_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        Self::compute_width(ctx, children, true, height)
    }

    fn compute_min_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        Self::compute_height(ctx, children, true, width)
    }

    fn compute_pref_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        Self::compute_width(ctx, children, false, height)
    }

    fn compute_pref_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        Self::compute_height(ctx, children, false, width)
    }

    fn layout_children(&mut self, ctx: &LayoutContext, children: &mut [Box<dyn Node>]) {
        for child in managed_mut(children) {
            let child = child.as_mut();
            let anchors = Anchors::of(child);

            let (width, height) = match child.content_bias() {
                Some(Orientation::Vertical) => {
                    let height = child_height(ctx, child, &anchors, ctx.height, None);
                    (child_width(ctx, child, &anchors, ctx.width, Some(height)), height)
                }
                Some(Orientation::Horizontal) => {
                    let width = child_width(ctx, child, &anchors, ctx.width, None);
                    (width, child_height(ctx, child, &anchors, ctx.height, Some(width)))
                }
                None => (
                    child_width(ctx, child, &anchors, ctx.width, None),
                    child_height(ctx, child, &anchors, ctx.height, None),
                ),
            };

            let bounds = child.layout_bounds();
            let x = match (anchors.left, anchors.right) {
                (Some(left), _) => ctx.left() + left,
                (None, Some(right)) => ctx.width - ctx.right() - right - width,
                (None, None) => bounds.x + child.layout_x(),
            };
            let y = match (anchors.top, anchors.bottom) {
                (Some(top), _) => ctx.top() + top,
                (None, Some(bottom)) => ctx.height - ctx.bottom() - bottom - height,
                (None, None) => bounds.y + child.layout_y(),
            };

            trace!(x, y, width, height, "anchor child");
            child.resize(width, height);
            child.relocate(x - bounds.x, y - bounds.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Leaf;
    use crate::region::AnchorPane;
    use pane_core::{Bounds, Insets, MAX_SIZE};

    fn leaf(width: f64, height: f64) -> Box<dyn Node> {
        Box::new(Leaf::new(width, height))
    }

    #[test]
    fn test_stretch_between_anchors() {
        let mut child = Leaf::new(100.0, 20.0).with_min(50.0, 0.0);
        AnchorLayout::set_left_anchor(&mut child, Some(10.0));
        AnchorLayout::set_right_anchor(&mut child, Some(20.0));
        let mut pane = AnchorPane::with_children(AnchorLayout, vec![Box::new(child)]);
        pane.resize(300.0, 100.0);
        pane.layout();
        let bounds = pane.child_bounds(0).unwrap();
        assert!((bounds.x - 10.0).abs() < 1e-9);
        assert!((bounds.width - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_anchor_alone_pins_trailing_edge() {
        let mut child = Leaf::new(40.0, 20.0);
        AnchorLayout::set_right_anchor(&mut child, Some(5.0));
        AnchorLayout::set_bottom_anchor(&mut child, Some(5.0));
        let mut pane = AnchorPane::with_children(AnchorLayout, vec![Box::new(child)]);
        pane.resize(200.0, 100.0);
        pane.layout();
        assert_eq!(pane.child_bounds(0), Some(Bounds::new(155.0, 75.0, 40.0, 20.0)));
    }

    #[test]
    fn test_unanchored_child_keeps_position() {
        let mut pane = AnchorPane::with_children(
            AnchorLayout,
            vec![Box::new(Leaf::new(30.0, 10.0).with_position(12.0, 7.0))],
        );
        pane.resize(200.0, 100.0);
        pane.layout();
        assert_eq!(pane.child_bounds(0), Some(Bounds::new(12.0, 7.0, 30.0, 10.0)));
    }

    #[test]
    fn test_pref_size_includes_anchors_and_insets() {
        let mut child = Leaf::new(50.0, 20.0);
        AnchorLayout::set_left_anchor(&mut child, Some(10.0));
        AnchorLayout::set_top_anchor(&mut child, Some(4.0));
        let pane = AnchorPane::with_children(AnchorLayout, vec![Box::new(child), leaf(10.0, 10.0)])
            .with_padding(Insets::uniform(2.0));
        assert!((pane.pref_width(None) - 64.0).abs() < 1e-9);
        assert!((pane.pref_height(None) - 28.0).abs() < 1e-9);
        assert_eq!(pane.max_width(None), MAX_SIZE);
    }

    #[test]
    fn test_min_uses_child_min_when_stretched() {
        let mut child = Leaf::new(100.0, 20.0).with_min(50.0, 0.0);
        AnchorLayout::set_left_anchor(&mut child, Some(10.0));
        AnchorLayout::set_right_anchor(&mut child, Some(20.0));
        let pane = AnchorPane::with_children(AnchorLayout, vec![Box::new(child)]);
        assert!((pane.min_width(None) - 80.0).abs() < 1e-9);
        assert!((pane.pref_width(None) - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_resizable_ignores_trailing_anchor() {
        let mut child = Leaf::fixed(40.0, 10.0);
        AnchorLayout::set_left_anchor(&mut child, Some(10.0));
        AnchorLayout::set_right_anchor(&mut child, Some(10.0));
        let mut pane = AnchorPane::with_children(AnchorLayout, vec![Box::new(child)]);
        pane.resize(300.0, 100.0);
        pane.layout();
        assert_eq!(pane.child_bounds(0), Some(Bounds::new(10.0, 0.0, 40.0, 10.0)));
    }

    #[test]
    fn test_clear_constraints() {
        let mut child = Leaf::new(10.0, 10.0);
        AnchorLayout::set_top_anchor(&mut child, Some(1.0));
        AnchorLayout::set_left_anchor(&mut child, Some(2.0));
        AnchorLayout::set_left_anchor(&mut child, None);
        assert_eq!(AnchorLayout::left_anchor(&child), None);
        AnchorLayout::clear_constraints(&mut child);
        assert!(child.properties().is_empty());
    }
}
