//! Edge-dock layout: top, bottom, left, right and center slots.
//!
//! Top and bottom span the full width at their preferred height. Left and
//! right take their preferred width between them. Center is resized to fill
//! whatever is left. A child occupies a slot through a [`Slot`] constraint;
//! [`Pane::set_slot`] keeps at most one child per slot.
//!
//! The container bias comes from the center child first, then a vertically
//! biased right or left child, then a horizontally biased bottom or top child.

use pane_core::{Bounds, HPos, Insets, Orientation, Pos, VPos};
use tracing::{debug, trace};

use super::set_constraint;
use crate::constraints::Slot;
use crate::node::Node;
use crate::primitives::{bounded_node_size_with_bias, LayoutContext};
use crate::region::{Layout, Pane};

pub const SLOT: &str = "borderpane-slot";
pub const ALIGNMENT: &str = "borderpane-alignment";
pub const MARGIN: &str = "borderpane-margin";

#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderLayout;

impl BorderLayout {
    /// Set the alignment of `child` inside its slot.
    pub fn set_alignment(child: &mut dyn Node, value: Option<Pos>) {
        set_constraint(child, ALIGNMENT, value.map(Into::into));
    }

    /// Alignment of `child` inside its slot.
    pub fn alignment(child: &dyn Node) -> Option<Pos> {
        child.properties().pos(ALIGNMENT)
    }

    /// Set the space around `child`.
    pub fn set_margin(child: &mut dyn Node, value: Option<Insets>) {
        set_constraint(child, MARGIN, value.map(Into::into));
    }

    /// Space around `child`.
    pub fn margin(child: &dyn Node) -> Option<Insets> {
        child.properties().insets(MARGIN)
    }

    /// Slot `child` occupies, if any.
    pub fn slot(child: &dyn Node) -> Option<Slot> {
        child.properties().slot(SLOT)
    }

    /// Remove every border constraint from `child`.
    pub fn clear_constraints(child: &mut dyn Node) {
        child.properties_mut().remove_all(&[SLOT, ALIGNMENT, MARGIN]);
    }
}

fn slot_index(children: &[Box<dyn Node>], slot: Slot) -> Option<usize> {
    children
        .iter()
        .position(|child| child.properties().slot(SLOT) == Some(slot))
}

/// The managed child in `slot`.
fn slot_child(children: &[Box<dyn Node>], slot: Slot) -> Option<&dyn Node> {
    slot_index(children, slot)
        .map(|i| children[i].as_ref())
        .filter(|child| child.is_managed())
}

fn has_bias(child: Option<&dyn Node>, bias: Orientation) -> bool {
    child.is_some_and(|child| child.content_bias() == Some(bias))
}

fn area_width(
    ctx: &LayoutContext,
    child: Option<&dyn Node>,
    height: Option<f64>,
    minimum: bool,
) -> f64 {
    let Some(child) = child else {
        return 0.0;
    };
    let margin = BorderLayout::margin(child);
    if minimum {
        ctx.child_min_area_width(child, None, margin, height, false)
    } else {
        ctx.child_pref_area_width(child, None, margin, height, false)
    }
}

fn area_height(
    ctx: &LayoutContext,
    child: Option<&dyn Node>,
    width: Option<f64>,
    minimum: bool,
) -> f64 {
    let Some(child) = child else {
        return 0.0;
    };
    let margin = BorderLayout::margin(child);
    if minimum {
        ctx.child_min_area_height(child, None, margin, width)
    } else {
        ctx.child_pref_area_height(child, None, margin, width)
    }
}

struct Slots<'a> {
    top: Option<&'a dyn Node>,
    bottom: Option<&'a dyn Node>,
    left: Option<&'a dyn Node>,
    right: Option<&'a dyn Node>,
    center: Option<&'a dyn Node>,
}

impl<'a> Slots<'a> {
    fn of(children: &'a [Box<dyn Node>]) -> Self {
        Self {
            top: slot_child(children, Slot::Top),
            bottom: slot_child(children, Slot::Bottom),
            left: slot_child(children, Slot::Left),
            right: slot_child(children, Slot::Right),
            center: slot_child(children, Slot::Center),
        }
    }

    fn middle_has_bias(&self, bias: Orientation) -> bool {
        has_bias(self.left, bias) || has_bias(self.right, bias) || has_bias(self.center, bias)
    }
}

impl BorderLayout {
    /// Width with the top, bottom and center terms at min (`minimum`) or pref.
    fn compute_width(ctx: &LayoutContext, slots: &Slots, height: Option<f64>, minimum: bool) -> f64 {
        let top = area_width(ctx, slots.top, None, minimum);
        let bottom = area_width(ctx, slots.bottom, None, minimum);

        let inside_height = height.map(|height| (height - ctx.top() - ctx.bottom()).max(0.0));
        let middle_height = match inside_height {
            Some(inside_height) if slots.middle_has_bias(Orientation::Vertical) => {
                let top_height = area_height(ctx, slots.top, None, false);
                let bottom_height = area_height(ctx, slots.bottom, None, false);
                Some((inside_height - top_height - bottom_height).max(0.0))
            }
            _ => None,
        };
        let left = area_width(ctx, slots.left, middle_height, false);
        let right = area_width(ctx, slots.right, middle_height, false);
        let center = area_width(ctx, slots.center, middle_height, minimum);

        ctx.left() + (left + center + right).max(top.max(bottom)) + ctx.right()
    }

    /// `width` is the full pane width; children are measured inside the insets.
    fn compute_height(ctx: &LayoutContext, slots: &Slots, width: Option<f64>, minimum: bool) -> f64 {
        let inside_width = width.map(|width| (width - ctx.left() - ctx.right()).max(0.0));
        let top = area_height(ctx, slots.top, inside_width, false);
        let bottom = area_height(ctx, slots.bottom, inside_width, false);
        let left = area_height(ctx, slots.left, None, minimum);
        let right = area_height(ctx, slots.right, None, minimum);

        let center_width = match inside_width {
            Some(inside_width) if slots.middle_has_bias(Orientation::Horizontal) => {
                let left_width = area_width(ctx, slots.left, None, false);
                let right_width = area_width(ctx, slots.right, None, false);
                Some((inside_width - left_width - right_width).max(0.0))
            }
            _ => None,
        };
        let center = area_height(ctx, slots.center, center_width, minimum);

        ctx.top() + top + center.max(left.max(right)) + bottom + ctx.bottom()
    }
}

impl Layout for BorderLayout {
    fn content_bias(&self, children: &[Box<dyn Node>]) -> Option<Orientation> {
        let slots = Slots::of(children);
        if let Some(bias) = slots.center.and_then(|center| center.content_bias()) {
            return Some(bias);
        }
        if has_bias(slots.right, Orientation::Vertical) || has_bias(slots.left, Orientation::Vertical)
        {
            return Some(Orientation::Vertical);
        }
        if has_bias(slots.bottom, Orientation::Horizontal)
            || has_bias(slots.top, Orientation::Horizontal)
        {
            return Some(Orientation::Horizontal);
        }
        None
    }

    fn compute_min_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        Self::compute_width(ctx, &Slots::of(children), height, true)
    }

    fn compute_min_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        Self::compute_height(ctx, &Slots::of(children), width, true)
    }

    fn compute_pref_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        Self::compute_width(ctx, &Slots::of(children), height, false)
    }

    fn compute_pref_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        Self::compute_height(ctx, &Slots::of(children), width, false)
    }

    fn layout_children(&mut self, ctx: &LayoutContext, children: &mut [Box<dyn Node>]) {
        // Never lay out below the minimum size
        let (width, height) = match self.content_bias(children) {
            None => (
                ctx.width.max(self.compute_min_width(ctx, children, None)),
                ctx.height.max(self.compute_min_height(ctx, children, None)),
            ),
            Some(Orientation::Horizontal) => {
                let width = ctx.width.max(self.compute_min_width(ctx, children, None));
                let height = ctx
                    .height
                    .max(self.compute_min_height(ctx, children, Some(width)));
                (width, height)
            }
            Some(Orientation::Vertical) => {
                let height = ctx.height.max(self.compute_min_height(ctx, children, None));
                let width = ctx
                    .width
                    .max(self.compute_min_width(ctx, children, Some(height)));
                (width, height)
            }
        };
        let ctx = ctx.with_size(width, height);
        let snap = ctx.snap;

        let inside_x = ctx.left();
        let inside_y = ctx.top();
        let inside_width = ctx.content_width();
        let inside_height = ctx.content_height();

        let index = |slot| {
            slot_index(children, slot).filter(|&i| children[i].is_managed())
        };
        let (top, bottom, left, right, center) = (
            index(Slot::Top),
            index(Slot::Bottom),
            index(Slot::Left),
            index(Slot::Right),
            index(Slot::Center),
        );

        let mut top_height = 0.0;
        if let Some(i) = top {
            let child = children[i].as_mut();
            let margin = BorderLayout::margin(child);
            let m = ctx.margin(margin);
            let adjusted_width = ctx.adjust_width_by_margin(inside_width, margin);
            let adjusted_height = ctx.adjust_height_by_margin(inside_height, margin);
            let pref = snap
                .snap_size_y(child.pref_height(Some(adjusted_width)))
                .min(adjusted_height);
            let size = bounded_node_size_with_bias(child, adjusted_width, pref, true, true);
            let child_height = snap.snap_size_y(size.y);
            child.resize(snap.snap_size_x(size.x), child_height);
            top_height = m.top + child_height + m.bottom;

            let alignment = BorderLayout::alignment(child);
            ctx.position_in_area(
                child,
                Bounds::new(inside_x, inside_y, inside_width, top_height),
                0.0,
                margin,
                alignment.map_or(HPos::Left, Pos::hpos),
                alignment.map_or(VPos::Top, Pos::vpos),
            );
        }

        let mut bottom_height = 0.0;
        if let Some(i) = bottom {
            let child = children[i].as_mut();
            let margin = BorderLayout::margin(child);
            let m = ctx.margin(margin);
            let adjusted_width = ctx.adjust_width_by_margin(inside_width, margin);
            let adjusted_height =
                ctx.adjust_height_by_margin(inside_height - top_height, margin);
            let pref = snap
                .snap_size_y(child.pref_height(Some(adjusted_width)))
                .min(adjusted_height);
            let size = bounded_node_size_with_bias(child, adjusted_width, pref, true, true);
            let child_height = snap.snap_size_y(size.y);
            child.resize(snap.snap_size_x(size.x), child_height);
            bottom_height = m.top + child_height + m.bottom;

            let alignment = BorderLayout::alignment(child);
            ctx.position_in_area(
                child,
                Bounds::new(
                    inside_x,
                    inside_y + inside_height - bottom_height,
                    inside_width,
                    bottom_height,
                ),
                0.0,
                margin,
                alignment.map_or(HPos::Left, Pos::hpos),
                alignment.map_or(VPos::Bottom, Pos::vpos),
            );
        }

        let middle_height = inside_height - top_height - bottom_height;

        let mut left_width = 0.0;
        if let Some(i) = left {
            let child = children[i].as_mut();
            let margin = BorderLayout::margin(child);
            let m = ctx.margin(margin);
            let adjusted_width = ctx.adjust_width_by_margin(inside_width, margin);
            let adjusted_height = ctx.adjust_height_by_margin(middle_height, margin);
            let pref = snap
                .snap_size_x(child.pref_width(Some(adjusted_height)))
                .min(adjusted_width);
            let size = bounded_node_size_with_bias(child, pref, adjusted_height, true, true);
            let child_width = snap.snap_size_x(size.x);
            child.resize(child_width, snap.snap_size_y(size.y));
            left_width = m.left + child_width + m.right;

            let alignment = BorderLayout::alignment(child);
            ctx.position_in_area(
                child,
                Bounds::new(inside_x, inside_y + top_height, left_width, middle_height),
                0.0,
                margin,
                alignment.map_or(HPos::Left, Pos::hpos),
                alignment.map_or(VPos::Top, Pos::vpos),
            );
        }

        let mut right_width = 0.0;
        if let Some(i) = right {
            let child = children[i].as_mut();
            let margin = BorderLayout::margin(child);
            let m = ctx.margin(margin);
            let adjusted_width = ctx.adjust_width_by_margin(inside_width - left_width, margin);
            let adjusted_height = ctx.adjust_height_by_margin(middle_height, margin);
            let pref = snap
                .snap_size_x(child.pref_width(Some(adjusted_height)))
                .min(adjusted_width);
            let size = bounded_node_size_with_bias(child, pref, adjusted_height, true, true);
            let child_width = snap.snap_size_x(size.x);
            child.resize(child_width, snap.snap_size_y(size.y));
            right_width = m.left + child_width + m.right;

            let alignment = BorderLayout::alignment(child);
            ctx.position_in_area(
                child,
                Bounds::new(
                    inside_x + inside_width - right_width,
                    inside_y + top_height,
                    right_width,
                    middle_height,
                ),
                0.0,
                margin,
                alignment.map_or(HPos::Right, Pos::hpos),
                alignment.map_or(VPos::Top, Pos::vpos),
            );
        }

        if let Some(i) = center {
            let child = children[i].as_mut();
            let margin = BorderLayout::margin(child);
            let alignment = BorderLayout::alignment(child);
            ctx.layout_in_area(
                child,
                Bounds::new(
                    inside_x + left_width,
                    inside_y + top_height,
                    inside_width - left_width - right_width,
                    middle_height,
                ),
                0.0,
                margin,
                true,
                true,
                alignment.map_or(HPos::Center, Pos::hpos),
                alignment.map_or(VPos::Center, Pos::vpos),
            );
        }

        trace!(top_height, bottom_height, left_width, right_width, "border layout");
    }
}

impl Pane<BorderLayout> {
    /// Put `node` in `slot`, detaching and returning the previous occupant.
    ///
    /// Passing `None` only empties the slot. The returned node no longer
    /// carries a slot constraint.
    pub fn set_slot(&mut self, slot: Slot, node: Option<Box<dyn Node>>) -> Option<Box<dyn Node>> {
        let previous = slot_index(self.children(), slot).map(|i| {
            let mut previous = self.children_mut().remove(i);
            previous.properties_mut().remove(SLOT);
            previous
        });
        if let Some(mut node) = node {
            set_constraint(node.as_mut(), SLOT, Some(slot.into()));
            self.children_mut().push(node);
        }
        debug!(?slot, replaced = previous.is_some(), "set border slot");
        previous
    }

    /// The child in `slot`, managed or not.
    pub fn slot(&self, slot: Slot) -> Option<&dyn Node> {
        slot_index(self.children(), slot).map(|i| self.children()[i].as_ref())
    }

    /// Put `node` in the top slot.
    pub fn set_top(&mut self, node: Option<Box<dyn Node>>) -> Option<Box<dyn Node>> {
        self.set_slot(Slot::Top, node)
    }

    /// Put `node` in the bottom slot.
    pub fn set_bottom(&mut self, node: Option<Box<dyn Node>>) -> Option<Box<dyn Node>> {
        self.set_slot(Slot::Bottom, node)
    }

    /// Put `node` in the left slot.
    pub fn set_left(&mut self, node: Option<Box<dyn Node>>) -> Option<Box<dyn Node>> {
        self.set_slot(Slot::Left, node)
    }

    /// Put `node` in the right slot.
    pub fn set_right(&mut self, node: Option<Box<dyn Node>>) -> Option<Box<dyn Node>> {
        self.set_slot(Slot::Right, node)
    }

    /// Put `node` in the center slot.
    pub fn set_center(&mut self, node: Option<Box<dyn Node>>) -> Option<Box<dyn Node>> {
        self.set_slot(Slot::Center, node)
    }

    /// The top child.
    pub fn top(&self) -> Option<&dyn Node> {
        self.slot(Slot::Top)
    }

    /// The bottom child.
    pub fn bottom(&self) -> Option<&dyn Node> {
        self.slot(Slot::Bottom)
    }

    /// The left child.
    pub fn left(&self) -> Option<&dyn Node> {
        self.slot(Slot::Left)
    }

    /// The right child.
    pub fn right(&self) -> Option<&dyn Node> {
        self.slot(Slot::Right)
    }

    /// The center child.
    pub fn center(&self) -> Option<&dyn Node> {
        self.slot(Slot::Center)
    }

    /// Bounds of the child in `slot`, in this pane's coordinates.
    pub fn slot_bounds(&self, slot: Slot) -> Option<Bounds> {
        slot_index(self.children(), slot).and_then(|i| self.child_bounds(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Leaf;
    use crate::region::BorderPane;

    fn leaf(width: f64, height: f64) -> Option<Box<dyn Node>> {
        Some(Box::new(Leaf::new(width, height)))
    }

    fn full_pane() -> BorderPane {
        let mut pane = BorderPane::default();
        pane.set_top(leaf(100.0, 20.0));
        pane.set_bottom(leaf(80.0, 10.0));
        pane.set_left(leaf(30.0, 50.0));
        pane.set_right(leaf(40.0, 60.0));
        pane.set_center(Some(Box::new(Leaf::new(50.0, 40.0).with_min(20.0, 10.0))));
        pane
    }

    #[test]
    fn test_center_only_fills() {
        let mut pane = BorderPane::default();
        pane.set_center(leaf(10.0, 10.0));
        pane.resize(200.0, 200.0);
        pane.layout();
        assert_eq!(
            pane.slot_bounds(Slot::Center),
            Some(Bounds::new(0.0, 0.0, 200.0, 200.0))
        );
    }

    #[test]
    fn test_sizes() {
        let pane = full_pane();
        // max(30 + 50 + 40, max(100, 80))
        assert!((pane.pref_width(None) - 120.0).abs() < 1e-9);
        // max(30 + 20 + 40, max(0, 0)): top and bottom have no minimum
        assert!((pane.min_width(None) - 90.0).abs() < 1e-9);
        // 20 + max(40, 50, 60) + 10
        assert!((pane.pref_height(None) - 90.0).abs() < 1e-9);
        // 20 + max(10, 0, 0) + 10
        assert!((pane.min_height(None) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_arrange() {
        let mut pane = full_pane();
        pane.resize(300.0, 200.0);
        pane.layout();
        assert_eq!(pane.slot_bounds(Slot::Top), Some(Bounds::new(0.0, 0.0, 300.0, 20.0)));
        assert_eq!(
            pane.slot_bounds(Slot::Bottom),
            Some(Bounds::new(0.0, 190.0, 300.0, 10.0))
        );
        assert_eq!(pane.slot_bounds(Slot::Left), Some(Bounds::new(0.0, 20.0, 30.0, 170.0)));
        assert_eq!(
            pane.slot_bounds(Slot::Right),
            Some(Bounds::new(260.0, 20.0, 40.0, 170.0))
        );
        assert_eq!(
            pane.slot_bounds(Slot::Center),
            Some(Bounds::new(30.0, 20.0, 230.0, 170.0))
        );
    }

    #[test]
    fn test_slot_replacement_detaches_previous() {
        let mut pane = BorderPane::default();
        assert!(pane.set_center(leaf(10.0, 10.0)).is_none());
        let previous = pane.set_center(leaf(20.0, 20.0));
        assert!(previous.is_some_and(|node| BorderLayout::slot(node.as_ref()).is_none()));
        assert_eq!(pane.children().len(), 1);
        assert!((pane.center().map_or(0.0, |c| c.pref_width(None)) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_removing_child_empties_slot() {
        let mut pane = BorderPane::default();
        pane.set_left(leaf(10.0, 10.0));
        pane.remove_child(0);
        assert!(pane.left().is_none());
        assert!((pane.pref_width(None)).abs() < 1e-9);
    }

    #[test]
    fn test_bias_falls_back_to_top() {
        let mut pane = BorderPane::default();
        pane.set_top(Some(Box::new(Leaf::new(100.0, 10.0).with_wrap(500.0))));
        assert_eq!(pane.content_bias(), Some(Orientation::Horizontal));
        pane.set_center(leaf(10.0, 10.0));
        assert_eq!(pane.content_bias(), Some(Orientation::Horizontal));
    }

    #[test]
    fn test_alignment_inside_slot() {
        let mut pane = BorderPane::default();
        let mut top = Leaf::new(50.0, 20.0).with_max(50.0, 20.0);
        BorderLayout::set_alignment(&mut top, Some(Pos::TopCenter));
        pane.set_top(Some(Box::new(top)));
        pane.resize(200.0, 100.0);
        pane.layout();
        assert_eq!(pane.slot_bounds(Slot::Top), Some(Bounds::new(75.0, 0.0, 50.0, 20.0)));
    }

    #[test]
    fn test_biased_center_measured_inside_padding() {
        let mut pane = BorderPane::default().with_padding(Insets::uniform(10.0));
        pane.set_center(Some(Box::new(Leaf::new(50.0, 10.0).with_wrap(1000.0))));
        // ceil(1000 / (120 - 20)) + 20
        assert!((pane.pref_height(Some(120.0)) - 30.0).abs() < 1e-9);
        assert!((pane.min_height(Some(120.0)) - 30.0).abs() < 1e-9);

        pane.resize(120.0, 30.0);
        pane.layout();
        assert_eq!(
            pane.slot_bounds(Slot::Center),
            Some(Bounds::new(10.0, 10.0, 100.0, 10.0))
        );
    }

    #[test]
    fn test_biased_top_measured_inside_padding() {
        let mut pane = BorderPane::default().with_padding(Insets::uniform(10.0));
        pane.set_top(Some(Box::new(Leaf::new(50.0, 10.0).with_wrap(1000.0))));
        assert!((pane.pref_height(Some(120.0)) - 30.0).abs() < 1e-9);
    }
}
