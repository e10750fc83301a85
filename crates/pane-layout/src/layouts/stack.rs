//! Stack layout: children overlaid in declaration order.
//!
//! Every child is offered the whole interior and filled or aligned within it.
//! Min and preferred sizes take the largest child on each axis separately, so
//! the result can exceed the union of any single child's size profile.

use pane_core::{Bounds, Insets, Orientation, Pos, VPos};
use tracing::trace;

use super::{first_bias, managed, managed_mut, set_constraint};
use crate::node::Node;
use crate::primitives::LayoutContext;
use crate::region::Layout;

pub const ALIGNMENT: &str = "stackpane-alignment";
pub const MARGIN: &str = "stackpane-margin";

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackLayout {
    /// Default alignment for children without their own
    pub alignment: Pos,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self {
            alignment: Pos::Center,
        }
    }
}

impl StackLayout {
    /// Stack with the given default alignment.
    pub fn new(alignment: Pos) -> Self {
        Self { alignment }
    }

    /// Set the alignment of `child`, overriding the default.
    pub fn set_alignment(child: &mut dyn Node, value: Option<Pos>) {
        set_constraint(child, ALIGNMENT, value.map(Into::into));
    }

    /// Alignment override of `child`.
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

    /// Remove the alignment and margin from `child`.
    pub fn clear_constraints(child: &mut dyn Node) {
        child.properties_mut().remove_all(&[ALIGNMENT, MARGIN]);
    }
}

impl Layout for StackLayout {
    fn content_bias(&self, children: &[Box<dyn Node>]) -> Option<Orientation> {
        first_bias(children)
    }

    fn compute_min_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        let managed = managed(children);
        ctx.left() + ctx.max_min_area_width(&managed, MARGIN, |_| height, true) + ctx.right()
    }

    fn compute_min_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        let managed = managed(children);
        let vpos = self.alignment.vpos();
        ctx.top() + ctx.max_min_area_height(&managed, MARGIN, |_| width, vpos) + ctx.bottom()
    }

    fn compute_pref_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        let managed = managed(children);
        let inside = height.map(|height| height - ctx.top() - ctx.bottom());
        ctx.left() + ctx.max_pref_area_width(&managed, MARGIN, |_| inside, true) + ctx.right()
    }

    fn compute_pref_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        let managed = managed(children);
        let vpos = self.alignment.vpos();
        let inside = width.map(|width| width - ctx.left() - ctx.right());
        ctx.top() + ctx.max_pref_area_height(&managed, MARGIN, |_| inside, vpos) + ctx.bottom()
    }

    fn layout_children(&mut self, ctx: &LayoutContext, children: &mut [Box<dyn Node>]) {
        let content_width = ctx.content_width();
        let content_height = ctx.content_height();
        let baseline = if self.alignment.vpos() == VPos::Baseline {
            ctx.area_baseline_offset(
                &managed(children),
                MARGIN,
                |_| Some(content_width),
                content_height,
                |_| true,
                0.0,
            )
        } else {
            content_height / 2.0
        };

        let area = Bounds::new(ctx.left(), ctx.top(), content_width, content_height);
        for child in managed_mut(children) {
            let alignment = Self::alignment(child.as_ref()).unwrap_or(self.alignment);
            let margin = Self::margin(child.as_ref());
            ctx.layout_in_area(
                child.as_mut(),
                area,
                baseline,
                margin,
                true,
                true,
                alignment.hpos(),
                alignment.vpos(),
            );
        }
        trace!(content_width, content_height, "stack layout");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Leaf;
    use crate::region::StackPane;

    #[test]
    fn test_per_axis_max() {
        let pane = StackPane::with_children(
            StackLayout::default(),
            vec![Box::new(Leaf::new(100.0, 10.0)), Box::new(Leaf::new(10.0, 80.0))],
        )
        .with_padding(Insets::uniform(5.0));
        assert!((pane.pref_width(None) - 110.0).abs() < 1e-9);
        assert!((pane.pref_height(None) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_children_fill_interior() {
        let mut pane = StackPane::with_children(
            StackLayout::default(),
            vec![
                Box::new(Leaf::new(10.0, 10.0)),
                Box::new(Leaf::new(10.0, 10.0).with_max(40.0, 20.0)),
            ],
        );
        pane.resize(100.0, 60.0);
        pane.layout();
        assert_eq!(pane.child_bounds(0), Some(Bounds::new(0.0, 0.0, 100.0, 60.0)));
        // Capped children are centered
        assert_eq!(pane.child_bounds(1), Some(Bounds::new(30.0, 20.0, 40.0, 20.0)));
    }

    #[test]
    fn test_child_alignment_overrides_default() {
        let mut child = Leaf::fixed(10.0, 10.0);
        StackLayout::set_alignment(&mut child, Some(Pos::BottomRight));
        StackLayout::set_margin(&mut child, Some(Insets::uniform(2.0)));
        let mut pane = StackPane::with_children(StackLayout::default(), vec![Box::new(child)]);
        pane.resize(50.0, 50.0);
        pane.layout();
        assert_eq!(pane.child_bounds(0), Some(Bounds::new(38.0, 38.0, 10.0, 10.0)));
    }
}
