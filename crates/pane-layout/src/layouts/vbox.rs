//! Vertical box: children in a single column.
//!
//! The column counterpart of [`crate::layouts::HBox`], driven by `vgrow`.
//! Children are stretched to the column width when `fill_width` is set.

use std::cell::Cell;

use pane_core::{Bounds, Insets, Orientation, Pos};
use smallvec::SmallVec;
use tracing::trace;

use super::{first_bias, managed, managed_mut, set_constraint};
use crate::constraints::Priority;
use crate::distribute::grow_or_shrink;
use crate::node::Node;
use crate::primitives::{compute_y_offset, LayoutContext};
use crate::region::Layout;

pub const VGROW: &str = "vbox-vgrow";
pub const MARGIN: &str = "vbox-margin";

type Sizes = SmallVec<[f64; 16]>;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VBox {
    pub spacing: f64,
    pub alignment: Pos,
    /// Stretch resizable children to the column width
    pub fill_width: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    bias: Cell<Option<Option<Orientation>>>,
}

impl Default for VBox {
    fn default() -> Self {
        Self {
            spacing: 0.0,
            alignment: Pos::TopLeft,
            fill_width: true,
            bias: Cell::new(None),
        }
    }
}

impl VBox {
    /// Set the gap between items; everything else is default.
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            ..Self::default()
        }
    }

    /// Set where the column sits in the content area.
    pub fn with_alignment(mut self, alignment: Pos) -> Self {
        self.alignment = alignment;
        self
    }

    /// Stretch resizable children to the column width.
    pub fn with_fill_width(mut self, fill_width: bool) -> Self {
        self.fill_width = fill_width;
        self
    }

    /// Set how eagerly `child` takes extra height.
    pub fn set_vgrow(child: &mut dyn Node, value: Option<Priority>) {
        set_constraint(child, VGROW, value.map(Into::into));
    }

    /// Grow priority of `child`.
    pub fn vgrow(child: &dyn Node) -> Option<Priority> {
        child.properties().priority(VGROW)
    }

    /// Set the space around `child`.
    pub fn set_margin(child: &mut dyn Node, value: Option<Insets>) {
        set_constraint(child, MARGIN, value.map(Into::into));
    }

    /// Space around `child`.
    pub fn margin(child: &dyn Node) -> Option<Insets> {
        child.properties().insets(MARGIN)
    }

    /// Remove the grow priority and margin from `child`.
    pub fn clear_constraints(child: &mut dyn Node) {
        child.properties_mut().remove_all(&[VGROW, MARGIN]);
    }

    fn spacing_total(&self, ctx: &LayoutContext, count: usize) -> f64 {
        ctx.snap.snap_space_y(self.spacing) * count.saturating_sub(1) as f64
    }

    fn area_heights(
        &self,
        ctx: &LayoutContext,
        managed: &[&dyn Node],
        width: Option<f64>,
        minimum: bool,
    ) -> Sizes {
        let inside = width.map(|width| width - ctx.left() - ctx.right());
        managed
            .iter()
            .map(|child| {
                let margin = Self::margin(*child);
                if minimum {
                    ctx.child_min_area_height(*child, None, margin, inside)
                } else {
                    ctx.child_pref_area_height(*child, None, margin, inside)
                }
            })
            .collect()
    }

    /// Grow or shrink `heights` toward `height` and return the content height.
    fn adjust_area_heights(
        &self,
        ctx: &LayoutContext,
        managed: &[&dyn Node],
        heights: &mut [f64],
        height: f64,
        width: Option<f64>,
    ) -> f64 {
        let content = heights.iter().sum::<f64>() + self.spacing_total(ctx, heights.len());
        let extra = height - ctx.top() - ctx.bottom() - content;
        if extra == 0.0 {
            return content;
        }

        let ref_width = if self.fill_width {
            width.map(|width| width - ctx.left() - ctx.right())
        } else {
            None
        };
        let unit = ctx.snap.unit(Orientation::Vertical);
        let portion = |value: f64| ctx.snap.snap_portion_y(value);

        let remaining = if extra > 0.0 {
            let limits: Sizes = managed
                .iter()
                .map(|child| ctx.child_max_area_height(*child, None, Self::margin(*child), ref_width))
                .collect();
            [Priority::Always, Priority::Sometimes]
                .into_iter()
                .fold(extra, |remaining, priority| {
                    let eligible: SmallVec<[bool; 16]> = managed
                        .iter()
                        .map(|child| Self::vgrow(*child) == Some(priority))
                        .collect();
                    grow_or_shrink(heights, &limits, &eligible, remaining, unit, portion)
                })
        } else {
            let limits: Sizes = managed
                .iter()
                .map(|child| ctx.child_min_area_height(*child, None, Self::margin(*child), ref_width))
                .collect();
            let eligible: SmallVec<[bool; 16]> = SmallVec::from_elem(true, managed.len());
            grow_or_shrink(heights, &limits, &eligible, extra, unit, portion)
        };
        content + extra - remaining
    }

    fn content_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
        minimum: bool,
    ) -> f64 {
        let managed = managed(children);
        let heights = match height {
            Some(height) if self.content_bias(children).is_some() => {
                let mut heights = self.area_heights(ctx, &managed, None, false);
                self.adjust_area_heights(ctx, &managed, &mut heights, height, None);
                Some(heights)
            }
            _ => None,
        };
        let height_of = |i: usize| heights.as_ref().map(|heights| heights[i]);
        if minimum {
            ctx.max_min_area_width(&managed, MARGIN, height_of, false)
        } else {
            ctx.max_pref_area_width(&managed, MARGIN, height_of, false)
        }
    }
}

impl Layout for VBox {
    /// Vertical if any managed child is vertically biased, otherwise the
    /// first child bias found.
    fn content_bias(&self, children: &[Box<dyn Node>]) -> Option<Orientation> {
        if let Some(bias) = self.bias.get() {
            return bias;
        }
        let vertical = children
            .iter()
            .filter(|child| child.is_managed())
            .any(|child| child.content_bias() == Some(Orientation::Vertical));
        let bias = if vertical {
            Some(Orientation::Vertical)
        } else {
            first_bias(children)
        };
        self.bias.set(Some(bias));
        bias
    }

    fn compute_min_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        ctx.left() + self.content_width(ctx, children, height, true) + ctx.right()
    }

    fn compute_min_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        let managed = managed(children);
        let heights = self.area_heights(ctx, &managed, width, true);
        ctx.top() + heights.iter().sum::<f64>() + self.spacing_total(ctx, heights.len()) + ctx.bottom()
    }

    fn compute_pref_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        ctx.left() + self.content_width(ctx, children, height, false) + ctx.right()
    }

    fn compute_pref_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        let managed = managed(children);
        let heights = self.area_heights(ctx, &managed, width, false);
        ctx.top() + heights.iter().sum::<f64>() + self.spacing_total(ctx, heights.len()) + ctx.bottom()
    }

    fn layout_children(&mut self, ctx: &LayoutContext, children: &mut [Box<dyn Node>]) {
        let hpos = self.alignment.hpos();
        let vpos = self.alignment.vpos();
        let space = ctx.snap.snap_space_y(self.spacing);
        let content_width = ctx.content_width();

        let (heights, content_height) = {
            let managed = managed(children);
            let mut heights = self.area_heights(ctx, &managed, Some(ctx.width), false);
            let content_height =
                self.adjust_area_heights(ctx, &managed, &mut heights, ctx.height, Some(ctx.width));
            (heights, content_height)
        };

        let x = ctx.left();
        let mut y = ctx.top() + compute_y_offset(ctx.content_height(), content_height, vpos);
        for (child, height) in managed_mut(children).zip(heights.iter().copied()) {
            let margin = Self::margin(child.as_ref());
            ctx.layout_in_area(
                child.as_mut(),
                Bounds::new(x, y, content_width, height),
                height,
                margin,
                self.fill_width,
                true,
                hpos,
                vpos,
            );
            y += height + space;
        }
        trace!(content_height, children = heights.len(), "vbox layout");
    }

    fn invalidate(&mut self) {
        self.bias.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Leaf;
    use crate::region::VBoxPane;

    fn column(heights: &[f64]) -> Vec<Box<dyn Node>> {
        heights
            .iter()
            .map(|&height| Box::new(Leaf::new(20.0, height)) as Box<dyn Node>)
            .collect()
    }

    #[test]
    fn test_grow_distribution() {
        let mut children = column(&[50.0, 50.0, 50.0]);
        VBox::set_vgrow(children[1].as_mut(), Some(Priority::Always));
        let mut pane = VBoxPane::with_children(VBox::default(), children);
        pane.resize(40.0, 210.0);
        pane.layout();
        assert_eq!(pane.child_bounds(1), Some(Bounds::new(0.0, 50.0, 40.0, 110.0)));
        assert_eq!(pane.child_bounds(2), Some(Bounds::new(0.0, 160.0, 40.0, 50.0)));
    }

    #[test]
    fn test_even_split_among_growers() {
        let mut children = column(&[10.0, 10.0]);
        VBox::set_vgrow(children[0].as_mut(), Some(Priority::Sometimes));
        VBox::set_vgrow(children[1].as_mut(), Some(Priority::Sometimes));
        let mut pane = VBoxPane::with_children(VBox::default(), children);
        pane.resize(20.0, 61.0);
        pane.layout();
        let total: f64 = (0..2).map(|i| pane.child_bounds(i).unwrap().height).sum();
        assert!((total - 61.0).abs() < 1e-9);
    }

    #[test]
    fn test_sizes() {
        let pane = VBoxPane::with_children(VBox::new(4.0), column(&[10.0, 20.0]))
            .with_padding(Insets::symmetric(1.0, 3.0));
        assert!((pane.pref_height(None) - 36.0).abs() < 1e-9);
        assert!((pane.pref_width(None) - 26.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_fill_aligns_within_column() {
        let layout = VBox::default()
            .with_alignment(Pos::BottomCenter)
            .with_fill_width(false);
        let mut pane = VBoxPane::with_children(layout, column(&[10.0]));
        pane.resize(100.0, 50.0);
        pane.layout();
        assert_eq!(pane.child_bounds(0), Some(Bounds::new(40.0, 40.0, 20.0, 10.0)));
    }

    #[test]
    fn test_unmanaged_child_is_skipped() {
        let children: Vec<Box<dyn Node>> = vec![
            Box::new(Leaf::new(20.0, 10.0)),
            Box::new(Leaf::new(20.0, 99.0).unmanaged()),
            Box::new(Leaf::new(20.0, 10.0)),
        ];
        let mut pane = VBoxPane::with_children(VBox::default(), children);
        assert!((pane.pref_height(None) - 20.0).abs() < 1e-9);
        pane.layout_at_pref_size();
        assert!((pane.child_bounds(2).unwrap().y - 10.0).abs() < 1e-9);
        assert_eq!(pane.child_bounds(1), Some(Bounds::new(0.0, 0.0, 0.0, 0.0)));
    }
}
