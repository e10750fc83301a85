//! Horizontal box: children in a single row.
//!
//! Widths start at each child's preferred area width. Surplus goes to children
//! whose `hgrow` is `Always`, then `Sometimes`, each capped at its max width. A
//! deficit is taken from every child down to its min width. Heights fill the
//! row unless `fill_height` is off or the row is baseline aligned.

use std::cell::Cell;

use pane_core::{Bounds, Insets, Orientation, Pos, VPos};
use smallvec::SmallVec;
use tracing::trace;

use super::{first_bias, managed, managed_mut, set_constraint};
use crate::constraints::Priority;
use crate::distribute::grow_or_shrink;
use crate::node::Node;
use crate::primitives::{
    compute_x_offset, min_baseline_complement, pref_baseline_complement, LayoutContext,
};
use crate::region::Layout;

pub const HGROW: &str = "hbox-hgrow";
pub const MARGIN: &str = "hbox-margin";

type Sizes = SmallVec<[f64; 16]>;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HBox {
    /// Gap between adjacent children
    pub spacing: f64,
    /// Placement of the row in the box and of each child within its cell
    pub alignment: Pos,
    /// Stretch resizable children to the row height
    pub fill_height: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    bias: Cell<Option<Option<Orientation>>>,
}

impl Default for HBox {
    fn default() -> Self {
        Self {
            spacing: 0.0,
            alignment: Pos::TopLeft,
            fill_height: true,
            bias: Cell::new(None),
        }
    }
}

impl HBox {
    /// Set the gap between items; everything else is default.
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            ..Self::default()
        }
    }

    /// Set where the row sits in the content area.
    pub fn with_alignment(mut self, alignment: Pos) -> Self {
        self.alignment = alignment;
        self
    }

    /// Stretch resizable children to the row height.
    pub fn with_fill_height(mut self, fill_height: bool) -> Self {
        self.fill_height = fill_height;
        self
    }

    /// Set how eagerly `child` takes extra width.
    pub fn set_hgrow(child: &mut dyn Node, value: Option<Priority>) {
        set_constraint(child, HGROW, value.map(Into::into));
    }

    /// Grow priority of `child`.
    pub fn hgrow(child: &dyn Node) -> Option<Priority> {
        child.properties().priority(HGROW)
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
        child.properties_mut().remove_all(&[HGROW, MARGIN]);
    }

    /// Baseline alignment never fills.
    fn should_fill_height(&self) -> bool {
        self.fill_height && self.alignment.vpos() != VPos::Baseline
    }

    fn baseline_aligned(&self) -> bool {
        self.alignment.vpos() == VPos::Baseline
    }

    fn min_complement(&self, managed: &[&dyn Node]) -> Option<f64> {
        self.baseline_aligned()
            .then(|| min_baseline_complement(managed))
    }

    fn pref_complement(&self, managed: &[&dyn Node]) -> Option<f64> {
        self.baseline_aligned()
            .then(|| pref_baseline_complement(managed))
    }

    fn spacing_total(&self, ctx: &LayoutContext, count: usize) -> f64 {
        ctx.snap.snap_space_x(self.spacing) * count.saturating_sub(1) as f64
    }

    fn area_widths(
        &self,
        ctx: &LayoutContext,
        managed: &[&dyn Node],
        height: Option<f64>,
        minimum: bool,
    ) -> Sizes {
        let inside = height.map(|height| height - ctx.top() - ctx.bottom());
        let fill = self.should_fill_height();
        let complement = if minimum {
            self.min_complement(managed)
        } else {
            self.pref_complement(managed)
        };
        managed
            .iter()
            .map(|child| {
                let margin = Self::margin(*child);
                if minimum {
                    ctx.child_min_area_width(*child, complement, margin, inside, fill)
                } else {
                    ctx.child_pref_area_width(*child, complement, margin, inside, fill)
                }
            })
            .collect()
    }

    /// Grow or shrink `widths` toward `width` and return the content width.
    fn adjust_area_widths(
        &self,
        ctx: &LayoutContext,
        managed: &[&dyn Node],
        widths: &mut [f64],
        width: f64,
        height: Option<f64>,
    ) -> f64 {
        let content = widths.iter().sum::<f64>() + self.spacing_total(ctx, widths.len());
        let extra = width - ctx.left() - ctx.right() - content;
        if extra == 0.0 {
            return content;
        }

        let fill = self.should_fill_height();
        let ref_height = if fill {
            height.map(|height| height - ctx.top() - ctx.bottom())
        } else {
            None
        };
        let complement = self.min_complement(managed);
        let unit = ctx.snap.unit(Orientation::Horizontal);
        let portion = |value: f64| ctx.snap.snap_portion_x(value);

        let remaining = if extra > 0.0 {
            let limits: Sizes = managed
                .iter()
                .map(|child| {
                    ctx.child_max_area_width(*child, complement, Self::margin(*child), ref_height, fill)
                })
                .collect();
            [Priority::Always, Priority::Sometimes]
                .into_iter()
                .fold(extra, |remaining, priority| {
                    let eligible: SmallVec<[bool; 16]> = managed
                        .iter()
                        .map(|child| Self::hgrow(*child) == Some(priority))
                        .collect();
                    grow_or_shrink(widths, &limits, &eligible, remaining, unit, portion)
                })
        } else {
            let limits: Sizes = managed
                .iter()
                .map(|child| {
                    ctx.child_min_area_width(*child, complement, Self::margin(*child), ref_height, fill)
                })
                .collect();
            let eligible: SmallVec<[bool; 16]> = SmallVec::from_elem(true, managed.len());
            grow_or_shrink(widths, &limits, &eligible, extra, unit, portion)
        };
        content + extra - remaining
    }

    fn content_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
        minimum: bool,
    ) -> f64 {
        let managed = managed(children);
        let vpos = self.alignment.vpos();
        let widths = match width {
            Some(width) if self.content_bias(children).is_some() => {
                let mut widths = self.area_widths(ctx, &managed, None, false);
                self.adjust_area_widths(ctx, &managed, &mut widths, width, None);
                Some(widths)
            }
            _ => None,
        };
        let width_of = |i: usize| widths.as_ref().map(|widths| widths[i]);
        if minimum {
            ctx.max_min_area_height(&managed, MARGIN, width_of, vpos)
        } else {
            ctx.max_pref_area_height(&managed, MARGIN, width_of, vpos)
        }
    }
}

impl Layout for HBox {
    /// Horizontal if any managed child is horizontally biased, otherwise the
    /// first child bias found.
    fn content_bias(&self, children: &[Box<dyn Node>]) -> Option<Orientation> {
        if let Some(bias) = self.bias.get() {
            return bias;
        }
        let horizontal = children
            .iter()
            .filter(|child| child.is_managed())
            .any(|child| child.content_bias() == Some(Orientation::Horizontal));
        let bias = if horizontal {
            Some(Orientation::Horizontal)
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
        let managed = managed(children);
        let widths = self.area_widths(ctx, &managed, height, true);
        ctx.left() + widths.iter().sum::<f64>() + self.spacing_total(ctx, widths.len()) + ctx.right()
    }

    fn compute_min_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        ctx.top() + self.content_height(ctx, children, width, true) + ctx.bottom()
    }

    fn compute_pref_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        let managed = managed(children);
        let widths = self.area_widths(ctx, &managed, height, false);
        ctx.left() + widths.iter().sum::<f64>() + self.spacing_total(ctx, widths.len()) + ctx.right()
    }

    fn compute_pref_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        ctx.top() + self.content_height(ctx, children, width, false) + ctx.bottom()
    }

    fn layout_children(&mut self, ctx: &LayoutContext, children: &mut [Box<dyn Node>]) {
        let hpos = self.alignment.hpos();
        let vpos = self.alignment.vpos();
        let fill = self.should_fill_height();
        let space = ctx.snap.snap_space_x(self.spacing);
        let content_height = ctx.content_height();

        let (widths, content_width, baseline) = {
            let managed = managed(children);
            let mut widths = self.area_widths(ctx, &managed, Some(ctx.height), false);
            let content_width =
                self.adjust_area_widths(ctx, &managed, &mut widths, ctx.width, Some(ctx.height));
            let baseline = if vpos == VPos::Baseline {
                let complement = min_baseline_complement(&managed);
                ctx.area_baseline_offset(
                    &managed,
                    MARGIN,
                    |i| Some(widths[i]),
                    content_height,
                    |_| fill,
                    complement,
                )
            } else {
                0.0
            };
            (widths, content_width, baseline)
        };

        let mut x = ctx.left() + compute_x_offset(ctx.content_width(), content_width, hpos);
        let y = ctx.top();
        for (child, width) in managed_mut(children).zip(widths.iter().copied()) {
            let margin = Self::margin(child.as_ref());
            ctx.layout_in_area(
                child.as_mut(),
                Bounds::new(x, y, width, content_height),
                baseline,
                margin,
                true,
                fill,
                hpos,
                vpos,
            );
            x += width + space;
        }
        trace!(content_width, children = widths.len(), "hbox layout");
    }

    fn invalidate(&mut self) {
        self.bias.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Leaf;
    use crate::region::HBoxPane;

    fn row(widths: &[f64]) -> Vec<Box<dyn Node>> {
        widths
            .iter()
            .map(|&width| Box::new(Leaf::new(width, 20.0)) as Box<dyn Node>)
            .collect()
    }

    #[test]
    fn test_single_grower_takes_surplus() {
        let mut children = row(&[50.0, 50.0, 50.0]);
        HBox::set_hgrow(children[1].as_mut(), Some(Priority::Always));
        let mut pane = HBoxPane::with_children(HBox::default(), children);
        pane.resize(210.0, 40.0);
        pane.layout();
        let widths: Vec<f64> = (0..3).map(|i| pane.child_bounds(i).unwrap().width).collect();
        assert_eq!(widths, vec![50.0, 110.0, 50.0]);
        assert!((pane.child_bounds(2).unwrap().x - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_always_before_sometimes() {
        let mut children = row(&[10.0, 10.0]);
        HBox::set_hgrow(children[0].as_mut(), Some(Priority::Sometimes));
        HBox::set_hgrow(children[1].as_mut(), Some(Priority::Always));
        let mut pane = HBoxPane::with_children(HBox::default(), children);
        pane.resize(100.0, 20.0);
        pane.layout();
        assert!((pane.child_bounds(0).unwrap().width - 10.0).abs() < 1e-9);
        assert!((pane.child_bounds(1).unwrap().width - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_sometimes_takes_what_always_cannot() {
        let mut children: Vec<Box<dyn Node>> = vec![
            Box::new(Leaf::new(10.0, 20.0)),
            Box::new(Leaf::new(10.0, 20.0).with_max(30.0, 20.0)),
        ];
        HBox::set_hgrow(children[0].as_mut(), Some(Priority::Sometimes));
        HBox::set_hgrow(children[1].as_mut(), Some(Priority::Always));
        let mut pane = HBoxPane::with_children(HBox::default(), children);
        pane.resize(100.0, 20.0);
        pane.layout();
        assert!((pane.child_bounds(0).unwrap().width - 70.0).abs() < 1e-9);
        assert!((pane.child_bounds(1).unwrap().width - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_shrink_respects_min() {
        let children: Vec<Box<dyn Node>> = vec![
            Box::new(Leaf::new(50.0, 20.0).with_min(45.0, 0.0)),
            Box::new(Leaf::new(50.0, 20.0)),
        ];
        let mut pane = HBoxPane::with_children(HBox::default(), children);
        pane.resize(70.0, 20.0);
        pane.layout();
        assert!((pane.child_bounds(0).unwrap().width - 45.0).abs() < 1e-9);
        assert!((pane.child_bounds(1).unwrap().width - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_sizes_with_spacing_and_padding() {
        let pane = HBoxPane::with_children(HBox::new(5.0), row(&[10.0, 20.0, 30.0]))
            .with_padding(Insets::uniform(2.0));
        assert!((pane.pref_width(None) - 74.0).abs() < 1e-9);
        assert!((pane.pref_height(None) - 24.0).abs() < 1e-9);
        assert!((pane.min_width(None) - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_has_no_spacing() {
        let pane = HBoxPane::new(HBox::new(8.0));
        assert_eq!(pane.pref_width(None), 0.0);
    }

    #[test]
    fn test_alignment_offsets_row() {
        let layout = HBox::default().with_alignment(Pos::BottomRight).with_fill_height(false);
        let mut pane = HBoxPane::with_children(layout, row(&[10.0, 20.0]));
        pane.resize(100.0, 50.0);
        pane.layout();
        assert_eq!(pane.child_bounds(0), Some(Bounds::new(70.0, 30.0, 10.0, 20.0)));
        assert_eq!(pane.child_bounds(1), Some(Bounds::new(80.0, 30.0, 20.0, 20.0)));
    }

    #[test]
    fn test_baseline_alignment() {
        let children: Vec<Box<dyn Node>> = vec![
            Box::new(Leaf::new(20.0, 30.0).with_baseline(20.0)),
            Box::new(Leaf::new(20.0, 16.0).with_baseline(4.0)),
        ];
        let layout = HBox::default().with_alignment(Pos::BaselineLeft);
        let mut pane = HBoxPane::with_children(layout, children);
        assert!((pane.pref_height(None) - 32.0).abs() < 1e-9);
        pane.layout_at_pref_size();
        // Both baselines land 20 below the top
        assert!((pane.child_bounds(0).unwrap().y - 0.0).abs() < 1e-9);
        assert!((pane.child_bounds(1).unwrap().y - 16.0).abs() < 1e-9);
        // Baseline alignment does not stretch
        assert!((pane.child_bounds(1).unwrap().height - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_margin_offsets_child() {
        let mut children = row(&[10.0]);
        HBox::set_margin(children[0].as_mut(), Some(Insets::new(1.0, 2.0, 3.0, 4.0)));
        let mut pane = HBoxPane::with_children(HBox::default(), children);
        assert!((pane.pref_width(None) - 16.0).abs() < 1e-9);
        pane.layout_at_pref_size();
        assert_eq!(pane.child_bounds(0), Some(Bounds::new(4.0, 1.0, 10.0, 20.0)));
    }

    #[test]
    fn test_bias_is_cached_until_invalidated() {
        let mut pane = HBoxPane::with_children(HBox::default(), row(&[10.0]));
        assert_eq!(pane.content_bias(), None);
        pane.add_child(Box::new(Leaf::new(10.0, 10.0).with_wrap(100.0)));
        assert_eq!(pane.content_bias(), Some(Orientation::Horizontal));
    }
}
