//! Freeform layout: children keep the position they were given.

use pane_core::Orientation;
use tracing::trace;

use super::managed_mut;
use crate::node::Node;
use crate::primitives::{bounded_size, LayoutContext};
use crate::region::Layout;

/// Places nothing; resizable children are only autosized.
///
/// The preferred size covers every managed child at its own position and
/// preferred size.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FreeLayout;

impl FreeLayout {
    fn extent(children: &[Box<dyn Node>], axis: Orientation) -> f64 {
        children
            .iter()
            .filter(|child| child.is_managed())
            .fold(0.0, |extent: f64, child| {
                let bounds = child.layout_bounds();
                let end = match axis {
                    Orientation::Horizontal => {
                        let width = bounded_size(
                            child.min_width(None),
                            child.pref_width(None),
                            child.max_width(None),
                        );
                        child.layout_x() + bounds.x + width
                    }
                    Orientation::Vertical => {
                        let height = bounded_size(
                            child.min_height(None),
                            child.pref_height(None),
                            child.max_height(None),
                        );
                        child.layout_y() + bounds.y + height
                    }
                };
                extent.max(end)
            })
    }
}

impl Layout for FreeLayout {
    fn compute_min_width(
        &self,
        ctx: &LayoutContext,
        _children: &[Box<dyn Node>],
        _height: Option<f64>,
    ) -> f64 {
        ctx.left() + ctx.right()
    }

    fn compute_min_height(
        &self,
        ctx: &LayoutContext,
        _children: &[Box<dyn Node>],
        _width: Option<f64>,
    ) -> f64 {
        ctx.top() + ctx.bottom()
    }

    fn compute_pref_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        _height: Option<f64>,
    ) -> f64 {
        ctx.left() + Self::extent(children, Orientation::Horizontal) + ctx.right()
    }

    fn compute_pref_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        _width: Option<f64>,
    ) -> f64 {
        ctx.top() + Self::extent(children, Orientation::Vertical) + ctx.bottom()
    }

    fn layout_children(&mut self, _ctx: &LayoutContext, children: &mut [Box<dyn Node>]) {
        let mut count = 0;
        for child in managed_mut(children).filter(|child| child.is_resizable()) {
            child.autosize();
            count += 1;
        }
        trace!(autosized = count, "free layout");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Leaf;
    use crate::region::FreePane;
    use pane_core::{Bounds, Insets};

    #[test]
    fn test_min_is_insets() {
        let pane = FreePane::with_children(FreeLayout, vec![Box::new(Leaf::new(40.0, 40.0))])
            .with_padding(Insets::new(1.0, 2.0, 3.0, 4.0));
        assert!((pane.min_width(None) - 6.0).abs() < 1e-9);
        assert!((pane.min_height(None) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_pref_covers_positioned_children() {
        let children: Vec<Box<dyn Node>> = vec![
            Box::new(Leaf::new(40.0, 10.0).with_position(10.0, 5.0)),
            Box::new(Leaf::new(20.0, 30.0).with_position(0.0, 20.0)),
            Box::new(Leaf::new(500.0, 500.0).unmanaged()),
        ];
        let pane = FreePane::with_children(FreeLayout, children).with_padding(Insets::uniform(1.0));
        assert!((pane.pref_width(None) - 52.0).abs() < 1e-9);
        assert!((pane.pref_height(None) - 52.0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_autosizes_in_place() {
        let children: Vec<Box<dyn Node>> = vec![
            Box::new(Leaf::new(40.0, 10.0).with_position(10.0, 5.0)),
            Box::new(Leaf::fixed(8.0, 8.0).with_position(3.0, 3.0)),
        ];
        let mut pane = FreePane::with_children(FreeLayout, children);
        pane.resize(100.0, 100.0);
        pane.layout();
        assert_eq!(pane.child_bounds(0), Some(Bounds::new(10.0, 5.0, 40.0, 10.0)));
        assert_eq!(pane.child_bounds(1), Some(Bounds::new(3.0, 3.0, 8.0, 8.0)));
    }

    #[test]
    fn test_empty_pref_is_insets() {
        let pane = FreePane::new(FreeLayout).with_padding(Insets::uniform(3.0));
        assert!((pane.pref_width(None) - 6.0).abs() < 1e-9);
    }
}
