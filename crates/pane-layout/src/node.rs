//! The node contract consumed by every layout.
//!
//! A [`Node`] is anything a container can measure and place: it reports its
//! min, preferred and max size (optionally depending on the other dimension),
//! whether it can be resized, and accepts a final size and position from its
//! parent. Containers are nodes too, see [`crate::Pane`].
//!
//! [`Leaf`] is a plain sized node for tests, benchmarks and simple content.

use glam::DVec2;
use pane_core::{Bounds, Orientation, MAX_SIZE};

use crate::constraints::Properties;
use crate::primitives::bounded_size;

/// A participant in layout.
///
/// Size queries take the other dimension when it is already known; `None`
/// means unconstrained. Non-resizable nodes report their current size for
/// every query.
pub trait Node {
    /// Unmanaged nodes are skipped by every layout.
    fn is_managed(&self) -> bool {
        true
    }

    fn is_resizable(&self) -> bool;

    /// Which dimension the other one depends on, if any.
    fn content_bias(&self) -> Option<Orientation> {
        None
    }

    fn min_width(&self, height: Option<f64>) -> f64;
    fn pref_width(&self, height: Option<f64>) -> f64;
    fn max_width(&self, height: Option<f64>) -> f64;
    fn min_height(&self, width: Option<f64>) -> f64;
    fn pref_height(&self, width: Option<f64>) -> f64;
    fn max_height(&self, width: Option<f64>) -> f64;

    /// Distance from the top of the layout bounds to the text baseline.
    ///
    /// `None` means the baseline sits at the bottom edge.
    fn baseline_offset(&self) -> Option<f64> {
        None
    }

    fn layout_x(&self) -> f64;
    fn layout_y(&self) -> f64;

    /// Local bounds; the origin is normally zero and the size is the current size.
    fn layout_bounds(&self) -> Bounds;

    fn resize(&mut self, width: f64, height: f64);
    fn relocate(&mut self, x: f64, y: f64);

    fn resize_relocate(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.resize(width, height);
        self.relocate(x, y);
    }

    /// Resize to the preferred size, resolving the biased dimension first.
    fn autosize(&mut self) {
        if !self.is_resizable() {
            return;
        }
        let (width, height) = match self.content_bias() {
            None | Some(Orientation::Horizontal) => {
                let width = bounded_size(
                    self.min_width(None),
                    self.pref_width(None),
                    self.max_width(None),
                );
                let for_width = self.content_bias().map(|_| width);
                let height = bounded_size(
                    self.min_height(for_width),
                    self.pref_height(for_width),
                    self.max_height(for_width),
                );
                (width, height)
            }
            Some(Orientation::Vertical) => {
                let height = bounded_size(
                    self.min_height(None),
                    self.pref_height(None),
                    self.max_height(None),
                );
                let width = bounded_size(
                    self.min_width(Some(height)),
                    self.pref_width(Some(height)),
                    self.max_width(Some(height)),
                );
                (width, height)
            }
        };
        self.resize(width, height);
    }

    /// The constraint bag containers store per-child settings in.
    fn properties(&self) -> &Properties;
    fn properties_mut(&mut self) -> &mut Properties;

    /// Arrange this node's own children. Leaves have nothing to do.
    fn layout(&mut self) {}
}

/// A node with fixed size preferences and no children.
///
/// A leaf may declare a wrap area, which gives it a horizontal content bias:
/// its height for a given width is `area / width`, rounded up, like a block
/// of wrapped text.
#[derive(Debug, Clone)]
pub struct Leaf {
    min: DVec2,
    pref: DVec2,
    max: DVec2,
    resizable: bool,
    managed: bool,
    baseline: Option<f64>,
    wrap_area: Option<f64>,
    position: DVec2,
    size: DVec2,
    properties: Properties,
}

impl Leaf {
    /// Resizable leaf with the given preferred size, no minimum and no maximum.
    pub fn new(pref_width: f64, pref_height: f64) -> Self {
        Self {
            min: DVec2::ZERO,
            pref: DVec2::new(pref_width, pref_height),
            max: DVec2::splat(MAX_SIZE),
            resizable: true,
            managed: true,
            baseline: None,
            wrap_area: None,
            position: DVec2::ZERO,
            size: DVec2::ZERO,
            properties: Properties::new(),
        }
    }

    /// Leaf that always keeps the given size.
    pub fn fixed(width: f64, height: f64) -> Self {
        let size = DVec2::new(width, height);
        Self {
            min: size,
            pref: size,
            max: size,
            resizable: false,
            size,
            ..Self::new(width, height)
        }
    }

    pub fn with_min(mut self, width: f64, height: f64) -> Self {
        self.min = DVec2::new(width, height);
        self
    }

    pub fn with_max(mut self, width: f64, height: f64) -> Self {
        self.max = DVec2::new(width, height);
        self
    }

    pub fn with_baseline(mut self, offset: f64) -> Self {
        self.baseline = Some(offset);
        self
    }

    /// Make the height depend on the width; see the type docs.
    pub fn with_wrap(mut self, area: f64) -> Self {
        self.wrap_area = Some(area);
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = DVec2::new(x, y);
        self
    }

    pub fn unmanaged(mut self) -> Self {
        self.managed = false;
        self
    }

    pub fn set_managed(&mut self, managed: bool) {
        self.managed = managed;
    }

    /// Position and size in the parent's coordinates.
    pub fn bounds_in_parent(&self) -> Bounds {
        Bounds::from_vecs(self.position, self.size)
    }

    fn wrapped_height(&self, width: Option<f64>) -> Option<f64> {
        let area = self.wrap_area?;
        let width = width.filter(|w| *w > 0.0)?;
        Some((area / width).ceil())
    }
}

impl Node for Leaf {
    fn is_managed(&self) -> bool {
        self.managed
    }

    fn is_resizable(&self) -> bool {
        self.resizable
    }

    fn content_bias(&self) -> Option<Orientation> {
        self.wrap_area.map(|_| Orientation::Horizontal)
    }

    fn min_width(&self, _height: Option<f64>) -> f64 {
        if self.resizable {
            self.min.x
        } else {
            self.size.x
        }
    }

    fn pref_width(&self, _height: Option<f64>) -> f64 {
        if self.resizable {
            self.pref.x
        } else {
            self.size.x
        }
    }

    fn max_width(&self, _height: Option<f64>) -> f64 {
        if self.resizable {
            self.max.x
        } else {
            self.size.x
        }
    }

    fn min_height(&self, width: Option<f64>) -> f64 {
        if !self.resizable {
            return self.size.y;
        }
        self.wrapped_height(width).unwrap_or(self.min.y)
    }

    fn pref_height(&self, width: Option<f64>) -> f64 {
        if !self.resizable {
            return self.size.y;
        }
        self.wrapped_height(width).unwrap_or(self.pref.y)
    }

    fn max_height(&self, _width: Option<f64>) -> f64 {
        if self.resizable {
            self.max.y
        } else {
            self.size.y
        }
    }

    fn baseline_offset(&self) -> Option<f64> {
        self.baseline
    }

    fn layout_x(&self) -> f64 {
        self.position.x
    }

    fn layout_y(&self) -> f64 {
        self.position.y
    }

    fn layout_bounds(&self) -> Bounds {
        Bounds::from_vecs(DVec2::ZERO, self.size)
    }

    fn resize(&mut self, width: f64, height: f64) {
        if self.resizable {
            self.size = DVec2::new(width, height);
        }
    }

    fn relocate(&mut self, x: f64, y: f64) {
        self.position = DVec2::new(x, y);
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autosize_uses_pref() {
        let mut leaf = Leaf::new(40.0, 20.0).with_min(10.0, 10.0);
        leaf.autosize();
        assert_eq!(leaf.layout_bounds(), Bounds::new(0.0, 0.0, 40.0, 20.0));
    }

    #[test]
    fn test_autosize_min_wins_over_max() {
        let mut leaf = Leaf::new(40.0, 20.0).with_min(60.0, 0.0).with_max(50.0, 100.0);
        leaf.autosize();
        assert!((leaf.layout_bounds().width - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_ignores_resize() {
        let mut leaf = Leaf::fixed(30.0, 12.0);
        leaf.resize(100.0, 100.0);
        assert_eq!(leaf.layout_bounds().size(), DVec2::new(30.0, 12.0));
        assert!((leaf.pref_width(None) - 30.0).abs() < 1e-9);
        assert!((leaf.max_height(None) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_height_depends_on_width() {
        let leaf = Leaf::new(100.0, 10.0).with_wrap(1000.0);
        assert_eq!(leaf.content_bias(), Some(Orientation::Horizontal));
        assert!((leaf.pref_height(Some(50.0)) - 20.0).abs() < 1e-9);
        assert!((leaf.pref_height(None) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_relocate() {
        let mut leaf = Leaf::new(10.0, 10.0);
        leaf.resize_relocate(5.0, 6.0, 70.0, 8.0);
        assert_eq!(leaf.bounds_in_parent(), Bounds::new(5.0, 6.0, 70.0, 8.0));
    }
}
