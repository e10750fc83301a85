//! Regions: containers that host children and delegate to a layout strategy.
//!
//! A [`Pane`] owns its children, padding, border and background and answers
//! the [`Node`] size queries by asking its [`Layout`]. The layout is a plain
//! value chosen at compile time (`Pane<HBox>`) or at run time
//! (`Pane<AnyLayout>`).

use std::cell::Cell;
use std::sync::Arc;

use glam::DVec2;
use pane_core::{Bounds, Insets, Orientation, MAX_SIZE};
use pane_style::{Background, Border};
use tracing::{debug, trace};

use crate::constraints::Properties;
use crate::layouts::{
    AnchorLayout, BorderLayout, FreeLayout, GridLayout, HBox, StackLayout, TileLayout, VBox,
};
use crate::node::Node;
use crate::primitives::{effective_baseline, LayoutContext};
use crate::snap::SnapOptions;

/// A container layout strategy.
///
/// Size computations include the container insets found in `ctx`. The
/// container has already been sized when [`Layout::layout_children`] runs.
pub trait Layout {
    /// Which dimension of the container depends on the other, if any.
    fn content_bias(&self, _children: &[Box<dyn Node>]) -> Option<Orientation> {
        None
    }

    fn compute_min_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64;

    fn compute_min_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64;

    fn compute_pref_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64;

    fn compute_pref_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64;

    fn compute_max_width(
        &self,
        _ctx: &LayoutContext,
        _children: &[Box<dyn Node>],
        _height: Option<f64>,
    ) -> f64 {
        MAX_SIZE
    }

    fn compute_max_height(
        &self,
        _ctx: &LayoutContext,
        _children: &[Box<dyn Node>],
        _width: Option<f64>,
    ) -> f64 {
        MAX_SIZE
    }

    /// Size and position every managed child inside the container.
    fn layout_children(&mut self, ctx: &LayoutContext, children: &mut [Box<dyn Node>]);

    /// Drop anything cached about the children.
    fn invalidate(&mut self) {}
}

/// Explicit override of one of a region's size limits.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeOverride {
    /// Ask the layout
    #[default]
    Computed,
    /// Same as the preferred size; for a preferred size this is `Computed`
    UsePref,
    /// A fixed value; negative or NaN counts as zero
    Fixed(f64),
}

/// Min, preferred and max overrides for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeOverrides {
    pub min_width: SizeOverride,
    pub min_height: SizeOverride,
    pub pref_width: SizeOverride,
    pub pref_height: SizeOverride,
    pub max_width: SizeOverride,
    pub max_height: SizeOverride,
}

fn fixed_size(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

/// A container node.
pub struct Pane<L: Layout> {
    layout: L,
    children: Vec<Box<dyn Node>>,
    padding: Insets,
    border: Option<Arc<Border>>,
    background: Option<Arc<Background>>,
    sizes: SizeOverrides,
    snap: SnapOptions,
    managed: bool,
    position: DVec2,
    size: DVec2,
    properties: Properties,
    insets: Cell<Option<Insets>>,
}

impl<L: Layout + Default> Default for Pane<L> {
    fn default() -> Self {
        Self::new(L::default())
    }
}

impl<L: Layout> Pane<L> {
    /// Empty pane with no padding, border or background.
    pub fn new(layout: L) -> Self {
        Self {
            layout,
            children: Vec::new(),
            padding: Insets::EMPTY,
            border: None,
            background: None,
            sizes: SizeOverrides::default(),
            snap: SnapOptions::default(),
            managed: true,
            position: DVec2::ZERO,
            size: DVec2::ZERO,
            properties: Properties::new(),
            insets: Cell::new(None),
        }
    }

    /// Pane that starts with `children`.
    pub fn with_children(layout: L, children: Vec<Box<dyn Node>>) -> Self {
        Self {
            children,
            ..Self::new(layout)
        }
    }

    /// Set the space between the border and the content.
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.set_padding(padding);
        self
    }

    /// Set the border.
    pub fn with_border(mut self, border: Arc<Border>) -> Self {
        self.set_border(Some(border));
        self
    }

    /// Set the background.
    pub fn with_background(mut self, background: Arc<Background>) -> Self {
        self.set_background(Some(background));
        self
    }

    /// Set the pixel snapping options.
    pub fn with_snap(mut self, snap: SnapOptions) -> Self {
        self.snap = snap;
        self
    }

    /// Fix the preferred size on both axes.
    pub fn with_pref_size(mut self, width: f64, height: f64) -> Self {
        self.sizes.pref_width = SizeOverride::Fixed(width);
        self.sizes.pref_height = SizeOverride::Fixed(height);
        self
    }

    /// Replace every size override.
    pub fn with_sizes(mut self, sizes: SizeOverrides) -> Self {
        self.sizes = sizes;
        self
    }

    /// The layout settings.
    pub fn layout_strategy(&self) -> &L {
        &self.layout
    }

    /// Mutable access to the layout settings; invalidates cached state.
    pub fn layout_strategy_mut(&mut self) -> &mut L {
        self.request_layout();
        &mut self.layout
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }

    /// Mutable access to the child list; invalidates cached state.
    pub fn children_mut(&mut self) -> &mut Vec<Box<dyn Node>> {
        self.request_layout();
        &mut self.children
    }

    /// Append a child.
    pub fn add_child(&mut self, child: Box<dyn Node>) {
        self.children_mut().push(child);
    }

    /// Remove and return the child at `index`, if any.
    pub fn remove_child(&mut self, index: usize) -> Option<Box<dyn Node>> {
        if index >= self.children.len() {
            return None;
        }
        Some(self.children_mut().remove(index))
    }

    /// Bounds of a child in this pane's coordinates.
    pub fn child_bounds(&self, index: usize) -> Option<Bounds> {
        self.children.get(index).map(|child| {
            let bounds = child.layout_bounds();
            Bounds::new(
                child.layout_x() + bounds.x,
                child.layout_y() + bounds.y,
                bounds.width,
                bounds.height,
            )
        })
    }

    /// Space between the border and the content.
    pub fn padding(&self) -> &Insets {
        &self.padding
    }

    /// Set the space between the border and the content.
    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
        self.request_layout();
    }

    /// The border, if any.
    pub fn border(&self) -> Option<&Arc<Border>> {
        self.border.as_ref()
    }

    /// Set or clear the border.
    pub fn set_border(&mut self, border: Option<Arc<Border>>) {
        self.border = border;
        self.request_layout();
    }

    /// The background, if any.
    pub fn background(&self) -> Option<&Arc<Background>> {
        self.background.as_ref()
    }

    /// Set or clear the background. Layout is unaffected.
    pub fn set_background(&mut self, background: Option<Arc<Background>>) {
        self.background = background;
    }

    /// Pixel snapping options.
    pub fn snap(&self) -> SnapOptions {
        self.snap
    }

    /// Set the pixel snapping options.
    pub fn set_snap(&mut self, snap: SnapOptions) {
        self.snap = snap;
        self.request_layout();
    }

    /// Min, pref and max size overrides.
    pub fn sizes(&self) -> &SizeOverrides {
        &self.sizes
    }

    /// Mutable size overrides.
    pub fn sizes_mut(&mut self) -> &mut SizeOverrides {
        &mut self.sizes
    }

    /// Set whether the parent lays this pane out.
    pub fn set_managed(&mut self, managed: bool) {
        self.managed = managed;
    }

    /// Current width.
    pub fn width(&self) -> f64 {
        self.size.x
    }

    /// Current height.
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Border insets plus padding.
    pub fn insets(&self) -> Insets {
        if let Some(insets) = self.insets.get() {
            return insets;
        }
        let border = self
            .border
            .as_deref()
            .map(|border| *border.insets())
            .unwrap_or(Insets::EMPTY);
        let insets = border + self.padding;
        self.insets.set(Some(insets));
        insets
    }

    /// Forget cached insets and layout state.
    pub fn request_layout(&mut self) {
        debug!("layout requested");
        self.insets.set(None);
        self.layout.invalidate();
    }

    /// Area the region may draw into, in its own coordinates.
    ///
    /// Includes the border outsets and any background fill that extends
    /// past the layout bounds.
    pub fn visual_bounds(&self) -> Bounds {
        let mut outsets = Insets::EMPTY;
        if let Some(border) = &self.border {
            outsets = outsets.max(border.outsets());
        }
        if let Some(background) = &self.background {
            outsets = outsets.max(background.outsets());
        }
        Bounds::from_vecs(DVec2::ZERO, self.size).outset_by(&outsets)
    }

    fn context(&self) -> LayoutContext {
        LayoutContext::new(self.insets(), self.snap).with_size(self.size.x, self.size.y)
    }

    /// Resize to the preferred size and lay out the whole subtree.
    pub fn layout_at_pref_size(&mut self) {
        self.autosize();
        self.layout();
    }
}

impl<L: Layout> Node for Pane<L> {
    fn is_managed(&self) -> bool {
        self.managed
    }

    fn is_resizable(&self) -> bool {
        true
    }

    fn content_bias(&self) -> Option<Orientation> {
        self.layout.content_bias(&self.children)
    }

    fn min_width(&self, height: Option<f64>) -> f64 {
        match self.sizes.min_width {
            SizeOverride::Computed => {
                self.layout
                    .compute_min_width(&self.context(), &self.children, height)
            }
            SizeOverride::UsePref => self.pref_width(height),
            SizeOverride::Fixed(value) => fixed_size(value),
        }
    }

    fn pref_width(&self, height: Option<f64>) -> f64 {
        match self.sizes.pref_width {
            SizeOverride::Computed | SizeOverride::UsePref => {
                self.layout
                    .compute_pref_width(&self.context(), &self.children, height)
            }
            SizeOverride::Fixed(value) => fixed_size(value),
        }
    }

    fn max_width(&self, height: Option<f64>) -> f64 {
        match self.sizes.max_width {
            SizeOverride::Computed => {
                self.layout
                    .compute_max_width(&self.context(), &self.children, height)
            }
            SizeOverride::UsePref => self.pref_width(height),
            SizeOverride::Fixed(value) => fixed_size(value),
        }
    }

    fn min_height(&self, width: Option<f64>) -> f64 {
        match self.sizes.min_height {
            SizeOverride::Computed => {
                self.layout
                    .compute_min_height(&self.context(), &self.children, width)
            }
            SizeOverride::UsePref => self.pref_height(width),
            SizeOverride::Fixed(value) => fixed_size(value),
        }
    }

    fn pref_height(&self, width: Option<f64>) -> f64 {
        match self.sizes.pref_height {
            SizeOverride::Computed | SizeOverride::UsePref => {
                self.layout
                    .compute_pref_height(&self.context(), &self.children, width)
            }
            SizeOverride::Fixed(value) => fixed_size(value),
        }
    }

    fn max_height(&self, width: Option<f64>) -> f64 {
        match self.sizes.max_height {
            SizeOverride::Computed => {
                self.layout
                    .compute_max_height(&self.context(), &self.children, width)
            }
            SizeOverride::UsePref => self.pref_height(width),
            SizeOverride::Fixed(value) => fixed_size(value),
        }
    }

    /// Baseline of the first managed child that has one.
    fn baseline_offset(&self) -> Option<f64> {
        self.children
            .iter()
            .filter(|child| child.is_managed())
            .find_map(|child| {
                let offset = effective_baseline(child.as_ref())?;
                Some(child.layout_bounds().y + child.layout_y() + offset)
            })
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
        trace!(width, height, "resize region");
        self.size = DVec2::new(width, height);
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

    fn layout(&mut self) {
        let ctx = self.context();
        self.layout.layout_children(&ctx, &mut self.children);
        trace!(
            width = ctx.width,
            height = ctx.height,
            children = self.children.len(),
            "laid out region"
        );
        for child in &mut self.children {
            child.layout();
        }
    }
}

/// Any of the built-in layouts, picked at run time.
#[derive(Debug, Clone)]
pub enum AnyLayout {
    Anchor(AnchorLayout),
    Border(BorderLayout),
    HBox(HBox),
    VBox(VBox),
    Stack(StackLayout),
    Tile(TileLayout),
    Grid(GridLayout),
    Free(FreeLayout),
}

impl Default for AnyLayout {
    fn default() -> Self {
        AnyLayout::Free(FreeLayout)
    }
}

macro_rules! any_layout_dispatch {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            AnyLayout::Anchor($inner) => $body,
            AnyLayout::Border($inner) => $body,
            AnyLayout::HBox($inner) => $body,
            AnyLayout::VBox($inner) => $body,
            AnyLayout::Stack($inner) => $body,
            AnyLayout::Tile($inner) => $body,
            AnyLayout::Grid($inner) => $body,
            AnyLayout::Free($inner) => $body,
        }
    };
}

macro_rules! any_layout_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for AnyLayout {
                fn from(layout: $ty) -> Self {
                    AnyLayout::$variant(layout)
                }
            }
        )*
    };
}

any_layout_from! {
    AnchorLayout => Anchor,
    BorderLayout => Border,
    HBox => HBox,
    VBox => VBox,
    StackLayout => Stack,
    TileLayout => Tile,
    GridLayout => Grid,
    FreeLayout => Free,
}

impl Layout for AnyLayout {
    fn content_bias(&self, children: &[Box<dyn Node>]) -> Option<Orientation> {
        any_layout_dispatch!(self, layout => layout.content_bias(children))
    }

    fn compute_min_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        any_layout_dispatch!(self, layout => layout.compute_min_width(ctx, children, height))
    }

    fn compute_min_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        any_layout_dispatch!(self, layout => layout.compute_min_height(ctx, children, width))
    }

    fn compute_pref_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        any_layout_dispatch!(self, layout => layout.compute_pref_width(ctx, children, height))
    }

    fn compute_pref_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        any_layout_dispatch!(self, layout => layout.compute_pref_height(ctx, children, width))
    }

    fn compute_max_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        any_layout_dispatch!(self, layout => layout.compute_max_width(ctx, children, height))
    }

    fn compute_max_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        any_layout_dispatch!(self, layout => layout.compute_max_height(ctx, children, width))
    }

    fn layout_children(&mut self, ctx: &LayoutContext, children: &mut [Box<dyn Node>]) {
        any_layout_dispatch!(self, layout => layout.layout_children(ctx, children))
    }

    fn invalidate(&mut self) {
        any_layout_dispatch!(self, layout => layout.invalidate())
    }
}

pub type AnchorPane = Pane<AnchorLayout>;
pub type BorderPane = Pane<BorderLayout>;
pub type HBoxPane = Pane<HBox>;
pub type VBoxPane = Pane<VBox>;
pub type StackPane = Pane<StackLayout>;
pub type TilePane = Pane<TileLayout>;
pub type GridPane = Pane<GridLayout>;
pub type FreePane = Pane<FreeLayout>;
