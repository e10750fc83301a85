//! Tile layout: uniform cells in a flowing grid.
//!
//! Every tile has the same size, by default the largest preferred area among
//! the managed children. Horizontal tiles fill rows and wrap at the container
//! width; vertical tiles fill columns and wrap at the container height. A
//! partial last row (or column) is aligned on its own using the container
//! alignment.

use std::cell::Cell;

use pane_core::{Bounds, HPos, Insets, Orientation, Pos, VPos};
use tracing::trace;

use super::{managed, managed_mut, set_constraint};
use crate::node::Node;
use crate::primitives::{compute_x_offset, compute_y_offset, LayoutContext};
use crate::region::Layout;

pub const ALIGNMENT: &str = "tilepane-alignment";
pub const MARGIN: &str = "tilepane-margin";

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileLayout {
    /// Direction tiles flow before wrapping
    pub orientation: Orientation,
    pub hgap: f64,
    pub vgap: f64,
    /// Columns used for the preferred width of a horizontal layout
    pub pref_columns: usize,
    /// Rows used for the preferred height of a vertical layout
    pub pref_rows: usize,
    /// Fixed tile width; computed from the children when `None`
    pub pref_tile_width: Option<f64>,
    pub pref_tile_height: Option<f64>,
    /// Placement of the whole grid in the container
    pub alignment: Pos,
    /// Default placement of a child within its tile
    pub tile_alignment: Pos,
    #[cfg_attr(feature = "serde", serde(skip))]
    tile_width: Cell<Option<f64>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    tile_height: Cell<Option<f64>>,
}

impl Default for TileLayout {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            hgap: 0.0,
            vgap: 0.0,
            pref_columns: 5,
            pref_rows: 5,
            pref_tile_width: None,
            pref_tile_height: None,
            alignment: Pos::TopLeft,
            tile_alignment: Pos::Center,
            tile_width: Cell::new(None),
            tile_height: Cell::new(None),
        }
    }
}

impl TileLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn with_gaps(mut self, hgap: f64, vgap: f64) -> Self {
        self.hgap = hgap;
        self.vgap = vgap;
        self
    }

    pub fn with_pref_columns(mut self, columns: usize) -> Self {
        self.pref_columns = columns;
        self
    }

    pub fn with_pref_rows(mut self, rows: usize) -> Self {
        self.pref_rows = rows;
        self
    }

    pub fn with_pref_tile_size(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.pref_tile_width = width;
        self.pref_tile_height = height;
        self
    }

    pub fn with_alignment(mut self, alignment: Pos) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_tile_alignment(mut self, alignment: Pos) -> Self {
        self.tile_alignment = alignment;
        self
    }

    pub fn set_alignment(child: &mut dyn Node, value: Option<Pos>) {
        set_constraint(child, ALIGNMENT, value.map(Into::into));
    }

    pub fn alignment(child: &dyn Node) -> Option<Pos> {
        child.properties().pos(ALIGNMENT)
    }

    pub fn set_margin(child: &mut dyn Node, value: Option<Insets>) {
        set_constraint(child, MARGIN, value.map(Into::into));
    }

    pub fn margin(child: &dyn Node) -> Option<Insets> {
        child.properties().insets(MARGIN)
    }

    pub fn clear_constraints(child: &mut dyn Node) {
        child.properties_mut().remove_all(&[ALIGNMENT, MARGIN]);
    }

    /// Current tile width, computed and cached on first use.
    pub fn tile_width(&self, ctx: &LayoutContext, children: &[Box<dyn Node>]) -> f64 {
        if let Some(width) = self.tile_width.get() {
            return width;
        }
        let width = match self.pref_tile_width {
            Some(width) => ctx.snap.snap_size_x(width),
            None => {
                let managed = managed(children);
                let vertical = managed
                    .iter()
                    .any(|child| child.content_bias() == Some(Orientation::Vertical));
                // The widest child may depend on the tile height
                let height = vertical.then(|| {
                    ctx.max_pref_area_height(&managed, MARGIN, |_| None, self.tile_alignment.vpos())
                });
                ctx.snap
                    .snap_size_x(ctx.max_pref_area_width(&managed, MARGIN, |_| height, true))
            }
        };
        self.tile_width.set(Some(width));
        width
    }

    /// Current tile height, computed and cached on first use.
    pub fn tile_height(&self, ctx: &LayoutContext, children: &[Box<dyn Node>]) -> f64 {
        if let Some(height) = self.tile_height.get() {
            return height;
        }
        let height = match self.pref_tile_height {
            Some(height) => ctx.snap.snap_size_y(height),
            None => {
                let managed = managed(children);
                let horizontal = managed
                    .iter()
                    .any(|child| child.content_bias() == Some(Orientation::Horizontal));
                let width = horizontal
                    .then(|| ctx.max_pref_area_width(&managed, MARGIN, |_| None, false));
                ctx.snap.snap_size_y(ctx.max_pref_area_height(
                    &managed,
                    MARGIN,
                    |_| width,
                    self.tile_alignment.vpos(),
                ))
            }
        };
        self.tile_height.set(Some(height));
        height
    }

    fn compute_columns(&self, ctx: &LayoutContext, width: f64, tile_width: f64) -> usize {
        let hgap = ctx.snap.snap_space_x(self.hgap);
        (((width + hgap) / (tile_width + hgap)).floor() as usize).max(1)
    }

    fn compute_rows(&self, ctx: &LayoutContext, height: f64, tile_height: f64) -> usize {
        let vgap = ctx.snap.snap_space_y(self.vgap);
        (((height + vgap) / (tile_height + vgap)).floor() as usize).max(1)
    }

    fn content_width(&self, ctx: &LayoutContext, columns: usize, tile_width: f64) -> f64 {
        if columns == 0 {
            return 0.0;
        }
        columns as f64 * tile_width + (columns - 1) as f64 * ctx.snap.snap_space_x(self.hgap)
    }

    fn content_height(&self, ctx: &LayoutContext, rows: usize, tile_height: f64) -> f64 {
        if rows == 0 {
            return 0.0;
        }
        rows as f64 * tile_height + (rows - 1) as f64 * ctx.snap.snap_space_y(self.vgap)
    }
}

/// Cells needed in the other direction to hold `count` nodes.
fn compute_other(count: usize, cells: usize) -> usize {
    count.div_ceil(cells.max(1))
}

impl Layout for TileLayout {
    fn content_bias(&self, _children: &[Box<dyn Node>]) -> Option<Orientation> {
        Some(self.orientation)
    }

    fn compute_min_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        if self.orientation == Orientation::Horizontal {
            return ctx.insets.left() + self.tile_width(ctx, children) + ctx.insets.right();
        }
        self.compute_pref_width(ctx, children, height)
    }

    fn compute_min_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        if self.orientation == Orientation::Vertical {
            return ctx.insets.top() + self.tile_height(ctx, children) + ctx.insets.bottom();
        }
        self.compute_pref_height(ctx, children, width)
    }

    fn compute_pref_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        let count = managed(children).len();
        let columns = match height {
            Some(height) => {
                let rows = self.compute_rows(
                    ctx,
                    height - ctx.top() - ctx.bottom(),
                    self.tile_height(ctx, children),
                );
                compute_other(count, rows)
            }
            None if self.orientation == Orientation::Horizontal => self.pref_columns,
            None => compute_other(count, self.pref_rows),
        };
        ctx.left() + self.content_width(ctx, columns, self.tile_width(ctx, children)) + ctx.right()
    }

    fn compute_pref_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        let count = managed(children).len();
        let rows = match width {
            Some(width) => {
                let columns = self.compute_columns(
                    ctx,
                    width - ctx.left() - ctx.right(),
                    self.tile_width(ctx, children),
                );
                compute_other(count, columns)
            }
            None if self.orientation == Orientation::Horizontal => {
                compute_other(count, self.pref_columns)
            }
            None => self.pref_rows,
        };
        ctx.top() + self.content_height(ctx, rows, self.tile_height(ctx, children)) + ctx.bottom()
    }

    fn layout_children(&mut self, ctx: &LayoutContext, children: &mut [Box<dyn Node>]) {
        let hpos = self.alignment.hpos();
        let vpos = self.alignment.vpos();
        let hgap = ctx.snap.snap_space_x(self.hgap);
        let vgap = ctx.snap.snap_space_y(self.vgap);
        let inside_width = ctx.content_width();
        let inside_height = ctx.content_height();

        let tile_width = self.tile_width(ctx, children).min(inside_width);
        let tile_height = self.tile_height(ctx, children).min(inside_height);
        let count = managed(children).len();

        let (columns, rows, last_row, last_column) = match self.orientation {
            Orientation::Horizontal => {
                let columns = self.compute_columns(ctx, inside_width, tile_width);
                let rows = compute_other(count, columns);
                // Tiles in a partially filled last row
                let last_row = if hpos != HPos::Left {
                    columns - (columns * rows - count)
                } else {
                    0
                };
                (columns, rows, last_row, 0)
            }
            Orientation::Vertical => {
                let rows = self.compute_rows(ctx, inside_height, tile_height);
                let columns = compute_other(count, rows);
                let last_column = if vpos != VPos::Top {
                    rows - (columns * rows - count)
                } else {
                    0
                };
                (columns, rows, 0, last_column)
            }
        };

        let row_x = ctx.left()
            + compute_x_offset(inside_width, self.content_width(ctx, columns, tile_width), hpos);
        let column_y = ctx.top()
            + compute_y_offset(inside_height, self.content_height(ctx, rows, tile_height), vpos);
        let last_row_x = if last_row > 0 {
            ctx.left()
                + compute_x_offset(inside_width, self.content_width(ctx, last_row, tile_width), hpos)
        } else {
            row_x
        };
        let last_column_y = if last_column > 0 {
            ctx.top()
                + compute_y_offset(
                    inside_height,
                    self.content_height(ctx, last_column, tile_height),
                    vpos,
                )
        } else {
            column_y
        };

        let baseline = if self.tile_alignment.vpos() == VPos::Baseline {
            ctx.area_baseline_offset(
                &managed(children),
                MARGIN,
                |_| Some(tile_width),
                tile_height,
                |_| false,
                0.0,
            )
        } else {
            0.0
        };

        let (mut row, mut column) = (0, 0);
        for child in managed_mut(children) {
            let x_offset = if row + 1 == rows { last_row_x } else { row_x };
            let y_offset = if column + 1 == columns {
                last_column_y
            } else {
                column_y
            };
            let tile_x = x_offset + column as f64 * (tile_width + hgap);
            let tile_y = y_offset + row as f64 * (tile_height + vgap);

            let alignment = Self::alignment(child.as_ref()).unwrap_or(self.tile_alignment);
            let margin = Self::margin(child.as_ref());
            ctx.layout_in_area(
                child.as_mut(),
                Bounds::new(tile_x, tile_y, tile_width, tile_height),
                baseline,
                margin,
                true,
                true,
                alignment.hpos(),
                alignment.vpos(),
            );

            match self.orientation {
                Orientation::Horizontal => {
                    column += 1;
                    if column == columns {
                        column = 0;
                        row += 1;
                    }
                }
                Orientation::Vertical => {
                    row += 1;
                    if row == rows {
                        row = 0;
                        column += 1;
                    }
                }
            }
        }
        trace!(columns, rows, tile_width, tile_height, "tile layout");
    }

    fn invalidate(&mut self) {
        self.tile_width.set(None);
        self.tile_height.set(None);
    }
}
