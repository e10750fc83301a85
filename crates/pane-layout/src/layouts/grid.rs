//! Grid layout: children placed in rows and columns.
//!
//! Each child names its column and row and may span several of either. A
//! track (column or row) is as wide as its widest single-span child unless
//! its [`ColumnConstraints`] or [`RowConstraints`] preset a size. Children
//! spanning several tracks only add the part of their size the tracks do not
//! already cover.
//!
//! When the container is larger or smaller than the preferred size,
//! percentage tracks take their share first. The rest of the surplus goes to
//! tracks under spanning children, then to growing tracks (`Always` before
//! `Sometimes`); a deficit shrinks every non-percentage track towards its
//! minimum.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

use pane_core::{Bounds, HPos, Insets, Orientation, Pos, VPos, MAX_SIZE};
use smallvec::SmallVec;
use tracing::trace;

use super::{managed, managed_mut, set_constraint, Managed};
use crate::constraints::{Constraint, Priority};
use crate::distribute::grow_or_shrink;
use crate::node::Node;
use crate::primitives::{
    bounded_size, compute_x_offset, compute_y_offset, min_baseline_complement,
    pref_baseline_complement, LayoutContext,
};
use crate::region::{Layout, Pane, SizeOverride};

pub const COLUMN: &str = "gridpane-column";
pub const ROW: &str = "gridpane-row";
pub const COLUMN_SPAN: &str = "gridpane-column-span";
pub const ROW_SPAN: &str = "gridpane-row-span";
pub const HALIGNMENT: &str = "gridpane-halignment";
pub const VALIGNMENT: &str = "gridpane-valignment";
pub const HGROW: &str = "gridpane-hgrow";
pub const VGROW: &str = "gridpane-vgrow";
pub const MARGIN: &str = "gridpane-margin";
pub const FILL_WIDTH: &str = "gridpane-fill-width";
pub const FILL_HEIGHT: &str = "gridpane-fill-height";

/// Span reaching to the last track of the grid.
pub const REMAINING: usize = usize::MAX;

const PERCENT_EPSILON: f64 = 1e-9;

type Sizes = SmallVec<[f64; 8]>;

/// Sizing rules for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnConstraints {
    pub min_width: SizeOverride,
    pub pref_width: SizeOverride,
    pub max_width: SizeOverride,
    /// Share of the content width between 0 and 1. Takes precedence over the
    /// size overrides and the grow priority.
    pub percent_width: Option<f64>,
    pub hgrow: Option<Priority>,
    /// Default horizontal alignment for children in this column
    pub halignment: Option<HPos>,
    pub fill_width: bool,
}

impl Default for ColumnConstraints {
    fn default() -> Self {
        Self {
            min_width: SizeOverride::Computed,
            pref_width: SizeOverride::Computed,
            max_width: SizeOverride::Computed,
            percent_width: None,
            hgrow: None,
            halignment: None,
            fill_width: true,
        }
    }
}

impl ColumnConstraints {
    /// Column of exactly `width`.
    pub fn fixed(width: f64) -> Self {
        Self::sized(width, width, width)
    }

    pub fn sized(min: f64, pref: f64, max: f64) -> Self {
        Self {
            min_width: SizeOverride::Fixed(min),
            pref_width: SizeOverride::Fixed(pref),
            max_width: SizeOverride::Fixed(max),
            ..Self::default()
        }
    }

    pub fn percent(percent: f64) -> Self {
        Self {
            percent_width: Some(percent),
            ..Self::default()
        }
    }

    pub fn with_hgrow(mut self, hgrow: Priority) -> Self {
        self.hgrow = Some(hgrow);
        self
    }

    pub fn with_halignment(mut self, halignment: HPos) -> Self {
        self.halignment = Some(halignment);
        self
    }

    pub fn with_fill_width(mut self, fill_width: bool) -> Self {
        self.fill_width = fill_width;
        self
    }

    fn spec(&self) -> TrackSpec {
        TrackSpec {
            min: self.min_width,
            pref: self.pref_width,
            max: self.max_width,
            percent: self.percent_width.filter(|p| *p >= 0.0),
            grow: self.hgrow,
        }
    }
}

/// Sizing rules for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowConstraints {
    pub min_height: SizeOverride,
    pub pref_height: SizeOverride,
    pub max_height: SizeOverride,
    /// Share of the content height between 0 and 1
    pub percent_height: Option<f64>,
    pub vgrow: Option<Priority>,
    pub valignment: Option<VPos>,
    pub fill_height: bool,
}

impl Default for RowConstraints {
    fn default() -> Self {
        Self {
            min_height: SizeOverride::Computed,
            pref_height: SizeOverride::Computed,
            max_height: SizeOverride::Computed,
            percent_height: None,
            vgrow: None,
            valignment: None,
            fill_height: true,
        }
    }
}

impl RowConstraints {
    pub fn fixed(height: f64) -> Self {
        Self::sized(height, height, height)
    }

    pub fn sized(min: f64, pref: f64, max: f64) -> Self {
        Self {
            min_height: SizeOverride::Fixed(min),
            pref_height: SizeOverride::Fixed(pref),
            max_height: SizeOverride::Fixed(max),
            ..Self::default()
        }
    }

    pub fn percent(percent: f64) -> Self {
        Self {
            percent_height: Some(percent),
            ..Self::default()
        }
    }

    pub fn with_vgrow(mut self, vgrow: Priority) -> Self {
        self.vgrow = Some(vgrow);
        self
    }

    pub fn with_valignment(mut self, valignment: VPos) -> Self {
        self.valignment = Some(valignment);
        self
    }

    pub fn with_fill_height(mut self, fill_height: bool) -> Self {
        self.fill_height = fill_height;
        self
    }

    fn spec(&self) -> TrackSpec {
        TrackSpec {
            min: self.min_height,
            pref: self.pref_height,
            max: self.max_height,
            percent: self.percent_height.filter(|p| *p >= 0.0),
            grow: self.vgrow,
        }
    }
}

/// Track sizes from the last layout pass, for [`GridLayout::cell_bounds`].
#[derive(Debug, Clone, Default)]
struct Lines {
    x: f64,
    y: f64,
    hgap: f64,
    vgap: f64,
    widths: Sizes,
    heights: Sizes,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    pub hgap: f64,
    pub vgap: f64,
    /// Placement of the grid within the container
    pub alignment: Pos,
    pub columns: Vec<ColumnConstraints>,
    pub rows: Vec<RowConstraints>,
    #[cfg_attr(feature = "serde", serde(skip))]
    lines: Option<Lines>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            hgap: 0.0,
            vgap: 0.0,
            alignment: Pos::TopLeft,
            columns: Vec::new(),
            rows: Vec::new(),
            lines: None,
        }
    }
}

impl GridLayout {
    pub fn new(hgap: f64, vgap: f64) -> Self {
        Self {
            hgap,
            vgap,
            ..Self::default()
        }
    }

    pub fn with_alignment(mut self, alignment: Pos) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnConstraints>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_rows(mut self, rows: Vec<RowConstraints>) -> Self {
        self.rows = rows;
        self
    }

    /// Place `child` at `column`, `row`.
    pub fn set_position(child: &mut dyn Node, column: usize, row: usize) {
        Self::set_column(child, Some(column));
        Self::set_row(child, Some(row));
    }

    pub fn set_column(child: &mut dyn Node, value: Option<usize>) {
        set_constraint(child, COLUMN, value.map(index_constraint));
    }

    pub fn column(child: &dyn Node) -> Option<usize> {
        child.properties().integer(COLUMN).map(to_index)
    }

    pub fn set_row(child: &mut dyn Node, value: Option<usize>) {
        set_constraint(child, ROW, value.map(index_constraint));
    }

    pub fn row(child: &dyn Node) -> Option<usize> {
        child.properties().integer(ROW).map(to_index)
    }

    /// Columns covered by `child`; [`REMAINING`] reaches the last column.
    pub fn set_column_span(child: &mut dyn Node, value: Option<usize>) {
        set_constraint(child, COLUMN_SPAN, value.map(index_constraint));
    }

    pub fn column_span(child: &dyn Node) -> Option<usize> {
        child.properties().integer(COLUMN_SPAN).map(to_span)
    }

    pub fn set_row_span(child: &mut dyn Node, value: Option<usize>) {
        set_constraint(child, ROW_SPAN, value.map(index_constraint));
    }

    pub fn row_span(child: &dyn Node) -> Option<usize> {
        child.properties().integer(ROW_SPAN).map(to_span)
    }

    pub fn set_halignment(child: &mut dyn Node, value: Option<HPos>) {
        set_constraint(child, HALIGNMENT, value.map(Into::into));
    }

    pub fn halignment(child: &dyn Node) -> Option<HPos> {
        child.properties().hpos(HALIGNMENT)
    }

    pub fn set_valignment(child: &mut dyn Node, value: Option<VPos>) {
        set_constraint(child, VALIGNMENT, value.map(Into::into));
    }

    pub fn valignment(child: &dyn Node) -> Option<VPos> {
        child.properties().vpos(VALIGNMENT)
    }

    pub fn set_hgrow(child: &mut dyn Node, value: Option<Priority>) {
        set_constraint(child, HGROW, value.map(Into::into));
    }

    pub fn hgrow(child: &dyn Node) -> Option<Priority> {
        child.properties().priority(HGROW)
    }

    pub fn set_vgrow(child: &mut dyn Node, value: Option<Priority>) {
        set_constraint(child, VGROW, value.map(Into::into));
    }

    pub fn vgrow(child: &dyn Node) -> Option<Priority> {
        child.properties().priority(VGROW)
    }

    pub fn set_margin(child: &mut dyn Node, value: Option<Insets>) {
        set_constraint(child, MARGIN, value.map(Into::into));
    }

    pub fn margin(child: &dyn Node) -> Option<Insets> {
        child.properties().insets(MARGIN)
    }

    pub fn set_fill_width(child: &mut dyn Node, value: Option<bool>) {
        set_constraint(child, FILL_WIDTH, value.map(Into::into));
    }

    pub fn fill_width(child: &dyn Node) -> Option<bool> {
        child.properties().flag(FILL_WIDTH)
    }

    pub fn set_fill_height(child: &mut dyn Node, value: Option<bool>) {
        set_constraint(child, FILL_HEIGHT, value.map(Into::into));
    }

    pub fn fill_height(child: &dyn Node) -> Option<bool> {
        child.properties().flag(FILL_HEIGHT)
    }

    pub fn clear_constraints(child: &mut dyn Node) {
        child.properties_mut().remove_all(&[
            COLUMN,
            ROW,
            COLUMN_SPAN,
            ROW_SPAN,
            HALIGNMENT,
            VALIGNMENT,
            HGROW,
            VGROW,
            MARGIN,
            FILL_WIDTH,
            FILL_HEIGHT,
        ]);
    }

    /// Area of the cell at `column`, `row` as of the last layout pass.
    pub fn cell_bounds(&self, column: usize, row: usize) -> Option<Bounds> {
        let lines = self.lines.as_ref()?;
        let width = *lines.widths.get(column)?;
        let height = *lines.heights.get(row)?;
        let x = lines.x + lines.widths[..column].iter().sum::<f64>() + lines.hgap * column as f64;
        let y = lines.y + lines.heights[..row].iter().sum::<f64>() + lines.vgap * row as f64;
        Some(Bounds::new(x, y, width, height))
    }
}

fn index_constraint(value: usize) -> Constraint {
    Constraint::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

fn to_index(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

fn to_span(value: i64) -> usize {
    match value {
        i64::MAX => REMAINING,
        v if v >= 1 => to_index(v),
        _ => 1,
    }
}

/// Per-track sizing rules in axis-neutral form.
#[derive(Debug, Clone, Copy, Default)]
struct TrackSpec {
    min: SizeOverride,
    pref: SizeOverride,
    max: SizeOverride,
    percent: Option<f64>,
    grow: Option<Priority>,
}

impl TrackSpec {
    fn fixed_min(&self) -> Option<f64> {
        match self.min {
            SizeOverride::Fixed(v) => Some(v),
            _ => None,
        }
    }

    fn fixed_max(&self) -> Option<f64> {
        match self.max {
            SizeOverride::Fixed(v) => Some(v),
            _ => None,
        }
    }

    /// Ceiling for growth towards spanning children.
    fn growth_limit(&self) -> Option<f64> {
        match (self.max, self.pref) {
            (SizeOverride::Fixed(max), _) if max >= 0.0 => Some(max),
            (SizeOverride::UsePref, SizeOverride::Fixed(pref)) if pref > 0.0 => Some(pref),
            _ => None,
        }
    }
}

/// Sizes of the tracks along one axis, plus the sizes wanted by children
/// spanning several tracks, keyed by `(first, last + 1)`.
#[derive(Debug, Clone)]
struct TrackSizes {
    sizes: Sizes,
    preset: SmallVec<[bool; 8]>,
    spans: BTreeMap<(usize, usize), f64>,
    gap: f64,
}

impl TrackSizes {
    fn new(count: usize, gap: f64, init: f64) -> Self {
        Self {
            sizes: SmallVec::from_elem(init, count),
            preset: SmallVec::from_elem(false, count),
            spans: BTreeMap::new(),
            gap,
        }
    }

    fn set_preset(&mut self, i: usize, size: f64) {
        self.sizes[i] = size;
        self.preset[i] = true;
    }

    fn set_max(&mut self, i: usize, size: f64) {
        self.sizes[i] = self.sizes[i].max(size);
    }

    fn set_max_span(&mut self, begin: usize, end: usize, size: f64) {
        let wanted = self.spans.entry((begin, end)).or_insert(size);
        *wanted = wanted.max(size);
    }

    fn total_range(&self, begin: usize, end: usize) -> f64 {
        if end <= begin {
            return 0.0;
        }
        self.gap * (end - begin - 1) as f64 + self.sizes[begin..end].iter().sum::<f64>()
    }

    fn total(&self) -> f64 {
        self.total_range(0, self.sizes.len())
    }

    /// Limit of track `i`, lowered (or raised, for minimums) to its even share
    /// of any span it belongs to.
    fn proportional_limit(&self, i: usize, minimum: bool) -> f64 {
        let mut result = self.sizes[i];
        if self.preset[i] {
            return result;
        }
        for (&(begin, end), &wanted) in &self.spans {
            if !(begin..end).contains(&i) {
                continue;
            }
            let segment = wanted / (end - begin) as f64;
            let mut share = segment;
            for j in (begin..end).filter(|&j| j != i) {
                let other = self.sizes[j];
                if (minimum && other > segment) || (!minimum && other < segment) {
                    share += segment - other;
                }
            }
            result = if minimum {
                result.max(share)
            } else {
                result.min(share)
            };
        }
        result
    }

    /// Total length including spanning children and percentage shares.
    fn total_with_spans(&self, percent: &[Option<f64>], percent_total: f64) -> f64 {
        let mut total = self.total();
        for (&(begin, end), &wanted) in &self.spans {
            if self.preset[begin..end].iter().all(|p| *p) {
                continue;
            }
            let covered = self.total_range(begin, end);
            if wanted > covered {
                total += wanted - covered;
            }
        }
        if percent_total > 0.0 {
            let mut not_fixed = 0.0;
            for (i, p) in percent.iter().enumerate() {
                if *p == Some(0.0) {
                    total -= self.sizes[i];
                }
            }
            for (i, p) in percent.iter().enumerate() {
                match p {
                    Some(p) if *p > 0.0 => total = total.max(self.sizes[i] / p),
                    Some(_) => {}
                    None => not_fixed += self.sizes[i],
                }
            }
            if percent_total < 1.0 - PERCENT_EPSILON {
                total = total.max(not_fixed / (1.0 - percent_total));
            }
        }
        total
    }
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    column: usize,
    row: usize,
    column_end: usize,
    row_end: usize,
}

impl Placement {
    fn range(&self, axis: Orientation) -> (usize, usize) {
        match axis {
            Orientation::Horizontal => (self.column, self.column_end),
            Orientation::Vertical => (self.row, self.row_end),
        }
    }
}

/// Resolved rules for the tracks of one axis.
struct Tracks {
    axis: Orientation,
    specs: SmallVec<[TrackSpec; 8]>,
    percent: SmallVec<[Option<f64>; 8]>,
    percent_total: f64,
    grow: SmallVec<[Priority; 8]>,
    gap: f64,
}

impl Tracks {
    fn new(axis: Orientation, mut specs: SmallVec<[TrackSpec; 8]>, gap: f64) -> Self {
        let mut percent: SmallVec<[Option<f64>; 8]> = specs.iter().map(|s| s.percent).collect();
        let mut percent_total: f64 = percent.iter().flatten().filter(|p| **p > 0.0).sum();
        if percent_total > 1.0 {
            for p in percent.iter_mut().flatten() {
                *p /= percent_total;
            }
            percent_total = 1.0;
        }
        let grow = specs
            .iter_mut()
            .map(|s| s.grow.take().unwrap_or(Priority::Never))
            .collect();
        Self {
            axis,
            specs,
            percent,
            percent_total,
            grow,
            gap,
        }
    }

    fn count(&self) -> usize {
        self.specs.len()
    }

    fn is_full(&self) -> bool {
        self.percent_total >= 1.0 - PERCENT_EPSILON
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    Min,
    Pref,
}

/// Metrics of one grid over its managed children, built for each query.
struct Grid<'a> {
    layout: &'a GridLayout,
    ctx: &'a LayoutContext,
    children: Managed<'a>,
    cells: SmallVec<[Placement; 16]>,
    columns: Tracks,
    rows: Tracks,
    /// Baseline-aligned children of each row, by managed index
    baseline_rows: Vec<SmallVec<[usize; 4]>>,
    min_complement: Sizes,
    pref_complement: Sizes,
    pref_cache: [OnceCell<TrackSizes>; 2],
    min_cache: [OnceCell<TrackSizes>; 2],
}

fn axis_index(axis: Orientation) -> usize {
    match axis {
        Orientation::Horizontal => 0,
        Orientation::Vertical => 1,
    }
}

fn other_axis(axis: Orientation) -> Orientation {
    match axis {
        Orientation::Horizontal => Orientation::Vertical,
        Orientation::Vertical => Orientation::Horizontal,
    }
}

impl<'a> Grid<'a> {
    fn new(layout: &'a GridLayout, ctx: &'a LayoutContext, children: &'a [Box<dyn Node>]) -> Self {
        let children = managed(children);

        let mut column_count = layout.columns.len();
        let mut row_count = layout.rows.len();
        let spans: SmallVec<[(usize, usize, usize, usize); 16]> = children
            .iter()
            .map(|child| {
                let column = GridLayout::column(*child).unwrap_or(0);
                let row = GridLayout::row(*child).unwrap_or(0);
                let column_span = GridLayout::column_span(*child).unwrap_or(1);
                let row_span = GridLayout::row_span(*child).unwrap_or(1);
                let column_last = match column_span {
                    REMAINING => column,
                    span => column.saturating_add(span - 1),
                };
                let row_last = match row_span {
                    REMAINING => row,
                    span => row.saturating_add(span - 1),
                };
                column_count = column_count.max(column_last + 1);
                row_count = row_count.max(row_last + 1);
                (column, row, column_span, row_span)
            })
            .collect();

        let cells: SmallVec<[Placement; 16]> = spans
            .iter()
            .map(|&(column, row, column_span, row_span)| Placement {
                column,
                row,
                column_end: match column_span {
                    REMAINING => column_count - 1,
                    span => column + span - 1,
                },
                row_end: match row_span {
                    REMAINING => row_count - 1,
                    span => row + span - 1,
                },
            })
            .collect();

        let mut column_specs: SmallVec<[TrackSpec; 8]> = (0..column_count)
            .map(|i| layout.columns.get(i).map(|c| c.spec()).unwrap_or_default())
            .collect();
        let mut row_specs: SmallVec<[TrackSpec; 8]> = (0..row_count)
            .map(|i| layout.rows.get(i).map(|r| r.spec()).unwrap_or_default())
            .collect();

        // Single-span children raise the grow priority of their track
        for (child, cell) in children.iter().zip(&cells) {
            if cell.column == cell.column_end {
                let spec = &mut column_specs[cell.column];
                let grow = GridLayout::hgrow(*child).unwrap_or(Priority::Never);
                spec.grow = Some(spec.grow.map_or(grow, |g| Priority::max(g, grow)));
            }
            if cell.row == cell.row_end {
                let spec = &mut row_specs[cell.row];
                let grow = GridLayout::vgrow(*child).unwrap_or(Priority::Never);
                spec.grow = Some(spec.grow.map_or(grow, |g| Priority::max(g, grow)));
            }
        }

        let mut grid = Self {
            layout,
            ctx,
            children,
            cells,
            columns: Tracks::new(
                Orientation::Horizontal,
                column_specs,
                ctx.snap.snap_space_x(layout.hgap),
            ),
            rows: Tracks::new(
                Orientation::Vertical,
                row_specs,
                ctx.snap.snap_space_y(layout.vgap),
            ),
            baseline_rows: vec![SmallVec::new(); row_count],
            min_complement: SmallVec::from_elem(0.0, row_count),
            pref_complement: SmallVec::from_elem(0.0, row_count),
            pref_cache: [OnceCell::new(), OnceCell::new()],
            min_cache: [OnceCell::new(), OnceCell::new()],
        };

        for i in 0..grid.children.len() {
            if grid.by_baseline(i) {
                let row = grid.cells[i].row;
                grid.baseline_rows[row].push(i);
            }
        }
        for row in 0..row_count {
            let nodes: Managed<'_> = grid.baseline_rows[row]
                .iter()
                .map(|&i| grid.children[i])
                .collect();
            grid.min_complement[row] = min_baseline_complement(&nodes);
            grid.pref_complement[row] = pref_baseline_complement(&nodes);
        }
        grid
    }

    fn tracks(&self, axis: Orientation) -> &Tracks {
        match axis {
            Orientation::Horizontal => &self.columns,
            Orientation::Vertical => &self.rows,
        }
    }

    fn halignment(&self, i: usize) -> HPos {
        GridLayout::halignment(self.children[i])
            .or_else(|| {
                let column = self.cells[i].column;
                self.layout.columns.get(column).and_then(|c| c.halignment)
            })
            .unwrap_or(HPos::Left)
    }

    fn valignment(&self, i: usize) -> VPos {
        GridLayout::valignment(self.children[i])
            .or_else(|| {
                let row = self.cells[i].row;
                self.layout.rows.get(row).and_then(|r| r.valignment)
            })
            .unwrap_or(VPos::Center)
    }

    fn fills_width(&self, i: usize) -> bool {
        GridLayout::fill_width(self.children[i]).unwrap_or_else(|| {
            let column = self.cells[i].column;
            self.layout.columns.get(column).map_or(true, |c| c.fill_width)
        })
    }

    fn fills_height(&self, i: usize) -> bool {
        GridLayout::fill_height(self.children[i]).unwrap_or_else(|| {
            let row = self.cells[i].row;
            self.layout.rows.get(row).map_or(true, |r| r.fill_height)
        })
    }

    fn by_baseline(&self, i: usize) -> bool {
        self.valignment(i) == VPos::Baseline
    }

    /// Area size child `i` asks for along `axis`, given the track sizes of
    /// the other axis when known.
    fn measure(&self, axis: Orientation, measure: Measure, i: usize, other: Option<&[f64]>) -> f64 {
        let child = self.children[i];
        let cell = self.cells[i];
        let margin = GridLayout::margin(child);
        let (begin, end) = cell.range(other_axis(axis));
        let other = other.map(|sizes| sizes[begin..=end].iter().sum::<f64>());
        let baseline = self.by_baseline(i);
        match (axis, measure) {
            (Orientation::Horizontal, Measure::Min) => {
                let complement = baseline.then(|| self.min_complement[cell.row]);
                self.ctx.child_min_area_width(child, complement, margin, other, false)
            }
            (Orientation::Horizontal, Measure::Pref) => {
                let complement = baseline.then(|| self.min_complement[cell.row]);
                self.ctx.child_pref_area_width(child, complement, margin, other, false)
            }
            (Orientation::Vertical, Measure::Min) => {
                let complement = baseline.then(|| self.min_complement[cell.row]);
                self.ctx.child_min_area_height(child, complement, margin, other)
            }
            (Orientation::Vertical, Measure::Pref) => {
                let complement = baseline.then(|| self.pref_complement[cell.row]);
                self.ctx.child_pref_area_height(child, complement, margin, other)
            }
        }
    }

    fn pref_sizes(&self, axis: Orientation, other: Option<&[f64]>) -> TrackSizes {
        if other.is_none() {
            if let Some(cached) = self.pref_cache[axis_index(axis)].get() {
                return cached.clone();
            }
        }

        let tracks = self.tracks(axis);
        let snap = self.ctx.snap;
        let mut result = TrackSizes::new(tracks.count(), tracks.gap, 0.0);
        for (i, spec) in tracks.specs.iter().enumerate() {
            match spec.pref {
                SizeOverride::Fixed(pref) => {
                    let pref = snap.snap_size(pref, axis);
                    if spec.fixed_min().is_some() || spec.fixed_max().is_some() {
                        let min = spec.fixed_min().map_or(0.0, |v| snap.snap_size(v, axis));
                        let max = spec.fixed_max().map_or(f64::INFINITY, |v| snap.snap_size(v, axis));
                        result.set_preset(i, bounded_size(min, pref, max));
                    } else {
                        result.set_preset(i, pref);
                    }
                }
                _ => {
                    if let Some(min) = spec.fixed_min().filter(|v| *v > 0.0) {
                        result.sizes[i] = snap.snap_size(min, axis);
                    }
                }
            }
        }

        for i in 0..self.children.len() {
            let (begin, end) = self.cells[i].range(axis);
            let size = self.measure(axis, Measure::Pref, i, other);
            if begin == end && !result.preset[begin] {
                let spec = &tracks.specs[begin];
                let min = spec.fixed_min().unwrap_or(0.0);
                let max = spec.fixed_max().unwrap_or(MAX_SIZE);
                result.set_max(begin, bounded_size(min, size, max));
            } else if begin != end {
                result.set_max_span(begin, end + 1, size);
            }
        }

        if other.is_none() {
            let _ = self.pref_cache[axis_index(axis)].set(result.clone());
        }
        result
    }

    fn min_sizes(&self, axis: Orientation, other: Option<&[f64]>) -> TrackSizes {
        if other.is_none() {
            if let Some(cached) = self.min_cache[axis_index(axis)].get() {
                return cached.clone();
            }
        }

        let tracks = self.tracks(axis);
        let snap = self.ctx.snap;
        let mut result = TrackSizes::new(tracks.count(), tracks.gap, 0.0);
        let mut prefs: Option<TrackSizes> = None;
        for (i, spec) in tracks.specs.iter().enumerate() {
            match spec.min {
                SizeOverride::UsePref => {
                    let prefs = prefs.get_or_insert_with(|| self.pref_sizes(axis, other));
                    result.set_preset(i, prefs.sizes[i]);
                }
                SizeOverride::Fixed(min) => result.set_preset(i, snap.snap_size(min, axis)),
                SizeOverride::Computed => {}
            }
        }

        for i in 0..self.children.len() {
            let (begin, end) = self.cells[i].range(axis);
            let size = self.measure(axis, Measure::Min, i, other);
            if begin == end && !result.preset[begin] {
                result.set_max(begin, size);
            } else if begin != end {
                result.set_max_span(begin, end + 1, size);
            }
        }

        if other.is_none() {
            let _ = self.min_cache[axis_index(axis)].set(result.clone());
        }
        result
    }

    /// Track maximums; only constraints limit a track, children are capped
    /// when they are placed.
    fn max_sizes(&self, axis: Orientation) -> TrackSizes {
        let tracks = self.tracks(axis);
        let snap = self.ctx.snap;
        let mut result = TrackSizes::new(tracks.count(), tracks.gap, MAX_SIZE);
        let mut prefs: Option<TrackSizes> = None;
        for (i, spec) in tracks.specs.iter().enumerate() {
            match spec.max {
                SizeOverride::UsePref => {
                    let prefs = prefs.get_or_insert_with(|| self.pref_sizes(axis, None));
                    result.set_preset(i, prefs.sizes[i]);
                }
                SizeOverride::Fixed(max) => {
                    let max = snap.snap_size(max, axis);
                    match spec.fixed_min() {
                        Some(min) => {
                            result.set_preset(i, bounded_size(snap.snap_size(min, axis), max, max))
                        }
                        None => result.set_preset(i, max),
                    }
                }
                SizeOverride::Computed => {}
            }
        }
        result
    }

    /// Track sizes fitted to a container `length` along `axis`.
    fn sizes_to_fit(&self, axis: Orientation, length: f64) -> TrackSizes {
        let tracks = self.tracks(axis);
        let mut sizes = if tracks.is_full() {
            TrackSizes::new(tracks.count(), tracks.gap, 0.0)
        } else {
            self.pref_sizes(axis, None)
        };
        self.adjust(axis, &mut sizes, length);
        sizes
    }

    /// Fit `sizes` to a container `length` along `axis`; returns the total
    /// length the tracks take.
    fn adjust(&self, axis: Orientation, sizes: &mut TrackSizes, length: f64) -> f64 {
        let tracks = self.tracks(axis);
        let content = match axis {
            Orientation::Horizontal => length - self.ctx.left() - self.ctx.right(),
            Orientation::Vertical => length - self.ctx.top() - self.ctx.bottom(),
        };
        let gaps = tracks.gap * tracks.count().saturating_sub(1) as f64;

        if tracks.percent_total > 0.0 {
            let mut remainder = 0.0;
            for (i, percent) in tracks.percent.iter().enumerate() {
                let Some(percent) = percent else { continue };
                let size = (content - gaps) * percent;
                let mut floor = size.floor();
                remainder += size - floor;
                if remainder >= 0.5 {
                    floor += 1.0;
                    remainder -= 1.0;
                }
                sizes.sizes[i] = floor;
            }
        }

        let mut total = sizes.total();
        if !tracks.is_full() {
            let available = content - total;
            if available != 0.0 {
                let mut remaining = self.grow_to_spans(tracks, sizes, available);
                remaining = self.distribute(tracks, sizes, remaining);
                total += available - remaining;
            }
        }
        total
    }

    /// Hand surplus to tracks under spanning children until the spans fit.
    fn grow_to_spans(&self, tracks: &Tracks, sizes: &mut TrackSizes, extra: f64) -> f64 {
        if extra <= 0.0 || sizes.spans.is_empty() {
            return extra;
        }

        let mut always = BTreeSet::new();
        let mut sometimes = BTreeSet::new();
        let mut last = BTreeSet::new();
        for &(begin, end) in sizes.spans.keys() {
            for i in (begin..end).filter(|&i| tracks.percent[i].is_none()) {
                match tracks.grow[i] {
                    Priority::Always => {
                        always.insert(i);
                    }
                    Priority::Sometimes => {
                        sometimes.insert(i);
                    }
                    Priority::Never => {}
                }
            }
            if tracks.percent[end - 1].is_none() {
                last.insert(end - 1);
            }
        }

        let remaining = grow_spanned(tracks, sizes, always, extra, false);
        let remaining = grow_spanned(tracks, sizes, sometimes, remaining, false);
        grow_spanned(tracks, sizes, last, remaining, true)
    }

    /// Distribute what is left over growing tracks, or shrink every
    /// non-percentage track for a deficit.
    fn distribute(&self, tracks: &Tracks, sizes: &mut TrackSizes, extra: f64) -> f64 {
        if extra == 0.0 {
            return 0.0;
        }
        let axis = tracks.axis;
        let snap = self.ctx.snap;
        let shrinking = extra < 0.0;
        let bounds = if shrinking {
            self.min_sizes(axis, None)
        } else {
            self.max_sizes(axis)
        };
        let limits: Sizes = (0..tracks.count())
            .map(|i| snap.snap_space(bounds.proportional_limit(i, shrinking), axis))
            .collect();
        let unit = snap.unit(axis);
        let portion = |value: f64| snap.snap_portion(value, axis);

        let tiers: &[Priority] = if shrinking {
            &[Priority::Never]
        } else {
            &[Priority::Always, Priority::Sometimes]
        };
        tiers.iter().fold(extra, |remaining, priority| {
            let eligible: SmallVec<[bool; 8]> = (0..tracks.count())
                .map(|i| tracks.percent[i].is_none() && (shrinking || tracks.grow[i] == *priority))
                .collect();
            grow_or_shrink(&mut sizes.sizes, &limits, &eligible, remaining, unit, portion)
        })
    }
}

/// One tier of [`Grid::grow_to_spans`]: whole-unit portions for the tracks
/// in `set`, each capped by what its spans still lack.
fn grow_spanned(
    tracks: &Tracks,
    sizes: &mut TrackSizes,
    mut set: BTreeSet<usize>,
    mut remaining: f64,
    last_only: bool,
) -> f64 {
    while !set.is_empty() && remaining > set.len() as f64 {
        let portion = (remaining / set.len() as f64).floor();
        let mut saturated: SmallVec<[usize; 8]> = SmallVec::new();
        for &i in &set {
            let mut actual = portion;
            for (&(begin, end), &wanted) in &sizes.spans {
                let lacking = wanted - sizes.total_range(begin, end);
                if last_only {
                    if end - 1 == i {
                        actual = actual.min(lacking.max(0.0));
                    }
                } else if (begin..end).contains(&i) {
                    let sharing = (begin..end).filter(|j| set.contains(j)).count() as f64;
                    actual = actual.min((lacking / sharing).max(0.0).floor());
                }
            }

            let current = sizes.sizes[i];
            let bounded = match tracks.specs[i].growth_limit() {
                Some(limit) => bounded_size(0.0, current + actual, limit),
                None => current + actual,
            };
            let used = bounded - current;
            remaining -= used;
            if used != actual || used == 0.0 {
                saturated.push(i);
            }
            sizes.sizes[i] = bounded;
        }
        for i in saturated {
            set.remove(&i);
        }
    }
    remaining
}

impl Layout for GridLayout {
    /// Horizontal if any managed child is horizontally biased, otherwise
    /// vertical if any child is.
    fn content_bias(&self, children: &[Box<dyn Node>]) -> Option<Orientation> {
        let mut bias = None;
        for child in children.iter().filter(|child| child.is_managed()) {
            match child.content_bias() {
                Some(Orientation::Horizontal) => return Some(Orientation::Horizontal),
                Some(Orientation::Vertical) => bias = Some(Orientation::Vertical),
                None => {}
            }
        }
        bias
    }

    fn compute_min_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        let grid = Grid::new(self, ctx, children);
        let heights = height.map(|height| grid.sizes_to_fit(Orientation::Vertical, height));
        let widths = grid.min_sizes(Orientation::Horizontal, heights.as_ref().map(|h| &h.sizes[..]));
        ctx.left() + widths.total_with_spans(&grid.columns.percent, grid.columns.percent_total) + ctx.right()
    }

    fn compute_min_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        let grid = Grid::new(self, ctx, children);
        let widths = width.map(|width| grid.sizes_to_fit(Orientation::Horizontal, width));
        let heights = grid.min_sizes(Orientation::Vertical, widths.as_ref().map(|w| &w.sizes[..]));
        ctx.top() + heights.total_with_spans(&grid.rows.percent, grid.rows.percent_total) + ctx.bottom()
    }

    fn compute_pref_width(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        height: Option<f64>,
    ) -> f64 {
        let grid = Grid::new(self, ctx, children);
        let heights = height.map(|height| grid.sizes_to_fit(Orientation::Vertical, height));
        let widths = grid.pref_sizes(Orientation::Horizontal, heights.as_ref().map(|h| &h.sizes[..]));
        ctx.left() + widths.total_with_spans(&grid.columns.percent, grid.columns.percent_total) + ctx.right()
    }

    fn compute_pref_height(
        &self,
        ctx: &LayoutContext,
        children: &[Box<dyn Node>],
        width: Option<f64>,
    ) -> f64 {
        let grid = Grid::new(self, ctx, children);
        let widths = width.map(|width| grid.sizes_to_fit(Orientation::Horizontal, width));
        let heights = grid.pref_sizes(Orientation::Vertical, widths.as_ref().map(|w| &w.sizes[..]));
        ctx.top() + heights.total_with_spans(&grid.rows.percent, grid.rows.percent_total) + ctx.bottom()
    }

    fn layout_children(&mut self, ctx: &LayoutContext, children: &mut [Box<dyn Node>]) {
        let (areas, lines) = {
            let grid = Grid::new(self, ctx, children);
            let (widths, heights, column_total, row_total) = match self.content_bias(children) {
                None => {
                    let mut heights = grid.pref_sizes(Orientation::Vertical, None);
                    let mut widths = grid.pref_sizes(Orientation::Horizontal, None);
                    let row_total = grid.adjust(Orientation::Vertical, &mut heights, ctx.height);
                    let column_total = grid.adjust(Orientation::Horizontal, &mut widths, ctx.width);
                    (widths, heights, column_total, row_total)
                }
                Some(Orientation::Horizontal) => {
                    let mut widths = grid.pref_sizes(Orientation::Horizontal, None);
                    let column_total = grid.adjust(Orientation::Horizontal, &mut widths, ctx.width);
                    let mut heights = grid.pref_sizes(Orientation::Vertical, Some(&widths.sizes));
                    let row_total = grid.adjust(Orientation::Vertical, &mut heights, ctx.height);
                    (widths, heights, column_total, row_total)
                }
                Some(Orientation::Vertical) => {
                    let mut heights = grid.pref_sizes(Orientation::Vertical, None);
                    let row_total = grid.adjust(Orientation::Vertical, &mut heights, ctx.height);
                    let mut widths = grid.pref_sizes(Orientation::Horizontal, Some(&heights.sizes));
                    let column_total = grid.adjust(Orientation::Horizontal, &mut widths, ctx.width);
                    (widths, heights, column_total, row_total)
                }
            };

            let hgap = grid.columns.gap;
            let vgap = grid.rows.gap;
            let x = ctx.left()
                + compute_x_offset(ctx.content_width(), column_total, self.alignment.hpos());
            let y = ctx.top()
                + compute_y_offset(ctx.content_height(), row_total, self.alignment.vpos());
            let span_width = |begin: usize, end: usize| widths.total_range(begin, end + 1);

            let mut baselines: Sizes = SmallVec::from_elem(f64::NAN, grid.rows.count());
            let areas: SmallVec<[(Bounds, f64, HPos, VPos, bool, bool); 16]> = (0..grid.children.len())
                .map(|i| {
                    let cell = grid.cells[i];
                    let area = Bounds::new(
                        x + widths.total_range(0, cell.column) + if cell.column > 0 { hgap } else { 0.0 },
                        y + heights.total_range(0, cell.row) + if cell.row > 0 { vgap } else { 0.0 },
                        span_width(cell.column, cell.column_end),
                        heights.total_range(cell.row, cell.row_end + 1),
                    );
                    let valignment = grid.valignment(i);
                    let mut baseline = 0.0;
                    if valignment == VPos::Baseline {
                        if baselines[cell.row].is_nan() {
                            let members = &grid.baseline_rows[cell.row];
                            let nodes: Managed<'_> =
                                members.iter().map(|&j| grid.children[j]).collect();
                            baselines[cell.row] = ctx.area_baseline_offset(
                                &nodes,
                                MARGIN,
                                |t| {
                                    let member = grid.cells[members[t]];
                                    Some(span_width(member.column, member.column_end))
                                },
                                area.height,
                                |t| grid.fills_height(members[t]),
                                grid.min_complement[cell.row],
                            );
                        }
                        baseline = baselines[cell.row];
                    }
                    (
                        area,
                        baseline,
                        grid.halignment(i),
                        valignment,
                        grid.fills_width(i),
                        grid.fills_height(i),
                    )
                })
                .collect();

            let lines = Lines {
                x,
                y,
                hgap,
                vgap,
                widths: widths.sizes.clone(),
                heights: heights.sizes.clone(),
            };
            (areas, lines)
        };

        for (child, (area, baseline, halignment, valignment, fill_width, fill_height)) in
            managed_mut(children).zip(areas.iter().copied())
        {
            let margin = Self::margin(child.as_ref());
            ctx.layout_in_area(
                child.as_mut(),
                area,
                baseline,
                margin,
                fill_width,
                fill_height,
                halignment,
                valignment,
            );
        }
        trace!(
            columns = lines.widths.len(),
            rows = lines.heights.len(),
            "grid layout"
        );
        self.lines = Some(lines);
    }

    fn invalidate(&mut self) {
        self.lines = None;
    }
}

impl Pane<GridLayout> {
    /// Append `child` at `column`, `row`.
    pub fn add(&mut self, mut child: Box<dyn Node>, column: usize, row: usize) {
        GridLayout::set_position(child.as_mut(), column, row);
        self.add_child(child);
    }

    pub fn add_spanning(
        &mut self,
        mut child: Box<dyn Node>,
        column: usize,
        row: usize,
        column_span: usize,
        row_span: usize,
    ) {
        GridLayout::set_column_span(child.as_mut(), Some(column_span));
        GridLayout::set_row_span(child.as_mut(), Some(row_span));
        self.add(child, column, row);
    }

    /// Append `nodes` to `row`, after the last column it already uses.
    pub fn add_row(&mut self, row: usize, nodes: Vec<Box<dyn Node>>) {
        let mut column = self.next_free(Orientation::Horizontal, row);
        for node in nodes {
            self.add(node, column, row);
            column += 1;
        }
    }

    /// Append `nodes` to `column`, below the last row it already uses.
    pub fn add_column(&mut self, column: usize, nodes: Vec<Box<dyn Node>>) {
        let mut row = self.next_free(Orientation::Vertical, column);
        for node in nodes {
            self.add(node, column, row);
            row += 1;
        }
    }

    fn next_free(&self, axis: Orientation, line: usize) -> usize {
        self.children()
            .iter()
            .filter(|child| child.is_managed())
            .filter_map(|child| {
                let child = child.as_ref();
                let (on_line, index, span) = match axis {
                    Orientation::Horizontal => (
                        GridLayout::row(child).unwrap_or(0),
                        GridLayout::column(child).unwrap_or(0),
                        GridLayout::column_span(child).unwrap_or(1),
                    ),
                    Orientation::Vertical => (
                        GridLayout::column(child).unwrap_or(0),
                        GridLayout::row(child).unwrap_or(0),
                        GridLayout::row_span(child).unwrap_or(1),
                    ),
                };
                (on_line == line).then(|| match span {
                    REMAINING => index + 1,
                    span => index + span,
                })
            })
            .max()
            .unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.track_count(Orientation::Horizontal)
    }

    pub fn row_count(&self) -> usize {
        self.track_count(Orientation::Vertical)
    }

    fn track_count(&self, axis: Orientation) -> usize {
        let layout = self.layout_strategy();
        let constrained = match axis {
            Orientation::Horizontal => layout.columns.len(),
            Orientation::Vertical => layout.rows.len(),
        };
        self.children()
            .iter()
            .filter(|child| child.is_managed())
            .map(|child| {
                let child = child.as_ref();
                let (index, span) = match axis {
                    Orientation::Horizontal => (
                        GridLayout::column(child).unwrap_or(0),
                        GridLayout::column_span(child).unwrap_or(1),
                    ),
                    Orientation::Vertical => (
                        GridLayout::row(child).unwrap_or(0),
                        GridLayout::row_span(child).unwrap_or(1),
                    ),
                };
                match span {
                    REMAINING => index + 1,
                    span => index + span,
                }
            })
            .fold(constrained, usize::max)
    }
}
