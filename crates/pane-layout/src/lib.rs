//! Container layout for the pane layout engine.
//!
//! A [`Pane`] is a node that owns children and a [`Layout`] strategy. Sizing
//! is negotiated recursively: a container asks its children for their min,
//! preferred and max sizes (resolving the dependent dimension first for
//! children with a content bias), adds its own insets, and later places each
//! child in an area of the size it was actually given.
//!
//! # Architecture
//!
//! 1. **Node contract**: [`Node`] is what every layout child provides
//! 2. **Constraints**: per-child settings live in a [`Properties`] bag, keyed
//!    by the container that reads them
//! 3. **Negotiation**: [`LayoutContext`] measures and places children;
//!    [`distribute`] hands out surplus or deficit space
//! 4. **Strategies**: anchor, edge-dock, boxes, stack, tile, grid and free
//!    layouts under [`layouts`]
//!
//! # Example
//!
//! ```
//! use pane_layout::{HBox, HBoxPane, Leaf, Node, Priority};
//!
//! let mut grower = Leaf::new(50.0, 20.0);
//! HBox::set_hgrow(&mut grower, Some(Priority::Always));
//!
//! let mut row = HBoxPane::with_children(
//!     HBox::default(),
//!     vec![Box::new(Leaf::new(50.0, 20.0)), Box::new(grower)],
//! );
//! row.resize(200.0, 20.0);
//! row.layout();
//! assert_eq!(row.child_bounds(1).map(|b| b.width), Some(150.0));
//! ```

pub mod constraints;
pub mod distribute;
pub mod layouts;
pub mod node;
pub mod primitives;
pub mod region;
pub mod snap;

pub use constraints::{Constraint, Priority, Properties, Slot};
pub use layouts::{
    AnchorLayout, BorderLayout, ColumnConstraints, FreeLayout, GridLayout, HBox, RowConstraints,
    StackLayout, TileLayout, VBox,
};
pub use node::{Leaf, Node};
pub use primitives::{bounded_size, LayoutContext};
pub use region::{
    AnchorPane, AnyLayout, BorderPane, FreePane, GridPane, HBoxPane, Layout, Pane, SizeOverride,
    SizeOverrides, StackPane, TilePane, VBoxPane,
};
pub use snap::SnapOptions;
