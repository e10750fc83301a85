//! Container layout strategies.
//!
//! Each strategy implements [`crate::Layout`] and defines the constraint keys
//! it reads from its children, with typed setters and getters on the layout
//! type. A `clear_constraints` function per strategy removes its keys from a
//! node.

pub mod anchor;
pub mod border;
pub mod free;
pub mod grid;
pub mod hbox;
pub mod stack;
pub mod tile;
pub mod vbox;

pub use anchor::AnchorLayout;
pub use border::BorderLayout;
pub use free::FreeLayout;
pub use grid::{ColumnConstraints, GridLayout, RowConstraints};
pub use hbox::HBox;
pub use stack::StackLayout;
pub use tile::TileLayout;
pub use vbox::VBox;

use pane_core::Orientation;
use smallvec::SmallVec;

use crate::constraints::Constraint;
use crate::node::Node;

pub(crate) type Managed<'a> = SmallVec<[&'a dyn Node; 16]>;

/// Managed children, in order.
pub(crate) fn managed(children: &[Box<dyn Node>]) -> Managed<'_> {
    children
        .iter()
        .filter(|child| child.is_managed())
        .map(|child| child.as_ref())
        .collect()
}

/// Managed children for arranging, in order.
pub(crate) fn managed_mut(
    children: &mut [Box<dyn Node>],
) -> impl Iterator<Item = &mut Box<dyn Node>> {
    children.iter_mut().filter(|child| child.is_managed())
}

/// Bias of the first managed child that has one.
pub(crate) fn first_bias(children: &[Box<dyn Node>]) -> Option<Orientation> {
    children
        .iter()
        .filter(|child| child.is_managed())
        .find_map(|child| child.content_bias())
}

/// Store or remove a constraint on `node`.
pub(crate) fn set_constraint(node: &mut dyn Node, key: &str, value: Option<Constraint>) {
    node.properties_mut().set(key, value);
}
