//! Per-child constraint storage.
//!
//! Every node carries a [`Properties`] bag. Containers read and write their own
//! keys in it (anchors, margins, grow priorities, alignment) without the node
//! type knowing anything about the container. Keys are plain strings scoped by
//! a container prefix, so a node moved between containers keeps the old keys
//! until they are cleared; containers ignore keys they do not own.

use indexmap::IndexMap;
use pane_core::{HPos, Insets, Pos, VPos};

/// How eagerly a child takes part in growing or shrinking along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    /// Never grows beyond its preferred size
    #[default]
    Never,
    /// Grows when no `Always` child can take more space
    Sometimes,
    /// Always takes a share of extra space first
    Always,
}

impl Priority {
    /// The more eager of two priorities.
    pub fn max(a: Priority, b: Priority) -> Priority {
        Ord::max(a, b)
    }
}

/// Position of a child in an edge-dock layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

impl Slot {
    pub const ALL: [Slot; 5] = [Slot::Top, Slot::Bottom, Slot::Left, Slot::Right, Slot::Center];
}

/// A single stored constraint value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constraint {
    Number(f64),
    Integer(i64),
    Flag(bool),
    Insets(Insets),
    Priority(Priority),
    Pos(Pos),
    HPos(HPos),
    VPos(VPos),
    Slot(Slot),
}

macro_rules! impl_from_constraint {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Constraint {
                fn from(value: $ty) -> Self {
                    Constraint::$variant(value)
                }
            }
        )*
    };
}

impl_from_constraint! {
    f64 => Number,
    i64 => Integer,
    bool => Flag,
    Insets => Insets,
    Priority => Priority,
    Pos => Pos,
    HPos => HPos,
    VPos => VPos,
    Slot => Slot,
}

/// Insertion-ordered constraint bag owned by a node.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Properties {
    entries: IndexMap<String, Constraint>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Constraint> {
        self.entries.get(key)
    }

    /// Store `value` under `key`, or remove the entry when `value` is `None`.
    ///
    /// Returns the previous value.
    pub fn set(&mut self, key: &str, value: Option<Constraint>) -> Option<Constraint> {
        match value {
            Some(value) => self.entries.insert(key.to_string(), value),
            None => self.remove(key),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Constraint> {
        self.entries.shift_remove(key)
    }

    /// Remove every key in `keys`.
    pub fn remove_all(&mut self, keys: &[&str]) {
        for key in keys {
            self.entries.shift_remove(*key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Constraint::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Constraint::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Constraint::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub fn insets(&self, key: &str) -> Option<Insets> {
        match self.get(key)? {
            Constraint::Insets(value) => Some(*value),
            _ => None,
        }
    }

    pub fn priority(&self, key: &str) -> Option<Priority> {
        match self.get(key)? {
            Constraint::Priority(value) => Some(*value),
            _ => None,
        }
    }

    pub fn pos(&self, key: &str) -> Option<Pos> {
        match self.get(key)? {
            Constraint::Pos(value) => Some(*value),
            _ => None,
        }
    }

    pub fn hpos(&self, key: &str) -> Option<HPos> {
        match self.get(key)? {
            Constraint::HPos(value) => Some(*value),
            _ => None,
        }
    }

    pub fn vpos(&self, key: &str) -> Option<VPos> {
        match self.get(key)? {
            Constraint::VPos(value) => Some(*value),
            _ => None,
        }
    }

    pub fn slot(&self, key: &str) -> Option<Slot> {
        match self.get(key)? {
            Constraint::Slot(value) => Some(*value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut props = Properties::new();
        props.set("pane-top-anchor", Some(Constraint::Number(10.0)));
        assert_eq!(props.number("pane-top-anchor"), Some(10.0));
        assert!(props.contains("pane-top-anchor"));
    }

    #[test]
    fn test_set_none_removes() {
        let mut props = Properties::new();
        props.set("hbox-hgrow", Some(Priority::Always.into()));
        let previous = props.set("hbox-hgrow", None);
        assert_eq!(previous, Some(Constraint::Priority(Priority::Always)));
        assert!(props.is_empty());
    }

    #[test]
    fn test_mismatched_shape_reads_none() {
        let mut props = Properties::new();
        props.set("gridpane-column", Some(Constraint::Flag(true)));
        assert_eq!(props.integer("gridpane-column"), None);
        assert_eq!(props.flag("gridpane-column"), Some(true));
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut props = Properties::new();
        props.set("b", Some(Constraint::Number(1.0)));
        props.set("a", Some(Constraint::Number(2.0)));
        props.set("c", Some(Constraint::Number(3.0)));
        props.remove("a");
        let keys: Vec<&str> = props.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_remove_all_leaves_other_keys() {
        let mut props = Properties::new();
        props.set("pane-top-anchor", Some(Constraint::Number(1.0)));
        props.set("pane-left-anchor", Some(Constraint::Number(1.0)));
        props.set("hbox-margin", Some(Insets::uniform(2.0).into()));
        props.remove_all(&["pane-top-anchor", "pane-left-anchor"]);
        assert_eq!(props.len(), 1);
        assert_eq!(props.insets("hbox-margin"), Some(Insets::uniform(2.0)));
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(Priority::max(Priority::Never, Priority::Sometimes), Priority::Sometimes);
        assert_eq!(Priority::max(Priority::Always, Priority::Sometimes), Priority::Always);
    }
}
