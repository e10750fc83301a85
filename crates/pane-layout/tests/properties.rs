//! Property tests for space distribution and pixel snapping.

use pane_core::Orientation;
use pane_layout::{
    ColumnConstraints, GridLayout, GridPane, HBox, HBoxPane, Leaf, Node, Priority, SnapOptions,
    VBox, VBoxPane,
};
use proptest::prelude::*;

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Never),
        Just(Priority::Sometimes),
        Just(Priority::Always),
    ]
}

fn growing_row(prefs: &[f64], priorities: &[Priority], spacing: f64) -> HBoxPane {
    let children = prefs
        .iter()
        .zip(priorities)
        .map(|(&pref, &priority)| {
            let mut child = Leaf::new(pref, 10.0);
            HBox::set_hgrow(&mut child, Some(priority));
            Box::new(child) as Box<dyn Node>
        })
        .collect();
    HBoxPane::with_children(HBox::new(spacing), children)
}

proptest! {
    #[test]
    fn hbox_hands_out_all_surplus(
        prefs in prop::collection::vec(0u32..100, 1..6),
        priorities in prop::collection::vec(priority(), 6),
        spacing in 0u32..10,
        extra in 0u32..200,
    ) {
        let prefs: Vec<f64> = prefs.into_iter().map(f64::from).collect();
        let mut priorities = priorities[..prefs.len()].to_vec();
        if priorities.iter().all(|p| *p == Priority::Never) {
            priorities[0] = Priority::Sometimes;
        }
        let spacing = f64::from(spacing);
        let gaps = spacing * (prefs.len() - 1) as f64;
        let allocated = prefs.iter().sum::<f64>() + gaps + f64::from(extra);

        let mut row = growing_row(&prefs, &priorities, spacing);
        row.resize(allocated, 10.0);
        row.layout();

        let used: f64 = (0..prefs.len())
            .map(|i| row.child_bounds(i).unwrap().width)
            .sum();
        prop_assert!((used + gaps - allocated).abs() <= 1.0);
        for (i, pref) in prefs.iter().enumerate() {
            prop_assert!(row.child_bounds(i).unwrap().width >= pref - 1e-9);
        }
    }

    #[test]
    fn hbox_never_shrinks_below_min(
        sizes in prop::collection::vec((0u32..50, 0u32..50), 1..6),
        fraction in 0.0f64..1.0,
    ) {
        let children: Vec<Box<dyn Node>> = sizes
            .iter()
            .map(|&(min, extra)| {
                let min = f64::from(min);
                Box::new(Leaf::new(min + f64::from(extra), 10.0).with_min(min, 0.0))
                    as Box<dyn Node>
            })
            .collect();
        let total_pref: f64 = sizes.iter().map(|&(min, extra)| f64::from(min + extra)).sum();
        let mut row = HBoxPane::with_children(HBox::default(), children);
        row.resize((total_pref * fraction).floor(), 10.0);
        row.layout();

        for (i, &(min, _)) in sizes.iter().enumerate() {
            prop_assert!(row.child_bounds(i).unwrap().width >= f64::from(min) - 1e-9);
        }
    }

    #[test]
    fn vbox_children_stack_without_overlap(
        heights in prop::collection::vec(1u32..60, 1..6),
        spacing in 0u32..8,
    ) {
        let children = heights
            .iter()
            .map(|&h| Box::new(Leaf::new(20.0, f64::from(h))) as Box<dyn Node>)
            .collect();
        let mut column = VBoxPane::with_children(VBox::new(f64::from(spacing)), children);
        column.layout_at_pref_size();

        let mut expected_y = 0.0;
        for (i, &h) in heights.iter().enumerate() {
            let bounds = column.child_bounds(i).unwrap();
            prop_assert!((bounds.y - expected_y).abs() < 1e-9);
            prop_assert!((bounds.height - f64::from(h)).abs() < 1e-9);
            expected_y += f64::from(h) + f64::from(spacing);
        }
    }

    #[test]
    fn grid_growing_columns_fill_width(
        prefs in prop::collection::vec(1u32..80, 1..5),
        hgap in 0u32..10,
        extra in 0u32..150,
    ) {
        let columns = prefs
            .iter()
            .map(|_| ColumnConstraints::default().with_hgrow(Priority::Always))
            .collect();
        let hgap = f64::from(hgap);
        let mut grid = GridPane::new(GridLayout::new(hgap, 0.0).with_columns(columns));
        grid.add_row(
            0,
            prefs
                .iter()
                .map(|&w| Box::new(Leaf::new(f64::from(w), 10.0)) as Box<dyn Node>)
                .collect(),
        );
        let gaps = hgap * (prefs.len() - 1) as f64;
        let allocated = prefs.iter().map(|&w| f64::from(w)).sum::<f64>() + gaps + f64::from(extra);
        grid.resize(allocated, 10.0);
        grid.layout();

        let used: f64 = (0..prefs.len())
            .map(|i| grid.layout_strategy().cell_bounds(i, 0).unwrap().width)
            .sum();
        prop_assert!((used + gaps - allocated).abs() <= 1.0);
    }

    #[test]
    fn snapping_is_idempotent(
        value in -500.0f64..500.0,
        scale in prop_oneof![Just(1.0f64), Just(2.0), Just(4.0)],
    ) {
        let snap = SnapOptions::default().with_scale(scale, scale);
        for axis in [Orientation::Horizontal, Orientation::Vertical] {
            let size = snap.snap_size(value, axis);
            prop_assert_eq!(snap.snap_size(size, axis), size);
            let space = snap.snap_space(value, axis);
            prop_assert_eq!(snap.snap_space(space, axis), space);
            let position = snap.snap_position(value, axis);
            prop_assert_eq!(snap.snap_position(position, axis), position);
        }
    }

    #[test]
    fn snapping_is_monotonic(
        a in -500.0f64..500.0,
        b in -500.0f64..500.0,
        scale in prop_oneof![Just(1.0f64), Just(1.5), Just(2.0)],
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let snap = SnapOptions::default().with_scale(scale, scale);
        let axis = Orientation::Horizontal;
        prop_assert!(snap.snap_size(low, axis) <= snap.snap_size(high, axis));
        prop_assert!(snap.snap_space(low, axis) <= snap.snap_space(high, axis));
        prop_assert!(snap.snap_position(low, axis) <= snap.snap_position(high, axis));
    }

    #[test]
    fn disabled_snapping_passes_through(value in -500.0f64..500.0) {
        let snap = SnapOptions::DISABLED;
        prop_assert_eq!(snap.snap_size(value, Orientation::Vertical), value);
        prop_assert_eq!(snap.snap_space(value, Orientation::Horizontal), value);
        prop_assert_eq!(snap.snap_position(value, Orientation::Vertical), value);
    }
}
