//! End-to-end layout scenarios across the container types.

use std::sync::Arc;

use pane_core::{Bounds, BorderWidths, Insets};
use pane_layout::layouts::grid::REMAINING;
use pane_layout::{
    AnchorLayout, AnchorPane, BorderPane, ColumnConstraints, GridLayout, GridPane, HBox, HBoxPane,
    Leaf, Node, Priority, Slot, StackLayout, StackPane,
};
use pane_style::{Border, BorderImage, BorderStroke, Color, Image};

#[test]
fn anchor_stretch_between_opposite_anchors() {
    let mut child = Leaf::new(100.0, 20.0).with_min(50.0, 0.0);
    AnchorLayout::set_left_anchor(&mut child, Some(10.0));
    AnchorLayout::set_right_anchor(&mut child, Some(20.0));
    let mut pane = AnchorPane::with_children(AnchorLayout, vec![Box::new(child)]);
    pane.resize(300.0, 100.0);
    pane.layout();

    let bounds = pane.child_bounds(0).unwrap();
    assert!((bounds.x - 10.0).abs() < 1e-9);
    assert!((bounds.width - 270.0).abs() < 1e-9);
}

#[test]
fn anchor_layout_is_idempotent() {
    let mut first = Leaf::new(40.0, 40.0);
    AnchorLayout::set_top_anchor(&mut first, Some(5.0));
    AnchorLayout::set_bottom_anchor(&mut first, Some(5.0));
    AnchorLayout::set_right_anchor(&mut first, Some(12.0));
    let second = Leaf::new(30.0, 10.0).with_position(7.0, 9.0);
    let mut pane = AnchorPane::with_children(AnchorLayout, vec![Box::new(first), Box::new(second)])
        .with_padding(Insets::uniform(3.0));
    pane.resize(200.0, 120.0);

    pane.layout();
    let once: Vec<Bounds> = (0..2).filter_map(|i| pane.child_bounds(i)).collect();
    pane.layout();
    let twice: Vec<Bounds> = (0..2).filter_map(|i| pane.child_bounds(i)).collect();
    assert_eq!(once, twice);
}

#[test]
fn hbox_grow_distribution() {
    let mut children: Vec<Box<dyn Node>> = (0..3)
        .map(|_| Box::new(Leaf::new(50.0, 20.0)) as Box<dyn Node>)
        .collect();
    HBox::set_hgrow(children[1].as_mut(), Some(Priority::Always));
    let mut pane = HBoxPane::with_children(HBox::default(), children);
    pane.resize(210.0, 20.0);
    pane.layout();

    let widths: Vec<f64> = (0..3).map(|i| pane.child_bounds(i).unwrap().width).collect();
    assert_eq!(widths, vec![50.0, 110.0, 50.0]);
    assert!((pane.child_bounds(2).unwrap().x - 160.0).abs() < 1e-9);
}

#[test]
fn border_pane_with_only_center() {
    let mut pane = BorderPane::default();
    pane.set_center(Some(Box::new(Leaf::new(40.0, 40.0))));
    pane.resize(200.0, 200.0);
    pane.layout();
    assert_eq!(pane.slot_bounds(Slot::Center), Some(Bounds::new(0.0, 0.0, 200.0, 200.0)));
    assert!(pane.top().is_none());
}

#[test]
fn center_slot_holds_one_child() {
    let mut pane = BorderPane::default();
    assert!(pane.set_center(Some(Box::new(Leaf::new(10.0, 10.0)))).is_none());
    let old = pane.set_center(Some(Box::new(Leaf::new(20.0, 20.0))));
    assert!(old.is_some());
    assert_eq!(pane.children().len(), 1);
    assert!((pane.center().unwrap().pref_width(None) - 20.0).abs() < 1e-9);
}

#[test]
fn border_aggregation_feeds_region_insets() {
    let stroke = BorderStroke::solid(Color::BLACK, 2.0).unwrap();
    let image = BorderImage::new(
        Image::loaded("frame.png", 16.0, 16.0),
        Some(BorderWidths::uniform(4.0).unwrap()),
        Some(Insets::EMPTY),
        None,
        false,
        None,
        None,
    );
    let border = Arc::new(Border::new(vec![stroke], vec![image]));
    assert!((border.insets().top() - 4.0).abs() < 1e-9);

    let mut pane = StackPane::with_children(
        StackLayout::default(),
        vec![Box::new(Leaf::new(10.0, 10.0))],
    )
    .with_border(border);
    assert!((pane.insets().top() - 4.0).abs() < 1e-9);
    assert!((pane.pref_width(None) - 18.0).abs() < 1e-9);

    pane.resize(100.0, 100.0);
    pane.layout();
    assert_eq!(pane.child_bounds(0), Some(Bounds::new(4.0, 4.0, 92.0, 92.0)));
}

#[test]
fn grid_form_layout() {
    // Label column keeps its size, field column takes the rest
    let layout = GridLayout::new(8.0, 4.0).with_columns(vec![
        ColumnConstraints::default(),
        ColumnConstraints::default().with_hgrow(Priority::Always),
    ]);
    let mut pane = GridPane::new(layout).with_padding(Insets::uniform(10.0));
    pane.add_row(0, vec![Box::new(Leaf::new(60.0, 20.0)), Box::new(Leaf::new(100.0, 20.0))]);
    pane.add_row(1, vec![Box::new(Leaf::new(40.0, 20.0)), Box::new(Leaf::new(100.0, 20.0))]);
    pane.add_spanning(Box::new(Leaf::new(50.0, 30.0)), 0, 2, REMAINING, 1);

    assert!((pane.pref_width(None) - 188.0).abs() < 1e-9);
    assert!((pane.pref_height(None) - 98.0).abs() < 1e-9);

    pane.resize(400.0, 98.0);
    pane.layout();
    assert_eq!(pane.child_bounds(1), Some(Bounds::new(78.0, 10.0, 312.0, 20.0)));
    assert_eq!(pane.child_bounds(4), Some(Bounds::new(10.0, 58.0, 380.0, 30.0)));
}
