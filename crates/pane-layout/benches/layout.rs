//! Layout pass benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pane_layout::{
    ColumnConstraints, GridLayout, GridPane, HBox, HBoxPane, Leaf, Node, Priority,
};

fn toolbar(count: usize) -> HBoxPane {
    let children = (0..count)
        .map(|i| {
            let mut child = Leaf::new(20.0 + (i % 7) as f64 * 5.0, 24.0).with_min(10.0, 0.0);
            if i % 3 == 0 {
                HBox::set_hgrow(&mut child, Some(Priority::Always));
            }
            Box::new(child) as Box<dyn Node>
        })
        .collect();
    HBoxPane::with_children(HBox::new(4.0), children)
}

fn form(rows: usize) -> GridPane {
    let layout = GridLayout::new(8.0, 4.0).with_columns(vec![
        ColumnConstraints::default(),
        ColumnConstraints::default().with_hgrow(Priority::Always),
    ]);
    let mut grid = GridPane::new(layout);
    for row in 0..rows {
        grid.add_row(
            row,
            vec![
                Box::new(Leaf::new(60.0 + (row % 4) as f64 * 10.0, 20.0)),
                Box::new(Leaf::new(150.0, 20.0)),
            ],
        );
    }
    grid
}

fn hbox_grow(c: &mut Criterion) {
    let mut pane = toolbar(64);
    c.bench_function("hbox_grow_64", |b| {
        b.iter(|| {
            pane.resize(black_box(2400.0), 24.0);
            pane.layout();
        })
    });
}

fn hbox_shrink(c: &mut Criterion) {
    let mut pane = toolbar(64);
    c.bench_function("hbox_shrink_64", |b| {
        b.iter(|| {
            pane.resize(black_box(900.0), 24.0);
            pane.layout();
        })
    });
}

fn grid_form(c: &mut Criterion) {
    let mut pane = form(50);
    c.bench_function("grid_form_50", |b| {
        b.iter(|| {
            pane.resize(black_box(640.0), black_box(1200.0));
            pane.layout();
        })
    });
}

fn grid_pref(c: &mut Criterion) {
    let pane = form(50);
    c.bench_function("grid_pref_50", |b| b.iter(|| black_box(&pane).pref_width(None)));
}

criterion_group!(benches, hbox_grow, hbox_shrink, grid_form, grid_pref);
criterion_main!(benches);
