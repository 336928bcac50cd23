//! Benchmarks for list normalization, filtering and selector rendering.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use picklist_core::{lov, Event, Key, NullSink, RecordingCanvas, Rect, Widget};
use picklist_widgets::{Selector, SelectorProps};
use std::sync::Arc;

fn serialized_lov(count: usize) -> String {
    let entries: Vec<String> = (0..count)
        .map(|i| format!(r#"["id{i}", "Option number {i}"]"#))
        .collect();
    format!("[{}]", entries.join(","))
}

fn bench_normalize(c: &mut Criterion) {
    let raw = serialized_lov(1_000);
    c.bench_function("normalize_1000_serialized", |b| {
        b.iter(|| lov::normalize(None, Some(black_box(raw.as_str()))))
    });
}

fn bench_filter(c: &mut Criterion) {
    let entries = lov::normalize(None, Some(serialized_lov(10_000).as_str()));
    c.bench_function("filter_10000_entries", |b| {
        b.iter(|| lov::filter_indices(black_box(&entries), black_box("number 99")))
    });
}

fn bench_selector_paint(c: &mut Criterion) {
    let props = SelectorProps::new("v")
        .with_default_lov(serialized_lov(1_000))
        .with_filter(true);
    let mut selector = Selector::new(props, Arc::new(NullSink));
    selector.layout(Rect::new(0.0, 0.0, 360.0, 600.0));

    c.bench_function("selector_paint_1000", |b| {
        b.iter(|| {
            let mut canvas = RecordingCanvas::new();
            selector.paint(&mut canvas);
            black_box(canvas.command_count())
        })
    });
}

fn bench_selector_typing(c: &mut Criterion) {
    let props = SelectorProps::new("v")
        .with_default_lov(serialized_lov(1_000))
        .with_filter(true);
    let mut selector = Selector::new(props, Arc::new(NullSink));
    selector.layout(Rect::new(0.0, 0.0, 360.0, 600.0));
    selector.event(&Event::FocusIn);

    c.bench_function("selector_type_and_erase", |b| {
        b.iter(|| {
            selector.event(&Event::TextInput {
                text: black_box("12".to_string()),
            });
            selector.event(&Event::KeyDown { key: Key::Escape });
        })
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_filter,
    bench_selector_paint,
    bench_selector_typing
);
criterion_main!(benches);
