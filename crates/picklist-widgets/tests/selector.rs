//! Integration tests for the selector widget.

use picklist_core::{
    Brick, ChannelSink, DrawCommand, Event, Key, MouseButton, Point, RecordingCanvas, RecordingSink,
    Rect, SelectionValue, UpdateMessage, UpdateSink, Widget,
};
use picklist_widgets::{SearchChanged, Selector, SelectorChanged, SelectorProps};
use std::sync::{Arc, Mutex};
use std::thread;

fn mounted(props: SelectorProps) -> (Selector, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let mut selector = Selector::new(props, sink.clone());
    selector.layout(Rect::new(0.0, 0.0, 360.0, 480.0));
    selector.mount();
    (selector, sink)
}

fn click(selector: &mut Selector, y: f32) -> Option<SelectorChanged> {
    selector
        .event(&Event::MouseDown {
            position: Point::new(30.0, y),
            button: MouseButton::Left,
        })
        .and_then(|msg| msg.downcast::<SelectorChanged>().ok())
        .map(|msg| *msg)
}

#[test]
fn test_backend_props_round_trip() {
    let props = SelectorProps::from_json(
        r#"{
            "id": "country_selector",
            "tp_varname": "country",
            "tp_updatevars": "region;",
            "defaultValue": "[\"de\"]",
            "lov": [["fr", "France"], ["de", "Germany"], ["it", {"path": "/it.png", "text": "Italy"}]],
            "multiple": true
        }"#,
    )
    .unwrap();
    let (mut selector, sink) = mounted(props);

    assert_eq!(
        sink.messages()[0],
        UpdateMessage::RequestUpdate {
            id: Some("country_selector".into()),
            names: vec!["country".into(), "region".into()],
        }
    );
    assert_eq!(selector.selected_ids(), ["de"]);

    // Rows are 48px high: third row is Italy
    let changed = click(&mut selector, 100.0).unwrap();
    assert_eq!(
        changed.value,
        SelectionValue::Many(vec!["de".into(), "it".into()])
    );
    assert_eq!(
        sink.last(),
        Some(UpdateMessage::SendUpdate {
            name: "country".into(),
            value: SelectionValue::Many(vec!["de".into(), "it".into()]),
            propagate: true,
        })
    );

    // The backend echoes the value back; nothing changes
    let echoed = selector.props().clone().with_value(changed.value);
    selector.set_props(echoed);
    assert_eq!(selector.selected_ids(), ["de", "it"]);
}

#[test]
fn test_malformed_lov_renders_empty_list() {
    let props = SelectorProps::from_json(r#"{"tp_varname": "v", "lov": [[null, "orphan"], ["b", "B"]]}"#)
        .unwrap();
    let (selector, _) = mounted(props);
    assert!(selector.entries().is_empty());

    let mut canvas = RecordingCanvas::new();
    selector.paint(&mut canvas);
    assert_eq!(canvas.texts().count(), 0);
    assert_eq!(selector.to_html().matches("<li").count(), 0);
}

#[test]
fn test_unparseable_default_lov_passes_through() {
    let (selector, _) = mounted(SelectorProps::new("v").with_default_lov("just text"));
    let ids: Vec<&str> = selector.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["just text"]);
}

#[test]
fn test_search_then_click_then_clear() {
    let (mut selector, sink) = mounted(
        SelectorProps::new("fruit")
            .with_default_lov(r#"[["a", "Apple"], ["b", "Banana"], ["p", "Pear"]]"#)
            .with_filter(true),
    );
    sink.take();

    // Focus the search field by clicking it
    selector.event(&Event::MouseDown {
        position: Point::new(30.0, 10.0),
        button: MouseButton::Left,
    });
    assert!(selector.is_search_focused());

    let msg = selector
        .event(&Event::TextInput { text: "ea".into() })
        .unwrap();
    assert_eq!(msg.downcast_ref::<SearchChanged>().unwrap().text, "ea");
    let visible: Vec<&str> = selector.visible_entries().map(|e| e.id.as_str()).collect();
    assert_eq!(visible, vec!["p"]);
    assert!(sink.is_empty());

    // First row sits below the 40px search field
    let changed = click(&mut selector, 45.0).unwrap();
    assert_eq!(changed.value, SelectionValue::from("p"));

    // Clicking a row blurred the search field; refocus and clear it
    selector.event(&Event::KeyDown { key: Key::Tab });
    selector.event(&Event::KeyDown { key: Key::Escape });
    assert_eq!(selector.search_text(), "");
    assert_eq!(selector.visible_entries().count(), 3);
    assert_eq!(selector.selected_ids(), ["p"]);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_image_entries_paint_images() {
    let (selector, _) = mounted(
        SelectorProps::new("flag")
            .with_default_lov(r#"[["fr", {"path": "/fr.png", "text": "France"}], ["de", {"path": "/de.png"}]]"#),
    );
    let mut canvas = RecordingCanvas::new();
    selector.paint(&mut canvas);
    let alts: Vec<&str> = canvas
        .commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Image { alt, .. } => Some(alt.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(alts, vec!["France", "de"]);
    assert_eq!(canvas.images().collect::<Vec<_>>(), vec!["/fr.png", "/de.png"]);
}

#[test]
fn test_channel_sink_across_threads() {
    let (sink, rx) = ChannelSink::new();
    let mut selector = Selector::new(
        SelectorProps::new("v").with_default_lov(r#"["x", "y"]"#),
        Arc::new(sink),
    );
    let consumer = thread::spawn(move || rx.iter().take(2).collect::<Vec<_>>());

    selector.mount();
    selector.click_id("y");

    let received = consumer.join().unwrap();
    assert!(matches!(received[0], UpdateMessage::RequestUpdate { .. }));
    assert_eq!(
        received[1],
        UpdateMessage::SendUpdate {
            name: "v".into(),
            value: SelectionValue::from("y"),
            propagate: true,
        }
    );
}

#[test]
fn test_closure_sink_observes_updates() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let sink: Arc<dyn UpdateSink> = Arc::new(move |msg: UpdateMessage| {
        if let UpdateMessage::SendUpdate { value, .. } = msg {
            log.lock().unwrap().push(value);
        }
    });
    let mut selector = Selector::new(
        SelectorProps::new("v")
            .with_default_lov(r#"["x", "y"]"#)
            .with_multiple(true),
        sink,
    );
    selector.click_id("x");
    selector.click_id("y");
    selector.click_id("x");

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            SelectionValue::Many(vec!["x".into()]),
            SelectionValue::Many(vec!["x".into(), "y".into()]),
            SelectionValue::Many(vec!["y".into()]),
        ]
    );
}

#[test]
fn test_yaml_manifest_props() {
    let props = SelectorProps::from_yaml(
        "
id: sizes
tp_varname: size
defaultValue: M
defaultLov: '[[\"S\", \"Small\"], [\"M\", \"Medium\"], [\"L\", \"Large\"]]'
className: compact
active: false
",
    )
    .unwrap();
    let (mut selector, sink) = mounted(props);
    assert_eq!(selector.selected_ids(), ["M"]);
    assert!(click(&mut selector, 10.0).is_none());
    assert_eq!(sink.len(), 1);
    assert!(selector
        .to_html()
        .starts_with(r#"<div class="picklist-selector compact" id="sizes""#));
}
