use grabber_core::protocol::Rect;
use grabber_core::{
    ExcludeSet, HtmlDocument, LayoutSnapshot, NodeId, PickerEvent, PickerHost, PickerOutput, Toggle,
};

const PAGE: &str = r#"
<body>
  <header><h1 class="title">Docs</h1></header>
  <ul><li class="row">a</li><li class="row">b</li></ul>
  <div id="selector-grabber-overlay"></div>
</body>
"#;

fn layout(doc: &HtmlDocument) -> LayoutSnapshot<NodeId> {
    let mut layout = LayoutSnapshot::new();
    layout.push(doc.select_nth("header", 0).unwrap(), Rect::new(0.0, 0.0, 800.0, 60.0));
    layout.push(doc.select_nth("h1", 0).unwrap(), Rect::new(10.0, 10.0, 200.0, 40.0));
    layout.push(doc.select_nth("li", 0).unwrap(), Rect::new(0.0, 100.0, 800.0, 20.0));
    layout.push(doc.select_nth("li", 1).unwrap(), Rect::new(0.0, 120.0, 800.0, 20.0));
    layout.push(
        doc.select_nth("#selector-grabber-overlay", 0).unwrap(),
        Rect::new(0.0, 0.0, 800.0, 600.0),
    );
    layout
}

fn overlay(doc: &HtmlDocument) -> ExcludeSet<NodeId> {
    doc.overlay_nodes(&["selector-grabber-overlay".to_string()])
}

#[test]
fn test_toggle_starts_and_stops() {
    let doc = HtmlDocument::parse(PAGE);
    let mut host = PickerHost::new();
    assert!(!host.is_active());

    let started = host.toggle(|| overlay(&doc));
    assert!(matches!(started, Toggle::Started(_)));
    assert!(host.is_active());

    assert_eq!(host.toggle(|| overlay(&doc)), Toggle::Stopped);
    assert!(!host.is_active());
}

#[test]
fn test_stop_requires_current_handle() {
    let doc = HtmlDocument::parse(PAGE);
    let mut host = PickerHost::new();
    let first = host.start(overlay(&doc));
    let second = host.start(overlay(&doc));
    assert_ne!(first, second);
    assert_eq!(host.session().map(|s| s.handle()), Some(second));

    assert!(!host.stop(first));
    assert!(host.is_active());
    assert!(host.stop(second));
    assert!(!host.is_active());
}

#[test]
fn test_hover_reports_label_and_bounds() {
    let doc = HtmlDocument::parse(PAGE);
    let layout = layout(&doc);
    let mut host = PickerHost::new();
    host.start(overlay(&doc));

    let output = host.dispatch(&doc, &layout, PickerEvent::PointerMove { x: 20.0, y: 20.0 });
    match output {
        PickerOutput::Hover(info) => {
            assert_eq!(info.label, "h1.title");
            assert_eq!(info.rect, Some(Rect::new(10.0, 10.0, 200.0, 40.0)));
        }
        other => panic!("expected hover, got {:?}", other),
    }
}

#[test]
fn test_click_picks_element_under_overlay() {
    let doc = HtmlDocument::parse(PAGE);
    let layout = layout(&doc);
    let mut host = PickerHost::new();
    host.start(overlay(&doc));

    match host.dispatch(&doc, &layout, PickerEvent::Click { x: 5.0, y: 125.0 }) {
        PickerOutput::Picked(result) => {
            assert_eq!(result.selector, "li:nth-of-type(2)");
            assert!(result.ambiguous_fallback);
            assert_eq!(result.tag_name, "li");
            assert_eq!(result.attributes.get("class"), Some("row"));
        }
        other => panic!("expected pick, got {:?}", other),
    }
    assert!(host.is_active());
}

#[test]
fn test_click_on_empty_area_is_a_no_op() {
    let doc = HtmlDocument::parse(PAGE);
    let layout = layout(&doc);
    let mut host = PickerHost::new();
    host.start(overlay(&doc));

    // Only the excluded overlay covers this point.
    let output = host.dispatch(&doc, &layout, PickerEvent::Click { x: 400.0, y: 500.0 });
    assert_eq!(output, PickerOutput::Nothing);
    assert!(host.is_active());
}

#[test]
fn test_escape_cancels_session() {
    let doc = HtmlDocument::parse(PAGE);
    let layout = layout(&doc);
    let mut host = PickerHost::new();
    host.start(overlay(&doc));

    assert_eq!(
        host.dispatch(&doc, &layout, PickerEvent::Key("Enter".into())),
        PickerOutput::Nothing
    );
    assert_eq!(
        host.dispatch(&doc, &layout, PickerEvent::Key("Escape".into())),
        PickerOutput::Cancelled
    );
    assert!(!host.is_active());
    assert!(host.session().is_none());
    assert_eq!(
        host.dispatch(&doc, &layout, PickerEvent::Click { x: 20.0, y: 20.0 }),
        PickerOutput::Nothing
    );

    // A toggle after cancellation starts fresh.
    assert!(matches!(host.toggle(|| overlay(&doc)), Toggle::Started(_)));
}

#[test]
fn test_repeated_clicks_are_idempotent() {
    let doc = HtmlDocument::parse(PAGE);
    let layout = layout(&doc);
    let mut host = PickerHost::new();
    host.start(overlay(&doc));

    let first = host.dispatch(&doc, &layout, PickerEvent::Click { x: 20.0, y: 20.0 });
    let second = host.dispatch(&doc, &layout, PickerEvent::Click { x: 20.0, y: 20.0 });
    assert_eq!(first, second);
}
