//! Mount a small page, scroll it past the viewport and print what the host
//! would have to apply.
//!
//! `cargo run -p onview-core --example simulate_scroll`

use std::collections::HashMap;

use onview_core::{Document, ElementSpec, Engine, Rect};

fn main() -> anyhow::Result<()> {
    let page = ElementSpec::from_json(
        r#"{
          "tag": "main",
          "children": [
            { "tag": "h1", "attrs": { "id": "title", "data-ani": "fade-up" } },
            { "tag": "ul", "attrs": { "data-ani-stagger": "120ms" }, "children": [
              { "tag": "li", "attrs": { "id": "one", "data-ani": "" } },
              { "tag": "li", "attrs": { "id": "two", "data-ani": "" } }
            ] },
            { "tag": "span", "class": "impact__number",
              "attrs": { "id": "stat", "data-target-number": "4800", "data-suffix": "+" },
              "text": "0" }
          ]
        }"#,
    )?;

    let mut doc = Document::new();
    doc.mount(&page)?;
    let mut engine = Engine::default();

    let outputs = engine.scan(&mut doc, None);
    println!("scan:\n{}", serde_json::to_string_pretty(outputs)?);

    let mut rects = HashMap::new();
    for (key, y) in [("title", 40.0), ("one", 300.0), ("two", 360.0), ("stat", 1400.0)] {
        if let Some(id) = doc.element_by_id(key) {
            rects.insert(id, Rect::new(0.0, y, 600.0, 50.0));
        }
    }

    for scroll_y in [0.0, 900.0] {
        let viewport = Rect::new(0.0, scroll_y, 1280.0, 800.0);
        let outputs = engine.evaluate_viewport(&mut doc, viewport, |id| rects.get(&id).copied());
        println!(
            "scroll {scroll_y}: {} changes, events {:?}",
            outputs.changes.len(),
            outputs.events
        );
    }

    let mut ts = 0.0;
    while engine.has_pending_frames() {
        engine.frame(&mut doc, ts);
        ts += 16.0;
    }
    if let Some(stat) = doc.element_by_id("stat") {
        println!("counter settled on {:?} after {ts}ms", doc.text(stat));
    }
    Ok(())
}
