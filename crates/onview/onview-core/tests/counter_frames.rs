mod common;

use common::{by_id, mount_fixture};
use onview_core::{
    Config, CoreEvent, CounterState, Document, ElementId, ElementSpec, Engine, Environment,
    IntersectionEntry,
};

/// Scan the landing page and force every counter visible.
fn running_counters() -> anyhow::Result<(Document, Engine)> {
    let mut doc = mount_fixture("landing_page")?;
    let mut engine = Engine::default();
    engine.scan(&mut doc, None);

    let projects = by_id(&doc, "projects");
    let watcher = engine
        .watchers()
        .iter()
        .find(|w| w.is_observing(projects))
        .map(|w| w.id)
        .expect("counter watcher");
    let entries: Vec<IntersectionEntry> = ["projects", "budget", "reach"]
        .iter()
        .map(|id| IntersectionEntry::entering(by_id(&doc, id)))
        .collect();
    engine.intersect(&mut doc, watcher, &entries)?;
    Ok((doc, engine))
}

fn text<'a>(doc: &'a Document, id: &str) -> &'a str {
    doc.text(by_id(doc, id))
}

#[test]
fn counters_interpolate_and_land_exactly() -> anyhow::Result<()> {
    let (mut doc, mut engine) = running_counters()?;

    engine.frame(&mut doc, 1000.0);
    assert_eq!(text(&doc, "budget"), "$0.00");
    assert_eq!(text(&doc, "projects"), "0+");

    engine.frame(&mut doc, 1500.0);
    assert_eq!(text(&doc, "budget"), "$617.25");
    engine.frame(&mut doc, 1800.0);
    // easeOutCubic(0.5) = 0.875
    assert_eq!(text(&doc, "projects"), "1,094+");

    let outputs = engine.frame(&mut doc, 2000.0).clone();
    assert_eq!(text(&doc, "budget"), "$1,234.50");
    assert!(outputs.events.contains(&CoreEvent::CounterFinished {
        element: by_id(&doc, "budget"),
        text: "$1,234.50".into(),
    }));

    engine.frame(&mut doc, 2600.0);
    assert_eq!(text(&doc, "projects"), "1,250+");
    assert_eq!(text(&doc, "reach"), "12M");
    for id in ["projects", "budget", "reach"] {
        let el = by_id(&doc, id);
        assert_eq!(doc.attribute(el, "data-counted"), Some("true"));
        assert_eq!(engine.counter_state(el), Some(CounterState::Counted));
    }
    assert!(!engine.has_pending_frames());

    // Finished counters are not touched again.
    assert!(engine.frame(&mut doc, 4000.0).is_empty());
    Ok(())
}

#[test]
fn invalid_target_is_isolated_from_siblings() -> anyhow::Result<()> {
    let (mut doc, mut engine) = running_counters()?;
    let broken = by_id(&doc, "broken");

    assert_eq!(doc.attribute(broken, "data-count-error"), Some("true"));
    assert_eq!(engine.counter_state(broken), Some(CounterState::Error));
    assert_eq!(doc.text(broken), "?");
    assert!(engine.watchers().iter().all(|w| !w.is_observing(broken)));

    engine.frame(&mut doc, 0.0);
    engine.frame(&mut doc, 5000.0);
    assert_eq!(text(&doc, "projects"), "1,250+");
    assert_eq!(doc.text(broken), "?");
    Ok(())
}

#[test]
fn counting_starts_from_the_displayed_number() {
    let mut doc = Document::new();
    let el = doc
        .mount(
            &ElementSpec::new("span")
                .class("impact__number")
                .attr("data-target-number", "200")
                .attr("data-count-easing", "linear")
                .attr("data-count-duration", "100")
                .text("100 clients"),
        )
        .unwrap();
    let mut engine = Engine::default();
    engine.scan(&mut doc, None);
    let watcher = engine.watchers().iter().next().map(|w| w.id).unwrap();

    let outputs = engine
        .intersect(&mut doc, watcher, &[IntersectionEntry::entering(el)])
        .unwrap();
    assert!(outputs.events.contains(&CoreEvent::CounterStarted {
        element: el,
        from: 100.0,
        to: 200.0,
    }));
    engine.frame(&mut doc, 0.0);
    engine.frame(&mut doc, 50.0);
    assert_eq!(doc.text(el), "150");
}

#[test]
fn zero_duration_jumps_to_target() {
    let mut doc = Document::new();
    let el = doc
        .mount(
            &ElementSpec::new("span")
                .class("impact__number")
                .attr("data-target-number", "42")
                .attr("data-count-duration", "0"),
        )
        .unwrap();
    let mut engine = Engine::default();
    engine.scan(&mut doc, None);
    let watcher = engine.watchers().iter().next().map(|w| w.id).unwrap();
    engine
        .intersect(&mut doc, watcher, &[IntersectionEntry::entering(el)])
        .unwrap();

    assert_eq!(doc.text(el), "42");
    assert_eq!(engine.counter_state(el), Some(CounterState::Counted));
    assert!(!engine.has_pending_frames());
}

fn finished_at_scan(env: Environment) -> anyhow::Result<(Document, Engine)> {
    let mut doc = mount_fixture("landing_page")?;
    let mut engine = Engine::new(Config {
        environment: env,
        ..Config::default()
    });
    engine.scan(&mut doc, None);
    Ok((doc, engine))
}

#[test]
fn reduced_motion_and_missing_observer_need_no_frames() -> anyhow::Result<()> {
    let envs = [
        Environment {
            reduced_motion: true,
            ..Environment::default()
        },
        Environment {
            intersection_observer: false,
            ..Environment::default()
        },
    ];
    for env in envs {
        let (doc, engine) = finished_at_scan(env)?;
        assert!(!engine.has_pending_frames());
        assert_eq!(text(&doc, "projects"), "1,250+");
        assert_eq!(text(&doc, "budget"), "$1,234.50");
        assert_eq!(text(&doc, "reach"), "12M");
        let counted: Vec<ElementId> = ["projects", "budget", "reach"]
            .iter()
            .map(|id| by_id(&doc, id))
            .filter(|el| doc.attribute(*el, "data-counted") == Some("true"))
            .collect();
        assert_eq!(counted.len(), 3);
    }
    Ok(())
}

#[test]
fn counted_markup_is_left_alone() {
    let mut doc = Document::new();
    let el = doc
        .mount(
            &ElementSpec::new("span")
                .class("impact__number")
                .attr("data-target-number", "10")
                .attr("data-counted", "true")
                .text("10"),
        )
        .unwrap();
    let mut engine = Engine::default();
    let outputs = engine.scan(&mut doc, None);
    assert!(outputs.is_empty());
    assert_eq!(engine.counter_state(el), None);
}
