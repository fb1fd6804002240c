mod common;

use std::collections::HashMap;

use common::{by_id, layout, mount_fixture, viewport_at};
use onview_core::{
    CoreEvent, CounterState, Document, ElementId, Engine, IntersectionEntry, OnviewError, Outputs,
    Rect, RevealState, WatcherId,
};

struct Page {
    doc: Document,
    engine: Engine,
    rects: HashMap<ElementId, Rect>,
}

impl Page {
    fn landing() -> anyhow::Result<Self> {
        let mut doc = mount_fixture("landing_page")?;
        let rects = layout(&doc, "landing_layout")?;
        let mut engine = Engine::default();
        engine.scan(&mut doc, None);
        Ok(Self { doc, engine, rects })
    }

    fn scroll_to(&mut self, y: f64) -> Outputs {
        let rects = &self.rects;
        self.engine
            .evaluate_viewport(&mut self.doc, viewport_at(y), |id| rects.get(&id).copied())
            .clone()
    }

    fn id(&self, name: &str) -> ElementId {
        by_id(&self.doc, name)
    }

    fn watcher_of(&self, name: &str) -> WatcherId {
        let el = self.id(name);
        self.engine
            .watchers()
            .iter()
            .find(|w| w.is_observing(el))
            .map(|w| w.id)
            .unwrap_or_else(|| panic!("#{name} is not observed"))
    }
}

fn revealed(outputs: &Outputs) -> Vec<ElementId> {
    outputs
        .events
        .iter()
        .filter_map(|e| match e {
            CoreEvent::Revealed { element } => Some(*element),
            _ => None,
        })
        .collect()
}

#[test]
fn one_shot_elements_reveal_once_and_unsubscribe() -> anyhow::Result<()> {
    let mut page = Page::landing()?;
    let title = page.id("hero-title");
    let copy = page.id("hero-copy");

    let outputs = page.scroll_to(0.0);
    assert_eq!(revealed(&outputs), vec![title, copy]);
    for el in [title, copy] {
        assert!(page.doc.has_class(el, "is-inview"));
        assert_eq!(page.engine.reveal_state(el), RevealState::Revealed);
        assert!(page.engine.watchers().iter().all(|w| !w.is_observing(el)));
    }

    // Scrolling far away and back never hides or re-announces them.
    page.scroll_to(3000.0);
    let outputs = page.scroll_to(0.0);
    assert!(revealed(&outputs).is_empty());
    assert!(page.doc.has_class(title, "is-inview"));
    Ok(())
}

#[test]
fn replay_elements_toggle_with_visibility() -> anyhow::Result<()> {
    let mut page = Page::landing()?;
    let badge = page.id("hero-badge");

    page.scroll_to(0.0);
    assert_eq!(page.engine.reveal_state(badge), RevealState::Hidden);
    assert!(!page.doc.has_class(badge, "is-inview"));

    let outputs = page.scroll_to(800.0);
    assert_eq!(revealed(&outputs), vec![badge]);
    assert_eq!(page.engine.reveal_state(badge), RevealState::Visible);

    // Exactly half visible still meets the 0.5 threshold.
    let outputs = page.scroll_to(1000.0);
    assert!(revealed(&outputs).is_empty());
    assert!(page.doc.has_class(badge, "is-inview"));

    let outputs = page.scroll_to(2000.0);
    assert!(outputs
        .events
        .contains(&CoreEvent::Hidden { element: badge }));
    assert!(!page.doc.has_class(badge, "is-inview"));
    assert_eq!(page.engine.reveal_state(badge), RevealState::Hidden);

    page.scroll_to(800.0);
    assert!(page.doc.has_class(badge, "is-inview"));
    Ok(())
}

#[test]
fn host_delivered_batches_are_filtered_to_subscribers() -> anyhow::Result<()> {
    let mut page = Page::landing()?;
    let title = page.id("hero-title");
    let badge = page.id("hero-badge");
    let watcher = page.watcher_of("hero-title");

    // The badge lives on another watcher, so this entry is dropped.
    let outputs = page.engine.intersect(
        &mut page.doc,
        watcher,
        &[IntersectionEntry::entering(badge), IntersectionEntry::entering(title)],
    )?;
    assert_eq!(revealed(outputs), vec![title]);
    assert_eq!(page.engine.reveal_state(badge), RevealState::Hidden);

    let err = page
        .engine
        .intersect(&mut page.doc, WatcherId(99), &[])
        .unwrap_err();
    assert_eq!(err, OnviewError::UnknownWatcher(WatcherId(99)));
    Ok(())
}

#[test]
fn counters_start_when_their_watcher_fires() -> anyhow::Result<()> {
    let mut page = Page::landing()?;
    let projects = page.id("projects");

    // Only a third of the counter row is inside the trimmed root.
    page.scroll_to(800.0);
    assert_eq!(page.engine.counter_state(projects), Some(CounterState::Pending));

    let outputs = page.scroll_to(1000.0);
    let started = outputs
        .events
        .iter()
        .filter(|e| matches!(e, CoreEvent::CounterStarted { .. }))
        .count();
    assert_eq!(started, 3);
    assert_eq!(page.engine.counter_state(projects), Some(CounterState::Running));
    assert!(page.engine.has_pending_frames());
    assert!(page.engine.watchers().iter().all(|w| !w.is_observing(projects)));
    Ok(())
}

#[test]
fn named_watchers_report_back_as_events() -> anyhow::Result<()> {
    let mut page = Page::landing()?;
    let badge = page.id("hero-badge");

    let watcher = page
        .engine
        .watch(&mut page.doc, "timeline", 0.5, "0px", badge)?;
    // Same key, same watcher; distinct from the reveal watcher at 0.5.
    assert_eq!(page.engine.watch(&mut page.doc, "timeline", 0.5, "0px", badge)?, watcher);
    assert_ne!(watcher, page.watcher_of("hero-title"));

    let outputs = page.scroll_to(800.0);
    assert!(outputs.events.contains(&CoreEvent::Watched {
        watcher,
        name: "timeline".into(),
        element: badge,
        is_intersecting: true,
        ratio: 1.0,
    }));

    page.engine.unwatch(&mut page.doc, watcher, badge)?;
    assert!(!page.engine.watchers().is_observing(watcher, badge));
    Ok(())
}
