use onview_core::{Document, ElementId, ElementSpec, Engine, Environment, IntersectionEntry, Rect};
use onview_flourish::{
    flip, slider, tabs, FlourishConfig, FlourishError, Parallax, Slider, Tabs, Timeline,
};

fn mount(name: &str) -> anyhow::Result<Document> {
    let spec: ElementSpec = onview_test_fixtures::trees::load(name)?;
    let mut doc = Document::new();
    doc.mount(&spec)?;
    Ok(doc)
}

fn id(doc: &Document, name: &str) -> ElementId {
    doc.element_by_id(name)
        .unwrap_or_else(|| panic!("fixture has no element #{name}"))
}

#[test]
fn tabs_switch_and_rearm_animations() -> anyhow::Result<()> {
    let mut doc = mount("our_work")?;
    let root = doc.root();
    let t = Tabs::attach(&doc, root).expect("tab container");
    let buttons = t.buttons().to_vec();
    assert_eq!(buttons.len(), 3);

    assert!(t.click(&mut doc, buttons[1])?);
    let projects = id(&doc, "projects");
    assert!(doc.has_class(projects, "active"));
    assert!(!doc.has_class(id(&doc, "services"), "active"));
    assert_eq!(doc.attribute(buttons[1], "aria-selected"), Some("true"));
    assert_eq!(doc.attribute(buttons[0], "aria-selected"), Some("false"));
    let card = doc.children(projects)[0];
    assert!(!doc.has_class(card, tabs::PLAYED_CLASS));

    // data-tab works when aria-controls is absent.
    assert!(t.click(&mut doc, buttons[2])?);
    assert!(doc.has_class(id(&doc, "clients"), "active"));
    Ok(())
}

#[test]
fn tabs_reject_unknown_targets_and_non_panel_links() -> anyhow::Result<()> {
    let mut doc = mount("our_work")?;
    let root = doc.root();
    let t = Tabs::attach(&doc, root).expect("tab container");

    assert_eq!(
        t.switch_to(&mut doc, "careers"),
        Err(FlourishError::UnknownTab("careers".into()))
    );
    assert!(t.buttons().iter().all(|b| !doc.has_class(*b, "active")));

    assert!(t.deep_link(&mut doc, "#clients"));
    assert!(doc.has_class(id(&doc, "clients"), "active"));
    assert!(!t.deep_link(&mut doc, "#"));
    assert!(!t.deep_link(&mut doc, "#nowhere"));
    Ok(())
}

#[test]
fn clicks_inside_tab_buttons_reach_the_button() -> anyhow::Result<()> {
    let mut doc = mount("our_work")?;
    let root = doc.root();
    let t = Tabs::attach(&doc, root).expect("tab container");
    let label = doc.first_with_class(root, "tab-btn__label").expect("label");

    assert!(t.click(&mut doc, label)?);
    assert!(doc.has_class(id(&doc, "projects"), "active"));
    assert!(doc.has_class(t.buttons()[1], "active"));
    // The tab list itself is not a button.
    let list = doc.parent(t.buttons()[0]).expect("tab list");
    assert!(!t.click(&mut doc, list)?);
    Ok(())
}

#[test]
fn slider_navigation_and_autoplay() -> anyhow::Result<()> {
    let mut doc = mount("testimonials")?;
    let root = doc.root();
    let mut sliders = Slider::attach_all(&mut doc, root, &FlourishConfig::default().slider);
    assert_eq!(sliders.len(), 1);
    let s = &mut sliders[0];
    assert!(s.has_arrows());

    let track = doc.first_with_class(root, slider::TRACK_CLASS).expect("track");
    let slides = doc.children(track).to_vec();
    let nav = doc.first_with_class(root, slider::PAGINATION_CLASS).expect("dots");
    let dots = doc.children(nav).to_vec();
    assert!(doc.has_class(slides[0], "is-active"));
    assert!(doc.has_class(dots[0], "is-active"));

    // Autoplay advances on accumulated time.
    assert!(!s.tick(&mut doc, 6999.0));
    assert!(s.tick(&mut doc, 1.0));
    assert_eq!(s.current(), 1);
    assert_eq!(doc.style(track, "transform"), Some("translateX(-100%)"));

    // Hover pauses, leaving restarts the interval from zero.
    s.hover_enter();
    assert!(!s.tick(&mut doc, 20_000.0));
    s.hover_leave();
    assert!(!s.tick(&mut doc, 6000.0));
    assert!(s.tick(&mut doc, 1000.0));
    assert_eq!(s.current(), 2);

    // Manual navigation wraps and stops autoplay for good.
    let next = doc.first_with_class(root, slider::NEXT_CLASS).expect("next");
    assert!(s.click(&mut doc, next));
    assert_eq!(s.current(), 0);
    assert!(!s.is_autoplaying());
    let prev = doc.first_with_class(root, slider::PREV_CLASS).expect("prev");
    s.click(&mut doc, prev);
    assert_eq!(s.current(), 2);

    assert!(s.click_dot(&mut doc, dots[1]));
    assert!(doc.has_class(dots[1], "is-active"));
    assert!(!doc.has_class(dots[2], "is-active"));
    assert!(!doc.has_class(slides[2], "is-active"));
    assert!(!s.tick(&mut doc, 50_000.0));
    Ok(())
}

#[test]
fn slider_clicks_on_nested_icons_and_dot_content() -> anyhow::Result<()> {
    let mut doc = mount("testimonials")?;
    let root = doc.root();
    let mut sliders = Slider::attach_all(&mut doc, root, &FlourishConfig::default().slider);
    let s = &mut sliders[0];

    let icon = doc.first_with_class(root, "slider__icon").expect("arrow icon");
    assert!(s.click(&mut doc, icon));
    assert_eq!(s.current(), 1);
    assert!(!s.is_autoplaying());

    let inner = doc.first_with_class(root, "dot").expect("dot content");
    assert!(s.click(&mut doc, inner));
    assert_eq!(s.current(), 2);

    let nav = doc.first_with_class(root, slider::PAGINATION_CLASS).expect("dots");
    assert!(!s.click(&mut doc, nav));
    assert_eq!(s.current(), 2);
    Ok(())
}

#[test]
fn flip_cards_toggle_inner_card() -> anyhow::Result<()> {
    let mut doc = mount("about_page")?;
    let root = doc.root();
    let wrappers = flip::wrappers(&doc, root);
    assert_eq!(wrappers.len(), 2);

    let card = doc.children(wrappers[0])[0];
    assert_eq!(flip::click(&mut doc, wrappers[0]), Some(true));
    assert!(doc.has_class(card, flip::FLIPPED_CLASS));
    assert_eq!(flip::click(&mut doc, wrappers[0]), Some(false));
    // Second wrapper has no card inside.
    assert_eq!(flip::click(&mut doc, wrappers[1]), None);
    assert_eq!(flip::click(&mut doc, card), None);
    Ok(())
}

#[test]
fn parallax_attaches_to_mission_plank() -> anyhow::Result<()> {
    let mut doc = mount("about_page")?;
    let root = doc.root();
    let cfg = FlourishConfig::default();
    let mut p = Parallax::attach(&doc, root, &cfg.parallax, &Environment::default())
        .expect("parallax enabled on desktop");
    assert_eq!(p.items().len(), 3);

    let plank = id(&doc, "plank-1");
    let written = p.frame(&mut doc, &Rect::new(0.0, 0.0, 1280.0, 800.0), |el| {
        (el == plank).then(|| Rect::new(0.0, 0.0, 400.0, 200.0))
    });
    assert_eq!(written, 1);
    // (0 + 100) - 400 = -300, times -0.1
    assert_eq!(doc.style(plank, "transform"), Some("translateY(30.00px)"));
    Ok(())
}

#[test]
fn timeline_items_light_up_through_engine_watcher() -> anyhow::Result<()> {
    let mut doc = mount("about_page")?;
    let mut engine = Engine::default();
    let root = doc.root();
    let cfg = FlourishConfig::default().timeline;
    let timeline = Timeline::attach(&mut doc, &mut engine, root, cfg)?.expect("timeline present");

    let first = id(&doc, "item-2015");
    let second = id(&doc, "item-2020");
    let watcher = engine
        .watchers()
        .iter()
        .find(|w| w.is_observing(first))
        .map(|w| w.id)
        .expect("item watcher");
    assert!(engine.watchers().is_observing(watcher, second));

    let events = engine
        .intersect(
            &mut doc,
            watcher,
            &[IntersectionEntry::entering(first), IntersectionEntry::leaving(second)],
        )?
        .events
        .clone();
    assert_eq!(timeline.handle_events(&mut doc, &mut engine, &events)?, 1);
    assert!(doc.has_class(first, "is-visible"));
    assert!(!doc.has_class(second, "is-visible"));
    assert!(!engine.watchers().is_observing(watcher, first));
    assert!(engine.watchers().is_observing(watcher, second));
    Ok(())
}
