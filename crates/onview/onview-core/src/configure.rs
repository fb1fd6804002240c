//! Element configurator: resolves `data-ani-*` attributes into a
//! [`RevealConfig`] and publishes the presentation variables.

use crate::config::{Environment, RevealDefaults};
use crate::document::Document;
use crate::ids::ElementId;
use crate::parse::{clamp_threshold, parse_time_ms};
use crate::stagger::StaggerPropagator;
use crate::watcher::{WatcherKey, WatcherRole};

/// Attribute, class and variable names of the declarative surface.
pub mod names {
    pub const ANI: &str = "data-ani";
    pub const DELAY: &str = "data-ani-delay";
    pub const DURATION: &str = "data-ani-duration";
    pub const EASING: &str = "data-ani-easing";
    pub const ONCE: &str = "data-ani-once";
    pub const THRESHOLD: &str = "data-ani-threshold";
    pub const ROOT_MARGIN: &str = "data-ani-root-margin";
    pub const LOAD: &str = "data-ani-load";
    pub const STAGGER: &str = "data-ani-stagger";

    pub const INIT_CLASS: &str = "ani-init";
    pub const WILL_ANIMATE_CLASS: &str = "will-animate";
    pub const INVIEW_CLASS: &str = "is-inview";

    pub const VAR_DELAY: &str = "--ani-delay";
    pub const VAR_DURATION: &str = "--ani-duration";
    pub const VAR_EASING: &str = "--ani-easing";
}

/// Fully resolved reveal settings for one element.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    pub variant: String,
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub easing: String,
    pub once: bool,
    pub threshold: f64,
    pub root_margin: String,
}

impl RevealConfig {
    /// Read the element's attributes, falling back to `defaults`.
    pub fn resolve(
        doc: &Document,
        element: ElementId,
        defaults: &RevealDefaults,
        env: &Environment,
    ) -> Self {
        let trimmed_or = |name: &str, fallback: &str| -> String {
            match doc.attribute(element, name).map(str::trim) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => fallback.to_string(),
            }
        };

        let variant = trimmed_or(names::ANI, &defaults.variant);
        let once = match doc.attribute(element, names::ONCE) {
            None => defaults.once,
            Some(v) => !v.eq_ignore_ascii_case("false"),
        };
        let threshold =
            clamp_threshold(doc.attribute(element, names::THRESHOLD), defaults.threshold);
        let root_margin = trimmed_or(names::ROOT_MARGIN, &defaults.root_margin);

        let mut delay_ms = parse_time_ms(doc.attribute(element, names::DELAY), defaults.delay_ms);
        let plays_on_load = doc.attribute(element, names::LOAD) == Some("true");
        if env.viewport_width < defaults.mobile_breakpoint && !plays_on_load {
            delay_ms = 0.0;
        }

        let duration_ms =
            parse_time_ms(doc.attribute(element, names::DURATION), defaults.duration_ms);
        let easing = trimmed_or(names::EASING, &defaults.easing);

        Self {
            variant,
            delay_ms,
            duration_ms,
            easing,
            once,
            threshold,
            root_margin,
        }
    }

    /// The shared-watcher key this element routes to.
    pub fn watcher_key(&self) -> WatcherKey {
        WatcherKey::new(WatcherRole::Reveal, self.threshold, self.root_margin.clone())
    }
}

/// Render milliseconds the way style variables expect (`150ms`, `0.5ms`).
pub fn ms(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}ms")
}

/// Initialize `element` once.
///
/// Returns `None` when the element already carries the init marker.
/// Otherwise marks it, resolves its configuration, freezes its base delay in
/// the stagger side table and publishes `--ani-delay`, `--ani-duration` and
/// `--ani-easing`. Subscribing or revealing is left to the caller.
pub fn configure(
    doc: &mut Document,
    element: ElementId,
    defaults: &RevealDefaults,
    env: &Environment,
    stagger: &mut StaggerPropagator,
) -> Option<RevealConfig> {
    if doc.has_class(element, names::INIT_CLASS) {
        return None;
    }
    doc.add_class(element, names::INIT_CLASS);
    doc.add_class(element, names::WILL_ANIMATE_CLASS);

    let config = RevealConfig::resolve(doc, element, defaults, env);
    doc.set_attribute(element, names::ANI, &config.variant);

    let base = stagger.freeze_base(element, config.delay_ms);
    doc.set_style(element, names::VAR_DELAY, &ms(base));
    doc.set_style(element, names::VAR_DURATION, &ms(config.duration_ms));
    doc.set_style(element, names::VAR_EASING, &config.easing);

    Some(config)
}
