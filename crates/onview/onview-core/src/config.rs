//! Engine configuration: attribute defaults and the host environment.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::format::NumberFormat;

/// Top-level configuration handed to [`Engine::new`](crate::engine::Engine::new).
///
/// Every field is optional when deserialized, so hosts can pass a partial
/// JSON object such as `{ "environment": { "reduced_motion": true } }`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub reveal: RevealDefaults,
    pub counter: CounterDefaults,
    pub environment: Environment,
}

/// Fallbacks for `data-ani-*` attributes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevealDefaults {
    pub variant: String,
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub easing: String,
    pub once: bool,
    pub threshold: f64,
    pub root_margin: String,
    /// Viewport widths below this drop declared delays (unless `data-ani-load="true"`).
    pub mobile_breakpoint: f64,
}

impl Default for RevealDefaults {
    fn default() -> Self {
        Self {
            variant: "fade-up".to_string(),
            delay_ms: 0.0,
            duration_ms: 600.0,
            easing: "ease-out".to_string(),
            once: true,
            threshold: 0.2,
            root_margin: "0px 0px -10% 0px".to_string(),
            mobile_breakpoint: 768.0,
        }
    }
}

/// Fallbacks for counter attributes and the dedicated counter watcher.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CounterDefaults {
    /// Class that marks an element as a counter.
    pub class_name: String,
    pub duration_ms: f64,
    pub easing: Easing,
    pub format: NumberFormat,
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for CounterDefaults {
    fn default() -> Self {
        Self {
            class_name: "impact__number".to_string(),
            duration_ms: 1600.0,
            easing: Easing::EaseOutCubic,
            format: NumberFormat::Grouped,
            threshold: 0.35,
            root_margin: "0px 0px -10% 0px".to_string(),
        }
    }
}

/// Capabilities and preferences of the hosting page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Environment {
    /// Whether the host can deliver visibility-intersection notifications.
    pub intersection_observer: bool,
    /// `prefers-reduced-motion: reduce`.
    pub reduced_motion: bool,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            intersection_observer: true,
            reduced_motion: false,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}

impl Environment {
    /// True when elements must jump to their final state without animating.
    #[inline]
    pub fn skip_motion(&self) -> bool {
        self.reduced_motion || !self.intersection_observer
    }
}
