//! Tunables for the flourishes. Every field has a default, so partial JSON works.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlourishConfig {
    pub parallax: ParallaxConfig,
    pub timeline: TimelineConfig,
    pub slider: SliderConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Class of the container whose children drift.
    pub container_class: String,
    /// Speed per child, by position; children beyond the list stay put.
    pub speeds: Vec<f64>,
    /// Viewports this wide or narrower get no parallax.
    pub max_disabled_width: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            container_class: "mission__image-plank".to_string(),
            speeds: vec![-0.1, 0.05, -0.08],
            max_disabled_width: 768.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimelineConfig {
    /// Fraction of the remaining distance covered per frame.
    pub lerp: f64,
    /// Snap to the target once closer than this many pixels.
    pub snap_px: f64,
    pub item_threshold: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            lerp: 0.08,
            snap_px: 0.5,
            item_threshold: 0.5,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SliderConfig {
    pub autoplay_interval_ms: f64,
    /// Delay before the track transition comes back after a resize snap.
    pub resnap_ms: f64,
    pub transition: String,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            autoplay_interval_ms: 7000.0,
            resnap_ms: 50.0,
            transition: "transform 0.5s ease-in-out".to_string(),
        }
    }
}
