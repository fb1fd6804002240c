//! onview core (host-agnostic)
//!
//! Viewport-triggered reveal engine: resolves declarative `data-ani-*`
//! attributes, routes elements to shared visibility watchers, staggers
//! siblings, toggles the revealed state and animates numeric counters.
//!
//! The engine works on a [`Document`] mirror of the page. Every mutation it
//! performs is journaled and returned as [`Outputs`], which adapters (wasm,
//! native test harnesses) replay onto the real host.

pub mod config;
pub mod configure;
pub mod counter;
pub mod document;
pub mod easing;
pub mod engine;
pub mod error;
pub mod format;
pub mod geometry;
pub mod ids;
pub mod outputs;
pub mod parse;
pub mod reveal;
pub mod stagger;
pub mod watcher;

// Re-exports for consumers (adapters)
pub use config::{Config, CounterDefaults, Environment, RevealDefaults};
pub use configure::RevealConfig;
pub use counter::{CounterSpec, CounterState, CounterTask, FrameStatus};
pub use document::{Document, ElementSpec};
pub use easing::Easing;
pub use engine::Engine;
pub use error::{CounterError, OnviewError};
pub use format::NumberFormat;
pub use geometry::{Rect, RootMargin};
pub use ids::{ElementId, WatcherId};
pub use outputs::{Change, CoreEvent, Outputs};
pub use parse::{clamp_threshold, parse_time_ms};
pub use reveal::RevealState;
pub use watcher::{IntersectionEntry, WatcherKey, WatcherRegistry, WatcherRole};
