//! Page flourishes layered on the onview [`Document`](onview_core::Document).
//!
//! Each component attaches to a subtree, keeps its own small state and writes
//! through the document journal, so the same change replay the engine uses
//! applies here too.

pub mod config;
pub mod dom;
pub mod error;
pub mod flip;
pub mod parallax;
pub mod slider;
pub mod tabs;
pub mod timeline;

pub use config::{FlourishConfig, ParallaxConfig, SliderConfig, TimelineConfig};
pub use error::FlourishError;
pub use parallax::{Parallax, ParallaxItem};
pub use slider::Slider;
pub use tabs::Tabs;
pub use timeline::Timeline;
