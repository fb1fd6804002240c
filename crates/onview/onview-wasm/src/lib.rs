use js_sys::JSON;
use serde::Deserialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use onview_core::{
    Config, Document, ElementId, ElementSpec, Engine, Environment, IntersectionEntry, Outputs,
    Rect, WatcherId,
};
use onview_flourish::{dom, flip, FlourishConfig, Parallax, Slider, Tabs, Timeline};

/// Engine plus its document mirror and the page flourishes.
///
/// Every mutating call returns `{ changes, events }`; the host applies
/// `changes` to the real page in order.
#[wasm_bindgen]
pub struct OnviewEngine {
    core: Engine,
    doc: Document,
    flourish: FlourishConfig,
    parallax: Option<Parallax>,
    timeline: Option<Timeline>,
    sliders: Vec<Slider>,
    tabs: Option<Tabs>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdapterConfig {
    #[serde(flatten)]
    core: Config,
    flourish: FlourishConfig,
}

#[derive(Debug, Deserialize)]
struct ElementRect {
    element: ElementId,
    #[serde(flatten)]
    rect: Rect,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn tree_from_js(what: &str, tree: &JsValue) -> Result<ElementSpec, JsError> {
    if jsvalue_is_undefined_or_null(tree) {
        return Err(JsError::new(&format!("{what}: tree is null/undefined")));
    }
    // Accept a JSON string or a plain object; objects go through JSON so the
    // core parser sees the same text either way.
    let text = match tree.as_string() {
        Some(s) => s,
        None => JSON::stringify(tree)
            .map_err(|e| JsError::new(&format!("{what} stringify error: {:?}", e)))?
            .as_string()
            .ok_or_else(|| JsError::new(&format!("{what}: stringify produced non-string")))?,
    };
    ElementSpec::from_json(&text).map_err(|e| JsError::new(&format!("{what}: {e}")))
}

fn rects_from_js(rects: JsValue) -> Result<Vec<ElementRect>, JsError> {
    if jsvalue_is_undefined_or_null(&rects) {
        return Ok(Vec::new());
    }
    swb::from_value(rects).map_err(|e| JsError::new(&format!("rects error: {e}")))
}

fn lookup(rects: &[ElementRect], element: ElementId) -> Option<Rect> {
    rects.iter().find(|r| r.element == element).map(|r| r.rect)
}

fn to_js(out: &Outputs) -> Result<JsValue, JsError> {
    swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
}

impl OnviewEngine {
    /// Append whatever the document journaled outside the engine and convert.
    fn finish(&mut self, mut out: Outputs) -> Result<JsValue, JsError> {
        out.extend_changes(self.doc.drain_changes());
        to_js(&out)
    }

    /// Let the timeline react to named-watcher events in `out`.
    fn route_watched(&mut self, out: &Outputs) -> Result<(), JsError> {
        if let Some(timeline) = &self.timeline {
            timeline
                .handle_events(&mut self.doc, &mut self.core, &out.events)
                .map_err(|e| JsError::new(&format!("timeline error: {e}")))?;
        }
        Ok(())
    }
}

#[wasm_bindgen]
impl OnviewEngine {
    /// Create an engine. Pass a config object (core fields plus an optional
    /// `flourish` section) or undefined/null for defaults.
    ///
    ///   new OnviewEngine({ environment: { reduced_motion: true } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OnviewEngine, JsError> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let cfg: AdapterConfig = if jsvalue_is_undefined_or_null(&config) {
            AdapterConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(OnviewEngine {
            core: Engine::new(cfg.core),
            doc: Document::new(),
            flourish: cfg.flourish,
            parallax: None,
            timeline: None,
            sliders: Vec::new(),
            tabs: None,
        })
    }

    /// Mirror a page subtree under the document root. Returns its element id.
    /// Nothing is journaled: the host already has this markup.
    #[wasm_bindgen]
    pub fn mount(&mut self, tree: JsValue) -> Result<u32, JsError> {
        let spec = tree_from_js("mount", &tree)?;
        let id = self
            .doc
            .mount(&spec)
            .map_err(|e| JsError::new(&format!("mount error: {e}")))?;
        Ok(id.0)
    }

    /// Mirror content the host added under `parent`. Follow with `scan(parent)`.
    #[wasm_bindgen]
    pub fn insert(&mut self, parent: u32, tree: JsValue) -> Result<u32, JsError> {
        let spec = tree_from_js("insert", &tree)?;
        let id = self
            .doc
            .insert(ElementId(parent), &spec)
            .map_err(|e| JsError::new(&format!("insert error: {e}")))?;
        Ok(id.0)
    }

    /// Element id for an `id` attribute, if mirrored.
    #[wasm_bindgen(js_name = element_by_id)]
    pub fn element_by_id(&self, id: String) -> Option<u32> {
        self.doc.element_by_id(&id).map(|e| e.0)
    }

    /// Replace the environment (viewport size, capabilities).
    #[wasm_bindgen(js_name = set_environment)]
    pub fn set_environment(&mut self, env: JsValue) -> Result<(), JsError> {
        let env: Environment = if jsvalue_is_undefined_or_null(&env) {
            Environment::default()
        } else {
            swb::from_value(env).map_err(|e| JsError::new(&format!("environment error: {e}")))?
        };
        self.core.set_environment(env);
        Ok(())
    }

    /// Configure new animated elements and counters below `root` (whole page
    /// when omitted).
    #[wasm_bindgen]
    pub fn scan(&mut self, root: Option<u32>) -> Result<JsValue, JsError> {
        let out = self.core.scan(&mut self.doc, root.map(ElementId)).clone();
        self.finish(out)
    }

    /// Deliver an IntersectionObserver batch: `[{ target, is_intersecting, ratio }]`.
    #[wasm_bindgen]
    pub fn intersect(&mut self, watcher: u32, entries: JsValue) -> Result<JsValue, JsError> {
        let entries: Vec<IntersectionEntry> = swb::from_value(entries)
            .map_err(|e| JsError::new(&format!("entries error: {e}")))?;
        let out = self
            .core
            .intersect(&mut self.doc, WatcherId(watcher), &entries)
            .map_err(|e| JsError::new(&format!("intersect error: {e}")))?
            .clone();
        self.route_watched(&out)?;
        self.finish(out)
    }

    /// Evaluate visibility without an observer. `viewport` is `{ x, y, width,
    /// height }` in page coordinates; `rects` is `[{ element, x, y, width, height }]`.
    #[wasm_bindgen(js_name = evaluate_viewport)]
    pub fn evaluate_viewport(
        &mut self,
        viewport: JsValue,
        rects: JsValue,
    ) -> Result<JsValue, JsError> {
        let viewport: Rect =
            swb::from_value(viewport).map_err(|e| JsError::new(&format!("viewport error: {e}")))?;
        let rects = rects_from_js(rects)?;
        let out = self
            .core
            .evaluate_viewport(&mut self.doc, viewport, |id| lookup(&rects, id))
            .clone();
        self.route_watched(&out)?;
        self.finish(out)
    }

    /// Animation-frame callback: steps counters and the timeline line.
    #[wasm_bindgen]
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<JsValue, JsError> {
        let out = self.core.frame(&mut self.doc, timestamp_ms).clone();
        if let Some(timeline) = self.timeline.as_mut() {
            timeline.frame(&mut self.doc);
        }
        self.finish(out)
    }

    /// True while counters or the timeline line still need frames.
    #[wasm_bindgen(js_name = has_pending_frames)]
    pub fn has_pending_frames(&self) -> bool {
        let timeline_moving = self.timeline.as_ref().is_some_and(|t| !t.is_settled());
        self.core.has_pending_frames() || timeline_moving
    }

    /// Attach parallax, timeline, sliders and tabs found on the page.
    /// `fragment` is the URL hash used for tab deep links.
    #[wasm_bindgen(js_name = attach_flourishes)]
    pub fn attach_flourishes(&mut self, fragment: Option<String>) -> Result<JsValue, JsError> {
        let root = self.doc.root();
        let env = self.core.config().environment.clone();

        self.parallax = Parallax::attach(&self.doc, root, &self.flourish.parallax, &env);
        self.timeline = Timeline::attach(
            &mut self.doc,
            &mut self.core,
            root,
            self.flourish.timeline.clone(),
        )
        .map_err(|e| JsError::new(&format!("timeline error: {e}")))?;
        self.sliders = Slider::attach_all(&mut self.doc, root, &self.flourish.slider);
        self.tabs = Tabs::attach(&self.doc, root);
        if let (Some(tabs), Some(fragment)) = (&self.tabs, fragment.as_deref()) {
            tabs.deep_link(&mut self.doc, fragment);
        }
        self.finish(Outputs::default())
    }

    /// Scroll notification. `timeline_rect` is the timeline's rect in viewport
    /// coordinates, when it has one. Returns true when a frame should be
    /// scheduled: `parallax_frame` for parallax, `frame` for the timeline
    /// (keep calling it while `has_pending_frames`).
    #[wasm_bindgen(js_name = on_scroll)]
    pub fn on_scroll(&mut self, timeline_rect: JsValue) -> Result<bool, JsError> {
        let mut timeline_moved = false;
        if !jsvalue_is_undefined_or_null(&timeline_rect) {
            let rect: Rect = swb::from_value(timeline_rect)
                .map_err(|e| JsError::new(&format!("timeline rect error: {e}")))?;
            let viewport_height = self.core.config().environment.viewport_height;
            if let Some(timeline) = self.timeline.as_mut() {
                timeline_moved = timeline.on_scroll(&rect, viewport_height);
            }
        }
        let parallax = self.parallax.as_mut().is_some_and(Parallax::on_scroll);
        Ok(parallax || timeline_moved)
    }

    #[wasm_bindgen(js_name = parallax_frame)]
    pub fn parallax_frame(
        &mut self,
        viewport: JsValue,
        rects: JsValue,
    ) -> Result<JsValue, JsError> {
        let viewport: Rect =
            swb::from_value(viewport).map_err(|e| JsError::new(&format!("viewport error: {e}")))?;
        let rects = rects_from_js(rects)?;
        if let Some(parallax) = self.parallax.as_mut() {
            parallax.frame(&mut self.doc, &viewport, |id| lookup(&rects, id));
        }
        self.finish(Outputs::default())
    }

    /// Route a click to tabs, sliders or flip cards.
    #[wasm_bindgen]
    pub fn click(&mut self, element: u32) -> Result<JsValue, JsError> {
        let target = ElementId(element);
        let handled = match &self.tabs {
            Some(tabs) => tabs
                .click(&mut self.doc, target)
                .map_err(|e| JsError::new(&format!("tabs error: {e}")))?,
            None => false,
        };
        if !handled {
            let by_slider = self.sliders.iter_mut().any(|s| s.click(&mut self.doc, target));
            if !by_slider {
                let wrapper = dom::closest_with_class(&self.doc, target, flip::WRAPPER_CLASS);
                if let Some(wrapper) = wrapper {
                    flip::click(&mut self.doc, wrapper);
                }
            }
        }
        self.finish(Outputs::default())
    }

    /// Pointer entered (`entering`) or left a slider wrapper.
    #[wasm_bindgen]
    pub fn hover(&mut self, element: u32, entering: bool) {
        let target = ElementId(element);
        for slider in self.sliders.iter_mut().filter(|s| s.wrapper() == Some(target)) {
            if entering {
                slider.hover_enter();
            } else {
                slider.hover_leave();
            }
        }
    }

    /// Advance slider timers by `dt_ms`.
    #[wasm_bindgen]
    pub fn tick(&mut self, dt_ms: f64) -> Result<JsValue, JsError> {
        for slider in &mut self.sliders {
            slider.tick(&mut self.doc, dt_ms);
        }
        self.finish(Outputs::default())
    }

    /// Viewport resized: update the environment and re-snap sliders.
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f64, height: f64) -> Result<JsValue, JsError> {
        let mut env = self.core.config().environment.clone();
        env.viewport_width = width;
        env.viewport_height = height;
        self.core.set_environment(env);
        for slider in &mut self.sliders {
            slider.resize(&mut self.doc);
        }
        self.finish(Outputs::default())
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
