//! Live performance badges fed by `PerformanceObserver`.
//!
//! Setup failures (no observer support, unknown entry type) leave the badge
//! untouched.

use velvet_core::{BadgeReading, InteractionBadge, LayoutShift, LayoutShiftBadge, VelvetConfig};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, PerformanceObserver, PerformanceObserverEntryList, Window,
};

use crate::js;

type ObserverCallback = Closure<dyn FnMut(PerformanceObserverEntryList, PerformanceObserver)>;

/// A running observer. Disconnects on drop.
pub(crate) struct BadgeObserver {
    observer: PerformanceObserver,
    _callback: ObserverCallback,
}

impl std::fmt::Debug for BadgeObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeObserver").finish_non_exhaustive()
    }
}

impl Drop for BadgeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Start both badges. Returns the observers that could be attached.
pub(crate) fn observe(
    window: &Window,
    document: &Document,
    config: &VelvetConfig,
) -> Vec<BadgeObserver> {
    if !js::has_property(window, "PerformanceObserver") {
        tracing::debug!("PerformanceObserver unsupported, badges disabled");
        return Vec::new();
    }
    [layout_shift(document, config), interaction(document, config)]
        .into_iter()
        .flatten()
        .collect()
}

fn layout_shift(document: &Document, config: &VelvetConfig) -> Option<BadgeObserver> {
    let badge = badge(document, &config.cls_badge_id)?;
    let mut state = LayoutShiftBadge::new(config.cls_thresholds);
    let callback: ObserverCallback = Closure::new(move |list: PerformanceObserverEntryList, _| {
        let shifts: Vec<LayoutShift> = list
            .get_entries()
            .iter()
            .map(|entry| LayoutShift {
                value: js::number(&entry, "value").unwrap_or(0.0),
                had_recent_input: js::flag(&entry, "hadRecentInput"),
            })
            .collect();
        render(&badge, &state.record(&shifts));
    });
    start(
        callback,
        &[
            ("type", JsValue::from_str("layout-shift")),
            ("buffered", JsValue::from_bool(true)),
        ],
    )
}

fn interaction(document: &Document, config: &VelvetConfig) -> Option<BadgeObserver> {
    let badge = badge(document, &config.inp_badge_id)?;
    let mut state = InteractionBadge::new(config.inp_thresholds);
    let callback: ObserverCallback = Closure::new(move |list: PerformanceObserverEntryList, _| {
        let durations: Vec<f64> = list
            .get_entries()
            .iter()
            .filter_map(|entry| js::number(&entry, "duration"))
            .collect();
        render(&badge, &state.record(&durations));
    });
    start(
        callback,
        &[
            ("type", JsValue::from_str("event")),
            ("buffered", JsValue::from_bool(true)),
            (
                "durationThreshold",
                JsValue::from(config.inp_duration_threshold_ms),
            ),
        ],
    )
}

fn badge(document: &Document, id: &str) -> Option<Element> {
    let badge = document.get_element_by_id(id);
    if badge.is_none() {
        tracing::debug!("Badge #{id} missing, observer skipped");
    }
    badge
}

fn start(callback: ObserverCallback, options: &[(&str, JsValue)]) -> Option<BadgeObserver> {
    let observer = match PerformanceObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(err) => {
            tracing::debug!("PerformanceObserver rejected: {}", js::describe(&err));
            return None;
        }
    };
    // `PerformanceObserverInit` covers `type` and `buffered` but has no
    // `durationThreshold`, so both observers share one plain options object.
    let observe = js::method(&observer, "observe")?;
    if let Err(err) = observe.call1(&observer, &js::object(options)) {
        tracing::debug!("Observer setup failed: {}", js::describe(&err));
        return None;
    }
    Some(BadgeObserver {
        observer,
        _callback: callback,
    })
}

fn render(badge: &Element, reading: &BadgeReading) {
    badge.set_text_content(Some(&reading.text));
    if let Some(badge) = badge.dyn_ref::<HtmlElement>() {
        let _ = badge
            .style()
            .set_property("border-color", reading.rating.color());
    }
}
