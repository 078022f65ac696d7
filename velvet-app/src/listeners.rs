//! DOM listeners feeding the ingress.
//!
//! Listeners are created once at mount and live as long as the returned
//! `EventListener`s; dropping them detaches everything.

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use velvet_core::{AppEvent, Key, KeyPress, VelvetConfig};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, KeyboardEvent, Node, Window};

use crate::sink::EventSink;

/// Options that keep `preventDefault()` effective.
const ACTIVE: EventListenerOptions = EventListenerOptions {
    phase: EventListenerPhase::Bubble,
    passive: false,
};

fn target_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// Attach every listener the page needs. Missing controls are skipped.
pub(crate) fn install(
    window: &Window,
    document: &Document,
    config: &VelvetConfig,
    sink: &EventSink,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    let link_selector = config.link_selector.clone();
    let links = sink.clone();
    listeners.push(EventListener::new_with_options(
        document,
        "click",
        ACTIVE,
        move |event: &Event| {
            let Some(link) = target_element(event)
                .and_then(|target| target.closest(&link_selector).ok().flatten())
            else {
                return;
            };
            let href = link.get_attribute("href").unwrap_or_default();
            let no_animate = link.get_attribute("data-vt").as_deref() == Some("off");
            if links
                .send(AppEvent::LinkActivated { href, no_animate })
                .prevents_default()
            {
                event.prevent_default();
            }
        },
    ));

    let location = window.location();
    let hashes = sink.clone();
    listeners.push(EventListener::new(window, "hashchange", move |_event| {
        let hash = location.hash().unwrap_or_default();
        hashes.post(AppEvent::HashChanged { hash });
    }));

    let mut click = |id: &str, make: fn() -> AppEvent| match document.get_element_by_id(id) {
        Some(control) => {
            let sink = sink.clone();
            listeners.push(EventListener::new(&control, "click", move |_event| {
                sink.post(make());
            }));
        }
        None => tracing::debug!("Control #{id} missing, listener skipped"),
    };
    click(&config.motion_toggle_id, || AppEvent::ToggleMotion);
    click(&config.open_modal_id, || AppEvent::OpenModal);
    click(&config.close_modal_id, || AppEvent::CloseModal);

    let modal = document.get_element_by_id(&config.modal_id);
    if let Some(modal) = &modal {
        let close_selector = config.close_target_selector.clone();
        let clicks = sink.clone();
        listeners.push(EventListener::new(modal, "click", move |event: &Event| {
            let close_target = target_element(event)
                .is_some_and(|target| target.matches(&close_selector).unwrap_or(false));
            clicks.post(AppEvent::ModalClicked { close_target });
        }));
    }

    let keys = sink.clone();
    listeners.push(EventListener::new_with_options(
        document,
        "keydown",
        ACTIVE,
        move |event: &Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let mut press = KeyPress::new(Key::from_name(&event.key()), event.shift_key());
            let inside = modal.as_ref().is_some_and(|modal| {
                let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
                modal.contains(target.as_ref())
            });
            if inside {
                press = press.in_modal();
            }
            if keys.send(AppEvent::KeyPressed(press)).prevents_default() {
                event.prevent_default();
            }
        },
    ));

    listeners
}
