//! # Velvet VT WASM Application
//!
//! Binds the `velvet-core` controller to a live page: hash routing with
//! view transitions, the motion toggle, the modal with its focus trap,
//! idle image warming and the CLS/INP badges.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web velvet-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { VelvetApp } from './pkg/velvet_app.js';
//!
//! await init();
//! const app = new VelvetApp();
//! // or: VelvetApp.withConfig(JSON.stringify({ stage_id: 'main' }));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod focus;
mod js;
mod listeners;
mod perf;
mod sink;
mod storage;
mod surface;

use std::rc::Rc;

use gloo::events::EventListener;
use velvet_core::{
    AppEvent, Capability, Controller, Dispatch, Ingress, ModalState, PreferenceStore,
    VelvetConfig,
};
use wasm_bindgen::prelude::*;

pub use error::AppError;
pub use storage::LocalStorageBackend;

use perf::BadgeObserver;
use sink::EventSink;
use surface::WebSurface;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Velvet VT WASM initialized");
}

/// A mounted page.
///
/// Dropping it detaches every listener and observer.
#[wasm_bindgen]
pub struct VelvetApp {
    ingress: Rc<Ingress<WebSurface>>,
    window: web_sys::Window,
    _listeners: Vec<EventListener>,
    _badges: Vec<BadgeObserver>,
}

#[wasm_bindgen]
impl VelvetApp {
    /// Mount on the current document with the default element ids.
    ///
    /// # Errors
    ///
    /// Returns an error outside a browser window or if the first render fails.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<VelvetApp, JsValue> {
        Ok(Self::mount(VelvetConfig::default())?)
    }

    /// Mount with a JSON configuration object; missing fields keep defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON or its routes are invalid, or mounting fails.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<VelvetApp, JsValue> {
        let config = VelvetConfig::from_json(json).map_err(AppError::from)?;
        Ok(Self::mount(config)?)
    }

    /// Navigate to `path` (e.g. `/work`) the way a nav link would.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written.
    pub fn navigate(&self, path: &str) -> Result<(), JsValue> {
        let href = format!("#{path}");
        let dispatch = self.send(AppEvent::LinkActivated {
            href: href.clone(),
            no_animate: false,
        })?;
        if !dispatch.prevents_default() {
            self.window.location().set_hash(&href)?;
        }
        Ok(())
    }

    /// Flip the motion preference.
    ///
    /// # Errors
    ///
    /// Returns an error if handling the event fails.
    #[wasm_bindgen(js_name = toggleMotion)]
    pub fn toggle_motion(&self) -> Result<(), JsValue> {
        self.send(AppEvent::ToggleMotion)?;
        Ok(())
    }

    /// Open the modal.
    ///
    /// # Errors
    ///
    /// Returns an error if the modal cannot be revealed.
    #[wasm_bindgen(js_name = openModal)]
    pub fn open_modal(&self) -> Result<(), JsValue> {
        self.send(AppEvent::OpenModal)?;
        Ok(())
    }

    /// Close the modal.
    ///
    /// # Errors
    ///
    /// Returns an error if the modal cannot be hidden.
    #[wasm_bindgen(js_name = closeModal)]
    pub fn close_modal(&self) -> Result<(), JsValue> {
        self.send(AppEvent::CloseModal)?;
        Ok(())
    }

    /// Path currently rendered, e.g. `/home`.
    #[wasm_bindgen(js_name = currentPath)]
    #[must_use]
    pub fn current_path(&self) -> Option<String> {
        self.ingress
            .controller()
            .current_path()
            .map(ToString::to_string)
    }

    /// Whether transitions are allowed by preference.
    #[wasm_bindgen(js_name = motionEnabled)]
    #[must_use]
    pub fn motion_enabled(&self) -> bool {
        self.ingress.controller().motion_enabled()
    }

    /// Whether the modal is open.
    #[wasm_bindgen(js_name = isModalOpen)]
    #[must_use]
    pub fn is_modal_open(&self) -> bool {
        self.ingress.controller().modal_state() == ModalState::Open
    }

    /// Whether the browser supports view transitions.
    #[wasm_bindgen(js_name = supportsTransitions)]
    #[must_use]
    pub fn supports_transitions(&self) -> bool {
        self.ingress.controller().capability().is_supported()
    }
}

impl VelvetApp {
    fn mount(config: VelvetConfig) -> Result<Self, AppError> {
        let window = web_sys::window().ok_or(AppError::NoWindow)?;
        let document = window.document().ok_or(AppError::NoDocument)?;

        let capability =
            Capability::from_probe(js::has_property(&document, "startViewTransition"));
        let preferences =
            PreferenceStore::new(Box::new(LocalStorageBackend::new(window.clone())));

        let sink = EventSink::default();
        let surface =
            WebSurface::new(window.clone(), document.clone(), config.clone(), sink.clone());
        let controller = Controller::new(surface, preferences, capability, &config)?;
        let ingress = Rc::new(Ingress::new(controller));
        sink.bind(&ingress);

        let listeners = listeners::install(&window, &document, &config, &sink);
        ingress.start()?;
        let badges = perf::observe(&window, &document, &config);

        tracing::info!(?capability, badges = badges.len(), "Velvet VT mounted");
        Ok(Self {
            ingress,
            window,
            _listeners: listeners,
            _badges: badges,
        })
    }

    fn send(&self, event: AppEvent) -> Result<Dispatch, AppError> {
        Ok(self.ingress.send(event)?)
    }
}
