//! Browser implementation of the core platform traits.

use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use velvet_core::{
    AppEvent, FocusHandle, FocusSurface, ImageSurface, Location, ModalSurface, MotionSurface,
    Scheduler, Stage, SurfaceError, TemplateId, TransitionHost, TransitionTicket, VelvetConfig,
};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlTemplateElement, Window};

use crate::focus::FocusRegistry;
use crate::js;
use crate::sink::EventSink;

/// The live page.
///
/// Elements are looked up by id on each use, so a region removed by page
/// scripts degrades to a no-op instead of a stale reference.
pub(crate) struct WebSurface {
    window: Window,
    document: Document,
    config: VelvetConfig,
    sink: EventSink,
    focus: FocusRegistry<Element>,
    frame: Option<AnimationFrame>,
}

impl WebSurface {
    pub(crate) fn new(
        window: Window,
        document: Document,
        config: VelvetConfig,
        sink: EventSink,
    ) -> Self {
        Self {
            window,
            document,
            config,
            sink,
            focus: FocusRegistry::default(),
            frame: None,
        }
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn stage(&self) -> Option<HtmlElement> {
        self.by_id(&self.config.stage_id)?.dyn_into::<HtmlElement>().ok()
    }

    fn modal(&self) -> Option<HtmlElement> {
        self.by_id(&self.config.modal_id)?.dyn_into::<HtmlElement>().ok()
    }

    fn template(&self, template: &TemplateId) -> Option<HtmlTemplateElement> {
        self.by_id(template.as_str())?
            .dyn_into::<HtmlTemplateElement>()
            .ok()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => js::elements(&list).collect(),
            Err(err) => {
                tracing::debug!("Bad selector {selector:?}: {}", js::describe(&err));
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for WebSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSurface")
            .field("config", &self.config)
            .field("focus", &self.focus)
            .field("frame_pending", &self.frame.is_some())
            .finish_non_exhaustive()
    }
}

impl Location for WebSurface {
    fn hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn set_hash(&mut self, hash: &str) -> Result<(), SurfaceError> {
        self.window
            .location()
            .set_hash(hash)
            .map_err(|err| SurfaceError::Location(js::describe(&err)))
    }

    fn replace_hash(&mut self, hash: &str) -> Result<(), SurfaceError> {
        let history = self
            .window
            .history()
            .map_err(|err| SurfaceError::Location(js::describe(&err)))?;
        history
            .replace_state_with_url(&JsValue::NULL, "", Some(hash))
            .map_err(|err| SurfaceError::Location(js::describe(&err)))
    }
}

impl Stage for WebSurface {
    fn has_template(&self, template: &TemplateId) -> bool {
        self.template(template).is_some()
    }

    fn mount(&mut self, template: &TemplateId) -> Result<(), SurfaceError> {
        let stage = self
            .stage()
            .ok_or_else(|| SurfaceError::ElementNotFound(self.config.stage_id.clone()))?;
        let source = self
            .template(template)
            .ok_or_else(|| SurfaceError::ElementNotFound(template.to_string()))?;

        let fragment = source
            .content()
            .clone_node_with_deep(true)
            .map_err(|err| SurfaceError::Mount(js::describe(&err)))?;
        stage.set_inner_html("");
        stage
            .append_child(&fragment)
            .map_err(|err| SurfaceError::Mount(js::describe(&err)))?;
        Ok(())
    }

    fn set_busy(&mut self, busy: bool) {
        if let Some(stage) = self.stage() {
            let _ = stage.set_attribute("aria-busy", if busy { "true" } else { "false" });
        }
    }

    fn focus_stage(&mut self) {
        if let Some(stage) = self.stage() {
            js::focus_without_scroll(&stage);
        }
    }

    fn nav_links(&self) -> Vec<String> {
        self.query_all(&self.config.nav_link_selector)
            .iter()
            .map(|link| link.get_attribute("href").unwrap_or_default())
            .collect()
    }

    fn set_link_active(&mut self, index: usize, active: bool) {
        let links = self.query_all(&self.config.nav_link_selector);
        if let Some(link) = links.get(index) {
            let _ = link
                .class_list()
                .toggle_with_force(&self.config.active_class, active);
        }
    }
}

impl ModalSurface for WebSurface {
    fn has_modal(&self) -> bool {
        self.modal().is_some()
    }

    fn set_modal_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
        let modal = self
            .modal()
            .ok_or_else(|| SurfaceError::ElementNotFound(self.config.modal_id.clone()))?;
        modal.set_hidden(!visible);
        Ok(())
    }

    fn focus_modal_sheet(&mut self) {
        let sheet = self
            .modal()
            .and_then(|modal| modal.query_selector(&self.config.modal_sheet_selector).ok())
            .flatten();
        if let Some(sheet) = sheet {
            js::focus_without_scroll(&sheet);
        }
    }

    fn modal_focusables(&mut self) -> Vec<FocusHandle> {
        let Some(modal) = self.modal() else {
            return Vec::new();
        };
        let Ok(list) = modal.query_selector_all(&self.config.focusable_selector) else {
            return Vec::new();
        };
        js::elements(&list)
            .map(|element| self.focus.register(element))
            .collect()
    }
}

impl FocusSurface for WebSurface {
    fn active_element(&mut self) -> Option<FocusHandle> {
        let active = self.document.active_element()?;
        Some(self.focus.register(active))
    }

    fn focus(&mut self, handle: FocusHandle) -> bool {
        match self.focus.resolve(handle) {
            Some(element) if element.is_connected() => js::focus_without_scroll(element),
            _ => false,
        }
    }

    fn release(&mut self, handle: FocusHandle) {
        self.focus.release(handle);
        tracing::trace!(live = self.focus.len(), "Focus handle released");
    }
}

impl MotionSurface for WebSurface {
    fn render_motion(&mut self, enabled: bool) {
        let Some(toggle) = self.by_id(&self.config.motion_toggle_id) else {
            tracing::debug!("Motion toggle missing, nothing to render");
            return;
        };
        let _ = toggle.set_attribute("aria-pressed", if enabled { "true" } else { "false" });
        if let Ok(Some(label)) = toggle.query_selector(&self.config.motion_label_selector) {
            let text = format!("Motion: {}", if enabled { "On" } else { "Off" });
            label.set_text_content(Some(&text));
        }
        if let Some(root) = self.document.document_element() {
            let _ = root
                .class_list()
                .toggle_with_force(&self.config.motion_off_class, !enabled);
        }
    }
}

impl TransitionHost for WebSurface {
    fn start_transition(&mut self, ticket: TransitionTicket) -> Result<(), SurfaceError> {
        let start = js::method(&self.document, "startViewTransition")
            .ok_or_else(|| SurfaceError::Dom("startViewTransition unavailable".into()))?;
        let sink = self.sink.clone();
        let update = Closure::once_into_js(move || {
            sink.post(AppEvent::TransitionReady(ticket));
        });
        start
            .call1(&self.document, &update)
            .map(drop)
            .map_err(|err| SurfaceError::Dom(js::describe(&err)))
    }
}

impl Scheduler for WebSurface {
    fn request_frame(&mut self) {
        let sink = self.sink.clone();
        self.frame = Some(request_animation_frame(move |_| {
            sink.post(AppEvent::AnimationFrame);
        }));
    }

    fn request_idle(&mut self, timeout_ms: u32, fallback_ms: u32) {
        if let Some(request) = js::method(&self.window, "requestIdleCallback") {
            let sink = self.sink.clone();
            let callback = Closure::once_into_js(move || {
                sink.post(AppEvent::Idle);
            });
            let options = js::object(&[("timeout", JsValue::from(timeout_ms))]);
            if request.call2(&self.window, &callback, &options).is_ok() {
                return;
            }
        }
        tracing::debug!("requestIdleCallback unavailable, warming after {fallback_ms} ms");
        let sink = self.sink.clone();
        Timeout::new(fallback_ms, move || {
            sink.post(AppEvent::Idle);
        })
        .forget();
    }
}

impl ImageSurface for WebSurface {
    fn template_image_sources(&self) -> Vec<String> {
        self.query_all("template")
            .into_iter()
            .filter_map(|element| element.dyn_into::<HtmlTemplateElement>().ok())
            .filter_map(|template| template.content().query_selector_all("img[src]").ok())
            .flat_map(|list| {
                js::elements(&list)
                    .filter_map(|img| img.get_attribute("src"))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn warm_image(&mut self, url: &str) {
        match HtmlImageElement::new() {
            Ok(image) => {
                image.set_decoding("async");
                image.set_src(url);
            }
            Err(err) => tracing::debug!("Image warm-up skipped: {}", js::describe(&err)),
        }
    }
}
