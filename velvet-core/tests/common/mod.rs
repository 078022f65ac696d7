//! In-memory document used by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use velvet_core::{
    AppEvent, Capability, Controller, Dispatch, FocusHandle, FocusSurface, ImageSurface, Ingress, Location,
    MemoryBackend, ModalSurface, MotionSurface, PreferenceStore, Scheduler, Stage, SurfaceError,
    TemplateId, TransitionHost, TransitionTicket, VelvetConfig,
};

/// One focusable element.
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub name: &'static str,
    pub connected: bool,
    pub in_modal: bool,
}

/// The stock page: four templates, four nav links, a modal with three
/// focusable controls and an open button outside it.
#[derive(Debug)]
pub struct FakeDocument {
    pub hash: String,
    pub hash_writes: Vec<String>,
    pub hash_replacements: Vec<String>,
    pending_hashchanges: VecDeque<String>,

    pub templates: BTreeMap<String, Vec<String>>,
    pub mounted: Option<String>,
    pub mount_count: usize,
    pub mount_error: Option<SurfaceError>,
    pub busy: bool,
    pub stage_focus_count: usize,
    pub links: Vec<String>,
    pub active: Vec<bool>,

    pub modal_present: bool,
    pub modal_visible: bool,
    pub modal_error: Option<SurfaceError>,
    pub sheet_focused: bool,
    pub elements: Vec<FakeElement>,
    pub focused: Option<FocusHandle>,
    pub released: Vec<FocusHandle>,

    pub motion_rendered: Vec<bool>,

    pub transitions_started: Vec<TransitionTicket>,
    pending_transitions: VecDeque<TransitionTicket>,
    pub fail_transitions: bool,
    /// Run transition updates synchronously through this ingress.
    pub sync_host: Option<Weak<Ingress<FakeDocument>>>,
    /// Sent through `sync_host` as soon as a transition starts.
    pub interleaved: Option<AppEvent>,
    pub interleaved_dispatches: Vec<Dispatch>,

    pub frame_requests: usize,
    frame_pending: bool,
    pub idle_requests: Vec<(u32, u32)>,
    pub warmed: Vec<String>,
}

impl FakeDocument {
    pub fn new() -> Self {
        let templates: BTreeMap<String, Vec<String>> = [
            ("tpl-home", vec!["img/hero.jpg", "img/avatar.png"]),
            ("tpl-work", vec!["img/w1.jpg", "img/w2.jpg", "img/hero.jpg"]),
            ("tpl-about", vec!["img/avatar.png"]),
            ("tpl-contact", vec![]),
        ]
        .into_iter()
        .map(|(id, images)| {
            (
                id.to_string(),
                images.into_iter().map(String::from).collect::<Vec<_>>(),
            )
        })
        .collect();
        let links: Vec<String> = ["#/home", "#/work", "#/about", "#/contact"]
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            hash: String::new(),
            hash_writes: Vec::new(),
            hash_replacements: Vec::new(),
            pending_hashchanges: VecDeque::new(),
            templates,
            mounted: None,
            mount_count: 0,
            mount_error: None,
            busy: false,
            stage_focus_count: 0,
            active: vec![false; links.len()],
            links,
            modal_present: true,
            modal_visible: false,
            modal_error: None,
            sheet_focused: false,
            elements: vec![
                element("open-modal", false),
                element("nav-work", false),
                element("modal-name", true),
                element("modal-submit", true),
                element("close-modal", true),
            ],
            focused: None,
            released: Vec::new(),
            motion_rendered: Vec::new(),
            transitions_started: Vec::new(),
            pending_transitions: VecDeque::new(),
            fail_transitions: false,
            sync_host: None,
            interleaved: None,
            interleaved_dispatches: Vec::new(),
            frame_requests: 0,
            frame_pending: false,
            idle_requests: Vec::new(),
            warmed: Vec::new(),
        }
    }

    pub fn with_hash(hash: &str) -> Self {
        let mut doc = Self::new();
        doc.hash = hash.to_string();
        doc
    }

    /// Handle of the element called `name`.
    pub fn handle(&self, name: &str) -> FocusHandle {
        let index = self
            .elements
            .iter()
            .position(|e| e.name == name)
            .unwrap_or_else(|| panic!("no element {name}"));
        FocusHandle::new(index as u64 + 1)
    }

    fn element_mut(&mut self, handle: FocusHandle) -> Option<&mut FakeElement> {
        let index = usize::try_from(handle.raw()).ok()?.checked_sub(1)?;
        self.elements.get_mut(index)
    }

    /// Simulate the user focusing `name`.
    pub fn focus_on(&mut self, name: &str) {
        self.focused = Some(self.handle(name));
        self.sheet_focused = false;
    }

    /// Remove `name` from the document.
    pub fn remove(&mut self, name: &str) {
        let handle = self.handle(name);
        if let Some(element) = self.element_mut(handle) {
            element.connected = false;
        }
        if self.focused == Some(handle) {
            self.focused = None;
        }
    }

    pub fn focused_name(&self) -> Option<&'static str> {
        let index = usize::try_from(self.focused?.raw()).ok()?.checked_sub(1)?;
        self.elements.get(index).map(|e| e.name)
    }

    pub fn active_links(&self) -> Vec<&str> {
        self.links
            .iter()
            .zip(&self.active)
            .filter(|(_, active)| **active)
            .map(|(link, _)| link.as_str())
            .collect()
    }

    pub fn take_transition(&mut self) -> Option<TransitionTicket> {
        self.pending_transitions.pop_front()
    }

    pub fn take_hashchange(&mut self) -> Option<String> {
        self.pending_hashchanges.pop_front()
    }

    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }
}

fn element(name: &'static str, in_modal: bool) -> FakeElement {
    FakeElement {
        name,
        connected: true,
        in_modal,
    }
}

impl Location for FakeDocument {
    fn hash(&self) -> String {
        self.hash.clone()
    }

    fn set_hash(&mut self, hash: &str) -> Result<(), SurfaceError> {
        self.hash_writes.push(hash.to_string());
        if self.hash != hash {
            self.hash = hash.to_string();
            self.pending_hashchanges.push_back(hash.to_string());
        }
        Ok(())
    }

    fn replace_hash(&mut self, hash: &str) -> Result<(), SurfaceError> {
        self.hash_replacements.push(hash.to_string());
        self.hash = hash.to_string();
        Ok(())
    }
}

impl Stage for FakeDocument {
    fn has_template(&self, template: &TemplateId) -> bool {
        self.templates.contains_key(template.as_str())
    }

    fn mount(&mut self, template: &TemplateId) -> Result<(), SurfaceError> {
        if let Some(err) = self.mount_error.clone() {
            return Err(err);
        }
        if !self.templates.contains_key(template.as_str()) {
            return Err(SurfaceError::ElementNotFound(template.to_string()));
        }
        self.mounted = Some(template.to_string());
        self.mount_count += 1;
        Ok(())
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn focus_stage(&mut self) {
        self.stage_focus_count += 1;
        self.focused = None;
    }

    fn nav_links(&self) -> Vec<String> {
        self.links.clone()
    }

    fn set_link_active(&mut self, index: usize, active: bool) {
        self.active[index] = active;
    }
}

impl ModalSurface for FakeDocument {
    fn has_modal(&self) -> bool {
        self.modal_present
    }

    fn set_modal_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
        if let Some(err) = self.modal_error.clone() {
            return Err(err);
        }
        self.modal_visible = visible;
        Ok(())
    }

    fn focus_modal_sheet(&mut self) {
        self.focused = None;
        self.sheet_focused = true;
    }

    fn modal_focusables(&mut self) -> Vec<FocusHandle> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.in_modal && e.connected)
            .map(|(i, _)| FocusHandle::new(i as u64 + 1))
            .collect()
    }
}

impl FocusSurface for FakeDocument {
    fn active_element(&mut self) -> Option<FocusHandle> {
        self.focused
    }

    fn focus(&mut self, handle: FocusHandle) -> bool {
        match self.element_mut(handle) {
            Some(element) if element.connected => {
                self.focused = Some(handle);
                self.sheet_focused = false;
                true
            }
            _ => false,
        }
    }

    fn release(&mut self, handle: FocusHandle) {
        self.released.push(handle);
    }
}

impl MotionSurface for FakeDocument {
    fn render_motion(&mut self, enabled: bool) {
        self.motion_rendered.push(enabled);
    }
}

impl TransitionHost for FakeDocument {
    fn start_transition(&mut self, ticket: TransitionTicket) -> Result<(), SurfaceError> {
        if self.fail_transitions {
            return Err(SurfaceError::Dom("InvalidStateError".into()));
        }
        self.transitions_started.push(ticket);
        match self.sync_host.as_ref().and_then(Weak::upgrade) {
            Some(ingress) => {
                if let Some(event) = self.interleaved.take() {
                    if let Ok(dispatch) = ingress.send(event) {
                        self.interleaved_dispatches.push(dispatch);
                    }
                }
                let _ = ingress.send(AppEvent::TransitionReady(ticket));
            }
            None => self.pending_transitions.push_back(ticket),
        }
        Ok(())
    }
}

impl Scheduler for FakeDocument {
    fn request_frame(&mut self) {
        self.frame_requests += 1;
        self.frame_pending = true;
    }

    fn request_idle(&mut self, timeout_ms: u32, fallback_ms: u32) {
        self.idle_requests.push((timeout_ms, fallback_ms));
    }
}

impl ImageSurface for FakeDocument {
    fn template_image_sources(&self) -> Vec<String> {
        self.templates.values().flatten().cloned().collect()
    }

    fn warm_image(&mut self, url: &str) {
        self.warmed.push(url.to_string());
    }
}

/// Shared storage that outlives a controller, like localStorage across reloads.
pub type SharedStorage = Rc<RefCell<MemoryBackend>>;

pub fn shared_storage() -> SharedStorage {
    Rc::new(RefCell::new(MemoryBackend::new()))
}

/// Controller over `doc` with the given capability and a fresh store.
pub fn controller(doc: FakeDocument, capability: Capability) -> Controller<FakeDocument> {
    controller_with_storage(doc, capability, &shared_storage())
}

pub fn controller_with_storage(
    doc: FakeDocument,
    capability: Capability,
    storage: &SharedStorage,
) -> Controller<FakeDocument> {
    let preferences = PreferenceStore::new(Box::new(Rc::clone(storage)));
    Controller::new(doc, preferences, capability, &VelvetConfig::default())
        .expect("default config is valid")
}

/// Controller that already rendered its first page.
pub fn started(doc: FakeDocument, capability: Capability) -> Controller<FakeDocument> {
    let mut controller = controller(doc, capability);
    controller.start().expect("initial render");
    run_until_idle(&mut controller);
    controller
}

/// Deliver transition callbacks, hash changes and frames until none remain,
/// the way the browser event loop would.
pub fn run_until_idle(controller: &mut Controller<FakeDocument>) {
    loop {
        let doc = controller.platform_mut();
        let event = if let Some(ticket) = doc.take_transition() {
            AppEvent::TransitionReady(ticket)
        } else if let Some(hash) = doc.take_hashchange() {
            AppEvent::HashChanged { hash }
        } else if doc.take_frame() {
            AppEvent::AnimationFrame
        } else {
            break;
        };
        let _dispatch = controller.dispatch(event).expect("event loop dispatch");
    }
}
