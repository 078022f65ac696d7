//! The controller: one owner for navigation, modal and preference state.
//!
//! All page behavior flows through [`Controller::dispatch`]. Each operation
//! has a prepare phase that runs when the event arrives and a commit phase
//! that the transition gate either runs immediately or releases later via
//! [`AppEvent::TransitionReady`].

use std::collections::VecDeque;

use crate::error::{SurfaceError, VelvetResult};
use crate::event::{AppEvent, Dispatch, Key, KeyPress};
use crate::gate::{Capability, GateOptions, Gated, Mutation, TransitionGate, TransitionTicket};
use crate::modal::ModalController;
use crate::platform::{FocusHandle, Platform};
use crate::preference::PreferenceStore;
use crate::router::{Router, Swap};
use crate::routes::{path_from_hash, RoutePath};
use crate::state::{ModalState, NavigationState};
use crate::warm::ImageWarmer;
use crate::VelvetConfig;

/// Work deferred to the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// Focus the content region and clear its busy flag.
    SettleStage,
}

/// Owns all page state and drives the platform.
pub struct Controller<P> {
    platform: P,
    nav: NavigationState,
    router: Router,
    modal: ModalController,
    gate: TransitionGate,
    preferences: PreferenceStore,
    storage_key: String,
    warmer: ImageWarmer,
    idle_timeout_ms: u32,
    warm_fallback_ms: u32,
    frames: VecDeque<FrameTask>,
}

impl<P: Platform> Controller<P> {
    /// Build a controller. The motion preference is read once here.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured routes are invalid.
    pub fn new(
        platform: P,
        preferences: PreferenceStore,
        capability: Capability,
        config: &VelvetConfig,
    ) -> VelvetResult<Self> {
        let router = Router::new(config.route_table()?);
        let motion_enabled = preferences.get(&config.storage_key);
        tracing::debug!(?capability, motion_enabled, "Controller created");

        Ok(Self {
            platform,
            nav: NavigationState::new(motion_enabled),
            router,
            modal: ModalController::new(),
            gate: TransitionGate::new(capability),
            preferences,
            storage_key: config.storage_key.clone(),
            warmer: ImageWarmer::new(config.warm_limit),
            idle_timeout_ms: config.idle_timeout_ms,
            warm_fallback_ms: config.warm_fallback_ms,
            frames: VecDeque::new(),
        })
    }

    /// Initial render: reflect the motion preference, default the hash, and
    /// render without animation. Schedules image warming.
    ///
    /// # Errors
    ///
    /// Propagates document mutation failures.
    pub fn start(&mut self) -> Result<(), SurfaceError> {
        self.platform.render_motion(self.nav.motion_enabled);

        if self.platform.hash().is_empty() {
            let hash = self.router.table().default_path().to_hash();
            self.platform.replace_hash(&hash)?;
        }
        let hash = self.platform.hash();
        self.navigate(path_from_hash(&hash), GateOptions::BYPASS)?;

        self.platform
            .request_idle(self.idle_timeout_ms, self.warm_fallback_ms);
        Ok(())
    }

    /// Route one event.
    ///
    /// # Errors
    ///
    /// Propagates document mutation failures from whichever phase the event
    /// triggers.
    pub fn dispatch(&mut self, event: AppEvent) -> VelvetResult<Dispatch> {
        let dispatch = match event {
            AppEvent::LinkActivated { href, no_animate } => {
                self.activate_link(&href, no_animate)?
            }
            AppEvent::HashChanged { hash } => {
                self.hash_changed(&hash)?;
                Dispatch::Continue
            }
            AppEvent::KeyPressed(key) => self.key_pressed(key)?,
            AppEvent::ToggleMotion => {
                self.toggle_motion();
                Dispatch::Continue
            }
            AppEvent::OpenModal => {
                self.open_modal()?;
                Dispatch::Continue
            }
            AppEvent::CloseModal | AppEvent::ModalClicked { close_target: true } => {
                self.close_modal()?;
                Dispatch::Continue
            }
            AppEvent::ModalClicked { close_target: false } => Dispatch::Continue,
            AppEvent::TransitionReady(ticket) => {
                self.transition_ready(ticket)?;
                Dispatch::Continue
            }
            AppEvent::AnimationFrame => {
                self.animation_frame();
                Dispatch::Continue
            }
            AppEvent::Idle => {
                self.warmer.run(&mut self.platform);
                Dispatch::Continue
            }
        };
        Ok(dispatch)
    }

    /// Navigate to `path` (unknown paths render the default).
    ///
    /// # Errors
    ///
    /// Propagates failures of the swap when it runs synchronously.
    pub fn navigate(&mut self, path: &str, options: GateOptions) -> Result<(), SurfaceError> {
        let in_flight = self.gate.has_parked_swap();
        match self.router.prepare(path, in_flight, &mut self.platform) {
            Some(swap) => self.run_gated(swap, options),
            None => Ok(()),
        }
    }

    /// Render the path in `hash`. Always gated, whatever caused the change.
    ///
    /// # Errors
    ///
    /// Propagates failures of the swap when it runs synchronously.
    pub fn hash_changed(&mut self, hash: &str) -> Result<(), SurfaceError> {
        self.navigate(path_from_hash(hash), GateOptions::ANIMATE)
    }

    /// Handle activation of a routable link.
    ///
    /// The link is highlighted immediately. When the navigation will be
    /// animated, the default action is prevented and the hash is written
    /// inside a transition; otherwise the platform navigates by itself.
    ///
    /// # Errors
    ///
    /// Propagates failures writing the hash when it runs synchronously.
    pub fn activate_link(&mut self, href: &str, no_animate: bool) -> Result<Dispatch, SurfaceError> {
        Router::highlight(&mut self.platform, Some(href));

        let options = GateOptions { bypass: no_animate };
        if !self.gate.should_animate(self.nav.motion_enabled, options) {
            return Ok(Dispatch::Continue);
        }
        self.run_gated(
            Mutation::ChangeLocation {
                hash: href.to_string(),
            },
            options,
        )?;
        Ok(Dispatch::PreventDefault)
    }

    /// Flip the motion preference.
    pub fn toggle_motion(&mut self) {
        self.set_motion(!self.nav.motion_enabled);
    }

    /// Set and persist the motion preference, then update the toggle.
    pub fn set_motion(&mut self, enabled: bool) {
        self.nav.motion_enabled = enabled;
        self.preferences.set(&self.storage_key, enabled);
        self.platform.render_motion(enabled);
    }

    /// Open the modal. Redundant calls are ignored.
    ///
    /// # Errors
    ///
    /// Propagates failures revealing the modal when it runs synchronously.
    pub fn open_modal(&mut self) -> Result<(), SurfaceError> {
        if self.gate.is_parked(&Mutation::ShowModal) {
            return Ok(());
        }
        match self.modal.prepare_open(&mut self.platform) {
            Some(show) => self.run_gated(show, GateOptions::ANIMATE),
            None => Ok(()),
        }
    }

    /// Close the modal. A no-op when already closed.
    ///
    /// # Errors
    ///
    /// Propagates failures hiding the modal when it runs synchronously.
    pub fn close_modal(&mut self) -> Result<(), SurfaceError> {
        if self.gate.is_parked(&Mutation::HideModal) {
            return Ok(());
        }
        match self.modal.prepare_close() {
            Some(hide) => self.run_gated(hide, GateOptions::ANIMATE),
            None => Ok(()),
        }
    }

    /// Escape closes an open modal; Tab/Shift+Tab wrap inside it.
    ///
    /// # Errors
    ///
    /// Propagates failures hiding the modal.
    pub fn key_pressed(&mut self, key: KeyPress) -> Result<Dispatch, SurfaceError> {
        if key.key == Key::Escape && self.modal.is_open() {
            self.close_modal()?;
            return Ok(Dispatch::Continue);
        }
        if self.modal.cycle_focus(&key, &mut self.platform) {
            return Ok(Dispatch::PreventDefault);
        }
        Ok(Dispatch::Continue)
    }

    /// Commit the mutation parked under `ticket`. Unknown tickets are ignored.
    ///
    /// # Errors
    ///
    /// Propagates the mutation's failure.
    pub fn transition_ready(&mut self, ticket: TransitionTicket) -> Result<(), SurfaceError> {
        match self.gate.redeem(ticket) {
            Some(mutation) => self.apply(mutation),
            None => {
                tracing::debug!(ticket = ticket.raw(), "Ignoring unknown transition ticket");
                Ok(())
            }
        }
    }

    /// Run every frame task queued so far.
    pub fn animation_frame(&mut self) {
        while let Some(task) = self.frames.pop_front() {
            match task {
                FrameTask::SettleStage => {
                    self.platform.focus_stage();
                    self.platform.set_busy(false);
                }
            }
        }
    }

    /// Run a mutation now or inside a transition.
    ///
    /// # Errors
    ///
    /// Propagates the mutation's failure when it runs synchronously.
    pub fn run_gated(&mut self, mutation: Mutation, options: GateOptions) -> Result<(), SurfaceError> {
        match self
            .gate
            .submit(&mut self.platform, self.nav.motion_enabled, options, mutation)
        {
            Gated::Apply(mutation) => self.apply(mutation),
            Gated::Parked(_) => Ok(()),
        }
    }

    fn apply(&mut self, mutation: Mutation) -> Result<(), SurfaceError> {
        match mutation {
            Mutation::SwapStage { path, template } => {
                if self.router.commit(&path, &template, &mut self.platform)? == Swap::Mounted {
                    self.schedule_frame(FrameTask::SettleStage);
                    self.nav.current_path = Some(path);
                }
                Ok(())
            }
            Mutation::ChangeLocation { hash } => self.platform.set_hash(&hash),
            Mutation::ShowModal => self.modal.commit_show(&mut self.platform),
            Mutation::HideModal => self.modal.commit_hide(&mut self.platform),
        }
    }

    fn schedule_frame(&mut self, task: FrameTask) {
        if self.frames.is_empty() {
            self.platform.request_frame();
        }
        self.frames.push_back(task);
    }

    /// The platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The platform, mutably.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Path currently rendered.
    #[must_use]
    pub fn current_path(&self) -> Option<&RoutePath> {
        self.nav.current_path.as_ref()
    }

    /// Whether transitions are allowed by preference.
    #[must_use]
    pub fn motion_enabled(&self) -> bool {
        self.nav.motion_enabled
    }

    /// Navigation state snapshot.
    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    /// Modal state.
    #[must_use]
    pub fn modal_state(&self) -> ModalState {
        self.modal.state()
    }

    /// Element to restore focus to when the modal closes.
    #[must_use]
    pub fn last_focused(&self) -> Option<FocusHandle> {
        self.modal.last_focused()
    }

    /// Whether the modal focus trap is installed.
    #[must_use]
    pub fn is_trapping_focus(&self) -> bool {
        self.modal.is_trapping()
    }

    /// Probed transition capability.
    #[must_use]
    pub fn capability(&self) -> Capability {
        self.gate.capability()
    }

    /// Mutations waiting for their transition to run.
    #[must_use]
    pub fn pending_transitions(&self) -> usize {
        self.gate.parked_count()
    }

    /// Frame tasks waiting for the next animation frame.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }
}

impl<P> std::fmt::Debug for Controller<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("nav", &self.nav)
            .field("modal", &self.modal)
            .field("gate", &self.gate)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
