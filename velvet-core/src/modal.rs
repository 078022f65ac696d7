//! Modal dialog lifecycle with focus capture, trapping and restoration.

use crate::error::SurfaceError;
use crate::event::{Key, KeyPress};
use crate::gate::Mutation;
use crate::platform::{FocusHandle, FocusSurface, ModalSurface};
use crate::state::ModalState;

/// First and last focusable elements of the open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTrap {
    bounds: Option<(FocusHandle, FocusHandle)>,
}

impl FocusTrap {
    /// Build a trap over `focusables` (tab order).
    #[must_use]
    pub fn new(focusables: &[FocusHandle]) -> Self {
        let bounds = match (focusables.first(), focusables.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        };
        Self { bounds }
    }

    /// Where Tab (or Shift+Tab) must send focus instead of the default, if anywhere.
    #[must_use]
    pub fn wrap_target(&self, active: Option<FocusHandle>, shift: bool) -> Option<FocusHandle> {
        let (first, last) = self.bounds?;
        let active = active?;
        if shift && active == first {
            Some(last)
        } else if !shift && active == last {
            Some(first)
        } else {
            None
        }
    }

    fn handles(&self) -> impl Iterator<Item = FocusHandle> {
        self.bounds.into_iter().flat_map(|(first, last)| {
            let last = (last != first).then_some(last);
            std::iter::once(first).chain(last)
        })
    }
}

/// Open/close state machine for the modal.
#[derive(Debug, Default)]
pub struct ModalController {
    state: ModalState,
    last_focused: Option<FocusHandle>,
    trap: Option<FocusTrap>,
}

impl ModalController {
    /// A closed modal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ModalState {
        self.state
    }

    /// Whether the modal is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    /// Element focused before the modal opened.
    #[must_use]
    pub fn last_focused(&self) -> Option<FocusHandle> {
        self.last_focused
    }

    /// Whether the focus trap is installed.
    #[must_use]
    pub fn is_trapping(&self) -> bool {
        self.trap.is_some()
    }

    /// Capture the focused element and produce the show mutation.
    ///
    /// Returns `None` when the modal element is absent or already open.
    pub fn prepare_open<P>(&mut self, platform: &mut P) -> Option<Mutation>
    where
        P: ModalSurface + FocusSurface + ?Sized,
    {
        if !platform.has_modal() {
            tracing::debug!("Modal element missing, open ignored");
            return None;
        }
        if self.is_open() {
            return None;
        }
        let focused = platform.active_element();
        if let Some(previous) = std::mem::replace(&mut self.last_focused, focused) {
            platform.release(previous);
        }
        Some(Mutation::ShowModal)
    }

    /// Produce the hide mutation, or `None` when already closed.
    #[must_use]
    pub fn prepare_close(&self) -> Option<Mutation> {
        self.is_open().then_some(Mutation::HideModal)
    }

    /// Reveal the modal, focus its sheet and install the trap once.
    ///
    /// # Errors
    ///
    /// Propagates failures revealing the modal.
    pub fn commit_show<P>(&mut self, platform: &mut P) -> Result<(), SurfaceError>
    where
        P: ModalSurface + FocusSurface + ?Sized,
    {
        platform.set_modal_visible(true)?;
        platform.focus_modal_sheet();
        self.state = ModalState::Open;
        if self.trap.is_none() {
            let focusables = platform.modal_focusables();
            self.trap = Some(FocusTrap::new(&focusables));
            if let [_, middle @ .., _] = focusables.as_slice() {
                for handle in middle {
                    platform.release(*handle);
                }
            }
        }
        Ok(())
    }

    /// Hide the modal, drop the trap and restore focus.
    ///
    /// # Errors
    ///
    /// Propagates failures hiding the modal.
    pub fn commit_hide<P>(&mut self, platform: &mut P) -> Result<(), SurfaceError>
    where
        P: ModalSurface + FocusSurface + ?Sized,
    {
        if !self.is_open() {
            return Ok(());
        }
        platform.set_modal_visible(false)?;
        self.state = ModalState::Closed;
        if let Some(trap) = self.trap.take() {
            for handle in trap.handles() {
                platform.release(handle);
            }
        }
        if let Some(handle) = self.last_focused.take() {
            if !platform.focus(handle) {
                tracing::debug!("Previously focused element is gone, focus left in place");
            }
            platform.release(handle);
        }
        Ok(())
    }

    /// Wrap Tab/Shift+Tab at the modal's edges while the trap is installed.
    ///
    /// Returns `true` when focus was moved and the default must be prevented.
    pub fn cycle_focus<P>(&mut self, key: &KeyPress, platform: &mut P) -> bool
    where
        P: FocusSurface + ?Sized,
    {
        let Some(trap) = self.trap else {
            return false;
        };
        if key.key != Key::Tab || !key.within_modal {
            return false;
        }
        let active = platform.active_element();
        let target = trap.wrap_target(active, key.shift);
        if let Some(active) = active {
            platform.release(active);
        }
        target.is_some_and(|target| platform.focus(target))
    }
}
