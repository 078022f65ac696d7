//! Platform boundary.
//!
//! The core never touches a DOM directly. Each concern the router and modal
//! controller need from the page is a small trait; a browser implementation
//! lives in `velvet-app`, and tests use an in-memory document.

use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;
use crate::gate::TransitionTicket;
use crate::routes::TemplateId;

/// Non-owning reference to a focusable element.
///
/// The platform resolves a handle when it is used. A handle whose element has
/// since been removed simply fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FocusHandle(u64);

impl FocusHandle {
    /// Wrap a platform-assigned identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The platform-assigned identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Read and write the location fragment.
pub trait Location {
    /// Current fragment including the leading `#`, or empty.
    fn hash(&self) -> String;

    /// Navigate to `hash`. The platform reports the change as a hash-change event.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written.
    fn set_hash(&mut self, hash: &str) -> Result<(), SurfaceError>;

    /// Replace the current fragment without producing a hash-change event.
    ///
    /// # Errors
    ///
    /// Returns an error if the history entry cannot be replaced.
    fn replace_hash(&mut self, hash: &str) -> Result<(), SurfaceError>;
}

/// The content region and navigation links.
pub trait Stage {
    /// Whether a template with this id exists in the document.
    fn has_template(&self, template: &TemplateId) -> bool;

    /// Replace the region's children with a fresh clone of `template`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::ElementNotFound`] if the template or region is
    /// gone, or another error if the DOM rejects the insertion.
    fn mount(&mut self, template: &TemplateId) -> Result<(), SurfaceError>;

    /// Set the region's busy flag (`aria-busy`).
    fn set_busy(&mut self, busy: bool);

    /// Focus the region without scrolling.
    fn focus_stage(&mut self);

    /// Targets (`href`) of the navigation links, in document order.
    fn nav_links(&self) -> Vec<String>;

    /// Toggle the active marker on the link at `index`.
    fn set_link_active(&mut self, index: usize, active: bool);
}

/// The modal dialog.
pub trait ModalSurface {
    /// Whether the modal element exists.
    fn has_modal(&self) -> bool;

    /// Reveal or hide the modal.
    ///
    /// # Errors
    ///
    /// Returns an error if the modal cannot be updated.
    fn set_modal_visible(&mut self, visible: bool) -> Result<(), SurfaceError>;

    /// Move focus to the modal's initial-focus element.
    fn focus_modal_sheet(&mut self);

    /// Focusable descendants of the modal, in tab order.
    fn modal_focusables(&mut self) -> Vec<FocusHandle>;
}

/// Focus lookup and restoration.
pub trait FocusSurface {
    /// Handle for the currently focused element, if any.
    fn active_element(&mut self) -> Option<FocusHandle>;

    /// Focus the element behind `handle` without scrolling.
    ///
    /// Returns `false` when the element no longer exists or cannot take focus.
    fn focus(&mut self, handle: FocusHandle) -> bool;

    /// Tell the platform a handle is no longer referenced by the core.
    ///
    /// Every handle returned by [`FocusSurface::active_element`] or
    /// [`ModalSurface::modal_focusables`] is released exactly once.
    fn release(&mut self, _handle: FocusHandle) {}
}

/// The motion toggle control.
pub trait MotionSurface {
    /// Reflect the motion preference in the toggle and on the document root.
    fn render_motion(&mut self, enabled: bool);
}

/// The platform's animated-transition primitive.
pub trait TransitionHost {
    /// Start a transition and report `ticket` back once its update phase runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition could not be started.
    fn start_transition(&mut self, ticket: TransitionTicket) -> Result<(), SurfaceError>;
}

/// Deferred callback scheduling.
pub trait Scheduler {
    /// Request one animation-frame event.
    fn request_frame(&mut self);

    /// Request one idle event, delivered within `timeout_ms` where idle
    /// callbacks exist, or after `fallback_ms` otherwise.
    fn request_idle(&mut self, timeout_ms: u32, fallback_ms: u32);
}

/// Image references in templates and image preloading.
pub trait ImageSurface {
    /// `src` of every image inside every template, in document order.
    fn template_image_sources(&self) -> Vec<String>;

    /// Start a non-blocking, async-decoded load of `url`.
    fn warm_image(&mut self, url: &str);
}

/// Everything the controller needs from the page.
pub trait Platform:
    Location
    + Stage
    + ModalSurface
    + FocusSurface
    + MotionSurface
    + TransitionHost
    + Scheduler
    + ImageSurface
{
}

impl<T> Platform for T where
    T: Location
        + Stage
        + ModalSurface
        + FocusSurface
        + MotionSurface
        + TransitionHost
        + Scheduler
        + ImageSurface
{
}
