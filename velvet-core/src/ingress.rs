//! Single-threaded event ingress.
//!
//! Platform callbacks can fire while the controller is still handling an
//! earlier event (a transition callback invoked synchronously, a focus change
//! triggering a listener). Those events are queued and dispatched in arrival
//! order once the running dispatch returns.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;

use crate::controller::Controller;
use crate::error::VelvetResult;
use crate::event::{AppEvent, Dispatch};
use crate::platform::Platform;

/// Shared entry point for every platform event.
#[derive(Debug)]
pub struct Ingress<P> {
    controller: RefCell<Controller<P>>,
    backlog: RefCell<VecDeque<AppEvent>>,
}

impl<P: Platform> Ingress<P> {
    /// Wrap a controller.
    #[must_use]
    pub fn new(controller: Controller<P>) -> Self {
        Self {
            controller: RefCell::new(controller),
            backlog: RefCell::new(VecDeque::new()),
        }
    }

    /// Dispatch `event`, or queue it if a dispatch is already running.
    ///
    /// A queued event reports [`Dispatch::Continue`]; its errors are logged
    /// when it is eventually handled. The caller's chance to cancel the
    /// default action is gone by then, so a re-entrant `KeyPressed` that the
    /// focus trap handles still moves focus but cannot suppress the
    /// platform's own Tab handling.
    ///
    /// # Errors
    ///
    /// Returns the error of `event` itself when it is dispatched directly.
    pub fn send(&self, event: AppEvent) -> VelvetResult<Dispatch> {
        let Ok(mut controller) = self.controller.try_borrow_mut() else {
            tracing::debug!(?event, "Dispatch in progress, queueing event");
            self.backlog.borrow_mut().push_back(event);
            return Ok(Dispatch::Continue);
        };

        let result = controller.dispatch(event);
        loop {
            let next = self.backlog.borrow_mut().pop_front();
            let Some(next) = next else {
                break;
            };
            if let Err(err) = controller.dispatch(next) {
                tracing::error!("Queued event failed: {err}");
            }
        }
        result
    }

    /// Run the initial render.
    ///
    /// # Errors
    ///
    /// Propagates document mutation failures.
    pub fn start(&self) -> VelvetResult<()> {
        self.controller.borrow_mut().start()?;
        Ok(())
    }

    /// Borrow the controller for inspection.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a dispatch.
    pub fn controller(&self) -> Ref<'_, Controller<P>> {
        self.controller.borrow()
    }

    /// Mutably borrow the controller outside of a dispatch.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a dispatch.
    pub fn controller_mut(&self) -> RefMut<'_, Controller<P>> {
        self.controller.borrow_mut()
    }

    /// Events waiting for the running dispatch to finish.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.backlog.borrow().len()
    }
}
