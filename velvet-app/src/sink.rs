//! Route browser callbacks back into the shared ingress.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use velvet_core::{AppEvent, Dispatch, Ingress};

use crate::surface::WebSurface;

/// Cloneable sender held by listeners, timers and the surface itself.
///
/// Holds a weak reference: once the app is dropped, late callbacks are
/// ignored.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventSink {
    ingress: Rc<RefCell<Weak<Ingress<WebSurface>>>>,
}

impl EventSink {
    /// Point every clone at `ingress`.
    pub(crate) fn bind(&self, ingress: &Rc<Ingress<WebSurface>>) {
        *self.ingress.borrow_mut() = Rc::downgrade(ingress);
    }

    /// Deliver an event whose default action does not matter.
    pub(crate) fn post(&self, event: AppEvent) {
        let _ = self.send(event);
    }

    /// Deliver `event`. Errors have no caller to return to and are logged.
    pub(crate) fn send(&self, event: AppEvent) -> Dispatch {
        let Some(ingress) = self.ingress.borrow().upgrade() else {
            tracing::debug!(?event, "App dropped, event ignored");
            return Dispatch::Continue;
        };
        match ingress.send(event) {
            Ok(dispatch) => dispatch,
            Err(err) => {
                tracing::error!("Event handling failed: {err}");
                Dispatch::Continue
            }
        }
    }
}
