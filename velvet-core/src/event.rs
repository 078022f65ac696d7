//! Events delivered to the controller.

use serde::{Deserialize, Serialize};

use crate::gate::TransitionTicket;

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    /// `Escape`.
    Escape,
    /// `Tab`.
    Tab,
    /// Anything else; passes through untouched.
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            _ => Self::Other,
        }
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    /// The key.
    pub key: Key,
    /// Whether Shift was held.
    pub shift: bool,
    /// Whether the event target is inside the modal.
    pub within_modal: bool,
}

impl KeyPress {
    /// A key press outside the modal.
    #[must_use]
    pub const fn new(key: Key, shift: bool) -> Self {
        Self {
            key,
            shift,
            within_modal: false,
        }
    }

    /// Mark the press as originating inside the modal.
    #[must_use]
    pub const fn in_modal(mut self) -> Self {
        self.within_modal = true;
        self
    }
}

/// All events the controller consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AppEvent {
    /// A routable link was activated.
    LinkActivated {
        /// The link's `href`, e.g. `#/work`.
        href: String,
        /// The link opted out of animation (`data-vt="off"`).
        no_animate: bool,
    },
    /// The location fragment changed.
    HashChanged {
        /// New fragment including `#`.
        hash: String,
    },
    /// A key was pressed.
    KeyPressed(KeyPress),
    /// The motion toggle was activated.
    ToggleMotion,
    /// The open-modal control was activated.
    OpenModal,
    /// The close control was activated.
    CloseModal,
    /// A click landed inside the modal.
    ModalClicked {
        /// The target is a designated close target (backdrop).
        close_target: bool,
    },
    /// The platform is running the update phase of a started transition.
    TransitionReady(TransitionTicket),
    /// Next animation frame.
    AnimationFrame,
    /// The platform is idle (or the idle fallback timer fired).
    Idle,
}

/// What the platform should do with the originating DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub enum Dispatch {
    /// Let the default action happen.
    #[default]
    Continue,
    /// Call `preventDefault()`.
    PreventDefault,
}

impl Dispatch {
    /// Whether the default action must be prevented.
    #[must_use]
    pub const fn prevents_default(self) -> bool {
        matches!(self, Self::PreventDefault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("Esc"), Key::Escape);
        assert_eq!(Key::from_name("Tab"), Key::Tab);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }

    #[test]
    fn event_json_shape() {
        let event = AppEvent::LinkActivated {
            href: "#/work".into(),
            no_animate: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "LinkActivated");
        assert_eq!(json["data"]["href"], "#/work");

        let parsed: AppEvent = serde_json::from_str(r#"{"type":"ToggleMotion"}"#).unwrap();
        assert_eq!(parsed, AppEvent::ToggleMotion);
    }
}
