//! Navigation and modal state.

use serde::{Deserialize, Serialize};

use crate::routes::RoutePath;

/// Open/closed state of the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalState {
    /// Hidden; no focus trap.
    #[default]
    Closed,
    /// Visible; focus trapped inside.
    Open,
}

/// Per-document navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Path currently rendered, once the first swap committed.
    pub current_path: Option<RoutePath>,
    /// Whether animated transitions are allowed.
    pub motion_enabled: bool,
}

impl NavigationState {
    /// State before the first render.
    #[must_use]
    pub fn new(motion_enabled: bool) -> Self {
        Self {
            current_path: None,
            motion_enabled,
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(true)
    }
}
