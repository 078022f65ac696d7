//! Page configuration.
//!
//! Every field has a default matching the stock markup, so a host page only
//! passes the fields it changes:
//!
//! ```
//! use velvet_core::VelvetConfig;
//!
//! let config = VelvetConfig::from_json(r#"{"stage_id": "main", "warm_limit": 4}"#).unwrap();
//! assert_eq!(config.stage_id, "main");
//! assert_eq!(config.modal_id, "vt-modal");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::badge::Thresholds;
use crate::error::{RouteError, VelvetResult};
use crate::preference::MOTION_KEY;
use crate::routes::{RouteTable, DEFAULT_PATH};
use crate::warm::DEFAULT_WARM_LIMIT;

/// Focusable descendants considered by the modal focus trap.
pub const FOCUSABLE_SELECTOR: &str =
    "button, [href], input, textarea, select, [tabindex]:not([tabindex=\"-1\"])";

/// Element ids, selectors, storage key, routes and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelvetConfig {
    /// Content region id.
    pub stage_id: String,
    /// Navigation links whose active marker is maintained.
    pub nav_link_selector: String,
    /// Links whose activation is routed.
    pub link_selector: String,
    /// Class toggled on the active nav link.
    pub active_class: String,
    /// Motion toggle button id.
    pub motion_toggle_id: String,
    /// Label element inside the motion toggle.
    pub motion_label_selector: String,
    /// Class set on the document root while motion is off.
    pub motion_off_class: String,
    /// Modal id.
    pub modal_id: String,
    /// Initial-focus element inside the modal.
    pub modal_sheet_selector: String,
    /// Button that opens the modal.
    pub open_modal_id: String,
    /// Button that closes the modal.
    pub close_modal_id: String,
    /// Click targets inside the modal that close it.
    pub close_target_selector: String,
    /// Focusable descendants for the focus trap.
    pub focusable_selector: String,
    /// Layout-shift badge id.
    pub cls_badge_id: String,
    /// Interaction-latency badge id.
    pub inp_badge_id: String,
    /// Storage key of the motion preference.
    pub storage_key: String,
    /// Path rendered for empty or unknown hashes.
    pub default_path: String,
    /// Route path to template id.
    pub routes: BTreeMap<String, String>,
    /// Maximum number of template images to warm.
    pub warm_limit: usize,
    /// Idle-callback timeout before warming, in ms.
    pub idle_timeout_ms: u32,
    /// Warming delay where idle callbacks are unavailable, in ms.
    pub warm_fallback_ms: u32,
    /// Minimum event duration reported to the latency badge, in ms.
    pub inp_duration_threshold_ms: u32,
    /// Layout-shift rating thresholds.
    pub cls_thresholds: Thresholds,
    /// Interaction-latency rating thresholds (ms).
    pub inp_thresholds: Thresholds,
}

impl VelvetConfig {
    /// Parse a JSON object; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VelvetError::Config`] on malformed JSON or wrongly
    /// typed fields.
    pub fn from_json(json: &str) -> VelvetResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the route table.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is malformed or the default path is missing.
    pub fn route_table(&self) -> Result<RouteTable, RouteError> {
        RouteTable::new(
            self.routes.iter().map(|(path, template)| (path, template.clone())),
            &self.default_path,
        )
    }
}

impl Default for VelvetConfig {
    fn default() -> Self {
        let routes = [
            ("/home", "tpl-home"),
            ("/work", "tpl-work"),
            ("/about", "tpl-about"),
            ("/contact", "tpl-contact"),
        ]
        .into_iter()
        .map(|(path, template)| (path.to_string(), template.to_string()))
        .collect();

        Self {
            stage_id: "stage".into(),
            nav_link_selector: ".nav a".into(),
            link_selector: "a[data-link]".into(),
            active_class: "is-active".into(),
            motion_toggle_id: "motion-toggle".into(),
            motion_label_selector: ".label".into(),
            motion_off_class: "motion-off".into(),
            modal_id: "vt-modal".into(),
            modal_sheet_selector: ".modal__sheet".into(),
            open_modal_id: "open-modal".into(),
            close_modal_id: "close-modal".into(),
            close_target_selector: "[data-close]".into(),
            focusable_selector: FOCUSABLE_SELECTOR.into(),
            cls_badge_id: "badge-cls".into(),
            inp_badge_id: "badge-inp".into(),
            storage_key: MOTION_KEY.into(),
            default_path: DEFAULT_PATH.into(),
            routes,
            warm_limit: DEFAULT_WARM_LIMIT,
            idle_timeout_ms: 1500,
            warm_fallback_ms: 1000,
            inp_duration_threshold_ms: 16,
            cls_thresholds: Thresholds::LAYOUT_SHIFT,
            inp_thresholds: Thresholds::INTERACTION,
        }
    }
}
