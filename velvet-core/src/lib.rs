//! # Velvet Core
//!
//! Navigation logic for hash-routed static pages with animated transitions.
//! Compiles to WASM; the browser glue lives in `velvet-app`.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 velvet-core                   │
//! ├───────────────────────────────────────────────┤
//! │  Ingress ─► Controller ─► Transition Gate     │
//! │              │    │          │                │
//! │           Router  Modal   park / apply        │
//! │              │    │          │                │
//! ├──────────────┴────┴──────────┴────────────────┤
//! │  Platform traits (Location, Stage, Modal, …)  │
//! ├───────────────────────────────────────────────┤
//! │  Preference store │ Image warmer │ Badges     │
//! └───────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod badge;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod gate;
pub mod ingress;
pub mod modal;
pub mod platform;
pub mod preference;
pub mod router;
pub mod routes;
pub mod state;
pub mod warm;

pub use badge::{BadgeReading, InteractionBadge, LayoutShift, LayoutShiftBadge, Rating, Thresholds};
pub use config::{VelvetConfig, FOCUSABLE_SELECTOR};
pub use controller::{Controller, FrameTask};
pub use error::{RouteError, StorageError, SurfaceError, VelvetError, VelvetResult};
pub use event::{AppEvent, Dispatch, Key, KeyPress};
pub use gate::{Capability, GateOptions, Gated, Mutation, TransitionGate, TransitionTicket};
pub use ingress::Ingress;
pub use modal::{FocusTrap, ModalController};
pub use platform::{
    FocusHandle, FocusSurface, ImageSurface, Location, ModalSurface, MotionSurface, Platform,
    Scheduler, Stage, TransitionHost,
};
pub use preference::{MemoryBackend, PreferenceBackend, PreferenceStore, MOTION_KEY};
pub use router::{Router, Swap};
pub use routes::{path_from_hash, RoutePath, RouteTable, TemplateId, DEFAULT_PATH};
pub use state::{ModalState, NavigationState};
pub use warm::{collect_warm_urls, ImageWarmer, DEFAULT_WARM_LIMIT};

/// Velvet core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
