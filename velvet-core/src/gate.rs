//! # Transition Gate
//!
//! Single decision point for "should this mutation be animated?".
//!
//! ```text
//! submit(mutation)
//!   ├─ capability && motion && !bypass ── start_transition(ticket)
//!   │                                        ├─ Ok  → park mutation, commit on TransitionReady(ticket)
//!   │                                        └─ Err → apply now
//!   └─ otherwise ─────────────────────────── apply now
//! ```
//!
//! The gate never applies a mutation itself; it hands it back to the caller
//! either immediately or when its ticket is redeemed, so mutation errors
//! always reach whoever performs the commit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::platform::TransitionHost;
use crate::routes::{RoutePath, TemplateId};

/// Whether the platform has an animated-transition primitive.
///
/// Probed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Transitions can be started.
    Supported,
    /// No transition primitive; every mutation runs plainly.
    #[default]
    Unsupported,
}

impl Capability {
    /// Map a feature probe result.
    #[must_use]
    pub const fn from_probe(present: bool) -> Self {
        if present {
            Self::Supported
        } else {
            Self::Unsupported
        }
    }

    /// Whether transitions can be started.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Supported)
    }
}

/// Per-call gate options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateOptions {
    /// Skip the animation regardless of capability and preference.
    pub bypass: bool,
}

impl GateOptions {
    /// Animate when capability and preference allow.
    pub const ANIMATE: Self = Self { bypass: false };
    /// Never animate.
    pub const BYPASS: Self = Self { bypass: true };
}

/// Identifies a parked mutation until the platform runs its update phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionTicket(u64);

impl TransitionTicket {
    /// Wrap a raw ticket value received from the platform.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value to hand to the platform.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A document mutation that may run inside a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Replace the content region with `template` and record `path`.
    SwapStage {
        /// Path being rendered.
        path: RoutePath,
        /// Template to clone.
        template: TemplateId,
    },
    /// Write the location fragment.
    ChangeLocation {
        /// Fragment including the leading `#`.
        hash: String,
    },
    /// Reveal the modal and trap focus.
    ShowModal,
    /// Hide the modal and restore focus.
    HideModal,
}

/// What the caller must do after [`TransitionGate::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Gated {
    /// Apply this mutation now.
    Apply(Mutation),
    /// The mutation is parked until its ticket comes back.
    Parked(TransitionTicket),
}

/// Decides between plain and animated mutation, and holds parked mutations.
#[derive(Debug, Default)]
pub struct TransitionGate {
    capability: Capability,
    next_ticket: u64,
    parked: BTreeMap<TransitionTicket, Mutation>,
}

impl TransitionGate {
    /// Create a gate for the probed capability.
    #[must_use]
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            next_ticket: 1,
            parked: BTreeMap::new(),
        }
    }

    /// The probed capability.
    #[must_use]
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Animate iff supported, motion enabled, and not bypassed.
    #[must_use]
    pub fn should_animate(&self, motion_enabled: bool, options: GateOptions) -> bool {
        self.capability.is_supported() && motion_enabled && !options.bypass
    }

    /// Prepare phase: either hand the mutation back for immediate application
    /// or park it behind a started transition.
    ///
    /// A transition that fails to start is logged and the mutation is handed
    /// back, so it still commits exactly once.
    pub fn submit<H>(
        &mut self,
        host: &mut H,
        motion_enabled: bool,
        options: GateOptions,
        mutation: Mutation,
    ) -> Gated
    where
        H: TransitionHost + ?Sized,
    {
        if !self.should_animate(motion_enabled, options) {
            return Gated::Apply(mutation);
        }

        let ticket = TransitionTicket(self.next_ticket);
        self.next_ticket += 1;

        match host.start_transition(ticket) {
            Ok(()) => {
                tracing::debug!(ticket = ticket.0, ?mutation, "Parked mutation behind transition");
                self.parked.insert(ticket, mutation);
                Gated::Parked(ticket)
            }
            Err(err) => {
                tracing::warn!("Transition failed to start, applying directly: {err}");
                Gated::Apply(mutation)
            }
        }
    }

    /// Commit phase: take the mutation parked under `ticket`.
    ///
    /// Returns `None` for unknown or already redeemed tickets.
    pub fn redeem(&mut self, ticket: TransitionTicket) -> Option<Mutation> {
        self.parked.remove(&ticket)
    }

    /// Whether a parked mutation equals `mutation`.
    #[must_use]
    pub fn is_parked(&self, mutation: &Mutation) -> bool {
        self.parked.values().any(|m| m == mutation)
    }

    /// Whether a stage swap is waiting on its transition.
    #[must_use]
    pub fn has_parked_swap(&self) -> bool {
        self.parked
            .values()
            .any(|m| matches!(m, Mutation::SwapStage { .. }))
    }

    /// Number of parked mutations.
    #[must_use]
    pub fn parked_count(&self) -> usize {
        self.parked.len()
    }
}
