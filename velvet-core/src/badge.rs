//! Live performance badges.
//!
//! Two running metrics fed by platform performance entries:
//!
//! - cumulative layout shift, summing shifts not caused by recent input
//! - an interaction-latency approximation, the slowest event duration seen
//!
//! Each renders as short text plus a three-level rating.

use serde::{Deserialize, Serialize};

/// Three-level rating of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Within the good threshold.
    Good,
    /// Above good, within the warn threshold.
    Warn,
    /// Above the warn threshold.
    Bad,
}

impl Rating {
    /// Border color for the badge.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "#26d07c",
            Self::Warn => "#ffb020",
            Self::Bad => "#ff5d5d",
        }
    }
}

/// Inclusive upper bounds for [`Rating::Good`] and [`Rating::Warn`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Values at or below this are good.
    pub good: f64,
    /// Values at or below this (and above `good`) are warn.
    pub warn: f64,
}

impl Thresholds {
    /// Layout-shift thresholds (0.1 / 0.25).
    pub const LAYOUT_SHIFT: Self = Self {
        good: 0.1,
        warn: 0.25,
    };

    /// Interaction-latency thresholds in milliseconds (200 / 500).
    pub const INTERACTION: Self = Self {
        good: 200.0,
        warn: 500.0,
    };

    /// Rate `value`.
    #[must_use]
    pub fn rate(&self, value: f64) -> Rating {
        if value <= self.good {
            Rating::Good
        } else if value <= self.warn {
            Rating::Warn
        } else {
            Rating::Bad
        }
    }
}

/// Text and rating ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeReading {
    /// Badge text.
    pub text: String,
    /// Rating.
    pub rating: Rating,
}

/// One `layout-shift` performance entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutShift {
    /// Shift score.
    pub value: f64,
    /// Whether the shift followed user input.
    pub had_recent_input: bool,
}

/// Cumulative layout shift badge.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutShiftBadge {
    total: f64,
    thresholds: Thresholds,
}

impl LayoutShiftBadge {
    /// A badge at zero.
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            total: 0.0,
            thresholds,
        }
    }

    /// Accumulate a batch of entries and return the updated reading.
    pub fn record(&mut self, entries: &[LayoutShift]) -> BadgeReading {
        self.total += entries
            .iter()
            .filter(|entry| !entry.had_recent_input)
            .map(|entry| entry.value)
            .sum::<f64>();
        self.reading()
    }

    /// Running total.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Current reading.
    #[must_use]
    pub fn reading(&self) -> BadgeReading {
        BadgeReading {
            text: format!("CLS: {:.3}", self.total),
            rating: self.thresholds.rate(self.total),
        }
    }
}

impl Default for LayoutShiftBadge {
    fn default() -> Self {
        Self::new(Thresholds::LAYOUT_SHIFT)
    }
}

/// Interaction-latency badge: the slowest event duration observed.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionBadge {
    worst_ms: f64,
    thresholds: Thresholds,
}

impl InteractionBadge {
    /// A badge at zero.
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            worst_ms: 0.0,
            thresholds,
        }
    }

    /// Fold a batch of event durations (ms) and return the updated reading.
    pub fn record(&mut self, durations_ms: &[f64]) -> BadgeReading {
        self.worst_ms = durations_ms
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .fold(self.worst_ms, f64::max);
        self.reading()
    }

    /// Slowest duration so far, rounded to whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn worst_ms(&self) -> i64 {
        self.worst_ms.round() as i64
    }

    /// Current reading. Rating uses the rounded value, as displayed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reading(&self) -> BadgeReading {
        let ms = self.worst_ms();
        BadgeReading {
            text: format!("INP: {ms} ms"),
            rating: self.thresholds.rate(ms as f64),
        }
    }
}

impl Default for InteractionBadge {
    fn default() -> Self {
        Self::new(Thresholds::INTERACTION)
    }
}
